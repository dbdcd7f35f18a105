//! Environment variable names used by this crate for configuring request
//! logging from a service's environment.
//!
//! These are purely helpers; the core types never read the environment.
//! See [`ClerkConfig::from_env`](crate::init::ClerkConfig::from_env).

/// Destination name; also the syslog ident.
pub const HTTP_CLERK_NAME_ENV: &str = "HTTP_CLERK_NAME";

/// Comma separated backend kinds, e.g. `stdout,syslog` or `0,1`.
pub const HTTP_CLERK_BACKENDS_ENV: &str = "HTTP_CLERK_BACKENDS";

/// Capacity of the memory ring backend.
pub const HTTP_CLERK_MEMORY_CAPACITY_ENV: &str = "HTTP_CLERK_MEMORY_CAPACITY";

/// Minimum severity written, e.g. `info`.
pub const HTTP_CLERK_LEVEL_ENV: &str = "HTTP_CLERK_LEVEL";

/// Line format: `logstash` or `text`.
pub const HTTP_CLERK_FORMAT_ENV: &str = "HTTP_CLERK_FORMAT";

/// `@source` of structured lines and prefix of text lines.
pub const HTTP_CLERK_SOURCE_ENV: &str = "HTTP_CLERK_SOURCE";

/// Comma separated `@tags`.
pub const HTTP_CLERK_TAGS_ENV: &str = "HTTP_CLERK_TAGS";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
