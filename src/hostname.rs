//! Hostname lookup for the text formatter.

use std::env;

/// Name of the machine the process runs on.
///
/// Tries the system hostname first, then the `HOSTNAME` and `COMPUTERNAME`
/// environment variables. Returns an empty string when nothing is available;
/// a missing hostname never fails a log line.
pub fn hostname() -> String {
    if let Some(name) = system_hostname() {
        return name;
    }

    for key in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(name) = env::var(key) {
            if !name.is_empty() {
                return name;
            }
        }
    }

    String::new()
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    let name = nix::unistd::gethostname().ok()?;
    let name = name.to_str()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_has_no_whitespace() {
        let name = hostname();
        assert!(!name.contains('\n'));
        assert_eq!(name.trim(), name);
    }
}
