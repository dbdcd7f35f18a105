use http::{Request, StatusCode};
use http_clerk::init::{build, ClerkConfig};

fn main() {
    // e.g. HTTP_CLERK_BACKENDS=stdout,syslog HTTP_CLERK_FORMAT=text HTTP_CLERK_LEVEL=info
    let config = ClerkConfig::from_env().expect("invalid HTTP_CLERK_* configuration");
    let (_destination, logger) = build(&config).expect("failed to build request logger");

    let request = Request::get("/status?verbose=1")
        .header("host", "localhost:8080")
        .body(())
        .expect("valid request");

    logger.debug(&StatusCode::OK, &request);
    logger.info(&StatusCode::OK, &request);
    logger.error(&StatusCode::BAD_GATEWAY, &request);
}
