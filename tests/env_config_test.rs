use http_clerk::backend::BackendKind;
use http_clerk::env::*;
use http_clerk::format::FormatKind;
use http_clerk::init::{build, ClerkConfig, InitError};
use http_clerk::Severity;

// Single test: the process environment is shared by every test in a binary.
#[test]
fn test_config_from_env() {
    std::env::set_var(HTTP_CLERK_NAME_ENV, "orders");
    std::env::set_var(HTTP_CLERK_BACKENDS_ENV, "memory, 2");
    std::env::set_var(HTTP_CLERK_MEMORY_CAPACITY_ENV, "8");
    std::env::set_var(HTTP_CLERK_LEVEL_ENV, "warning");
    std::env::set_var(HTTP_CLERK_FORMAT_ENV, "text");
    std::env::set_var(HTTP_CLERK_TAGS_ENV, "api, ,v2");
    std::env::set_var(HTTP_CLERK_SOURCE_ENV, "orders-edge");

    let config = ClerkConfig::from_env().unwrap();
    assert_eq!(config.name, "orders");
    assert_eq!(config.source, "orders-edge");
    assert_eq!(config.backends, vec![BackendKind::Memory, BackendKind::Memory]);
    assert_eq!(config.memory_capacity, 8);
    assert_eq!(config.min_level, Severity::Warning);
    assert_eq!(config.format, FormatKind::Text);
    assert_eq!(config.tags, vec!["api", "v2"]);

    let (destination, logger) = build(&config).unwrap();
    let request = http::Request::get("/orders/7").body(()).unwrap();
    logger.info(&http::StatusCode::OK, &request);
    logger.error(&http::StatusCode::INTERNAL_SERVER_ERROR, &request);

    for memory in destination.memory_sinks() {
        let messages = memory.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("orders-edge "));
        assert!(messages[0].contains("Status: 500"));
    }

    std::env::remove_var(HTTP_CLERK_SOURCE_ENV);
    assert_eq!(ClerkConfig::from_env().unwrap().source, "orders");

    std::env::set_var(HTTP_CLERK_FORMAT_ENV, "xml");
    assert!(matches!(ClerkConfig::from_env(), Err(InitError::Format(_))));
    std::env::set_var(HTTP_CLERK_FORMAT_ENV, "text");

    std::env::set_var(HTTP_CLERK_BACKENDS_ENV, "kafka");
    assert!(matches!(ClerkConfig::from_env(), Err(InitError::Backend(_))));

    std::env::set_var(HTTP_CLERK_BACKENDS_ENV, "memory");
    std::env::set_var(HTTP_CLERK_MEMORY_CAPACITY_ENV, "lots");
    assert!(matches!(
        ClerkConfig::from_env(),
        Err(InitError::InvalidValue(HTTP_CLERK_MEMORY_CAPACITY_ENV, _))
    ));
    std::env::remove_var(HTTP_CLERK_MEMORY_CAPACITY_ENV);

    std::env::set_var(HTTP_CLERK_BACKENDS_ENV, "");
    let config = ClerkConfig::from_env().unwrap();
    assert!(matches!(build(&config), Err(InitError::Registry(_))));
}
