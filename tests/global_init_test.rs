use http_clerk::backend::BackendKind;
use http_clerk::init::{global, init_global, ClerkConfig, InitError};
use http_clerk::layer::TracingLogger;
use http_clerk::{LeveledLogger, Severity};

// One test per binary: the global destination and subscriber are process-wide.
#[test]
fn test_global_destination_with_tracing_bridge() {
    let config = ClerkConfig {
        name: "global".to_string(),
        backends: vec![BackendKind::Memory],
        min_level: Severity::Info,
        install_subscriber: true,
        ..ClerkConfig::default()
    };

    let destination = init_global(&config).unwrap();
    assert!(matches!(init_global(&config), Err(InitError::AlreadyInitialized)));
    assert_eq!(global().unwrap().name(), "global");

    tracing::debug!("below threshold");
    tracing::info!(order_id = 7, "order placed");
    TracingLogger.critical("", "payment provider down");

    let records = destination.memory_sink().unwrap().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Severity::Info);
    assert_eq!(records[0].message, "order placed order_id=7");
    assert_eq!(records[1].level, Severity::Critical);
    assert_eq!(records[1].message, "payment provider down");
}
