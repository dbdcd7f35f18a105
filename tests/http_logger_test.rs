#![cfg(feature = "logstash")]

use std::sync::Arc;

use http::{Request, Response};
use http_clerk::backend::{resolve, BackendKind};
use http_clerk::{
    LogstashFormatter, MemorySink, RequestLogger, Severity, StatusRecorder,
};
use serde_json::{json, Value};

fn load_logger() -> (Arc<MemorySink>, RequestLogger) {
    let destination = resolve("foo", &[BackendKind::Memory]).expect("memory backend");
    let memory = Arc::clone(destination.memory_sink().expect("memory sink"));
    let formatter = LogstashFormatter::new("fooApp", ["blimp", "foo"]);
    let logger = RequestLogger::new("foo", Arc::new(destination), Arc::new(formatter));
    (memory, logger)
}

fn create_request() -> Request<()> {
    Request::put("http://www.foo.com/1234.json")
        .header("X-Foo-Header", "Bar")
        .body(())
        .unwrap()
}

fn last_json(memory: &MemorySink) -> Value {
    let line = memory.latest().expect("a line was written").message;
    serde_json::from_str(&line).expect("structured line is JSON")
}

#[test]
fn test_logger_fields_end_to_end() {
    let (memory, logger) = load_logger();
    let response = Response::builder().status(200).body(()).unwrap();

    logger.info(&response, &create_request());

    let value = last_json(&memory);
    assert_eq!(
        value["@fields"],
        json!({
            "method": "PUT",
            "status": "200",
            "path": "/1234.json",
            "host": "www.foo.com",
            "headers": { "X-Foo-Header": ["Bar"] }
        })
    );
    assert_eq!(value["@source"], "fooApp");
    assert_eq!(value["@tags"], json!(["blimp", "foo"]));
    assert!(value["@timestamp"].as_str().is_some_and(|ts| !ts.is_empty()));
}

#[test]
fn test_response_without_status_capability() {
    let (memory, logger) = load_logger();

    logger.info(&(), &create_request());

    assert_eq!(last_json(&memory)["@fields"]["status"], "");
}

#[test]
fn test_recorder_before_and_after_status_written() {
    let (memory, logger) = load_logger();
    let request = create_request();
    let mut recorder = StatusRecorder::new();

    logger.debug(&recorder, &request);
    assert_eq!(last_json(&memory)["@fields"]["status"], "");

    recorder.write_status(418);
    logger.debug(&recorder, &request);
    assert_eq!(last_json(&memory)["@fields"]["status"], "418");
}

#[test]
fn test_log_level_support() {
    let (memory, logger) = load_logger();
    let request = create_request();
    let response = Response::new(());

    logger.debug(&response, &request);
    logger.info(&response, &request);
    logger.warning(&response, &request);
    logger.error(&response, &request);
    logger.critical(&response, &request);

    let levels: Vec<Severity> = memory.records().iter().map(|r| r.level).collect();
    assert_eq!(
        levels,
        vec![
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical
        ]
    );
}

#[test]
fn test_memory_backend_drops_first_record_past_capacity() {
    let destination = http_clerk::backend::resolve_config(
        &http_clerk::backend::BackendConfig::new("foo", vec![BackendKind::Memory])
            .with_memory_capacity(3),
    )
    .unwrap();
    let memory = Arc::clone(destination.memory_sink().unwrap());
    let logger = RequestLogger::new(
        "foo",
        Arc::new(destination),
        Arc::new(LogstashFormatter::new("fooApp", Vec::<String>::new())),
    );

    for path in ["/1", "/2", "/3", "/4"] {
        let request = Request::get(path).body(()).unwrap();
        logger.info(&(), &request);
    }

    let paths: Vec<String> = memory
        .messages()
        .iter()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap();
            value["@fields"]["path"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(paths, vec!["/2", "/3", "/4"]);
}
