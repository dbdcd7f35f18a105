use std::sync::Arc;

use http::{Request, Response};
use http_clerk::{
    backend::{resolve, BackendKind},
    record::LogRecord,
    sink::{LogSink, SinkError},
    LogstashFormatter, RequestLogger,
};

/// Example of plugging in a custom sink next to the built-in ones by
/// implementing `LogSink` directly.
struct PrintSink;

impl LogSink for PrintSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        println!("[print-sink] {} {}", record.level, record.message);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let destination = resolve("demo", &[BackendKind::StdOut, BackendKind::Memory])?
        .with_sink(Arc::new(PrintSink));
    let memory = destination.memory_sink().cloned();

    let logger = RequestLogger::new(
        "demo",
        Arc::new(destination),
        Arc::new(LogstashFormatter::new("demo", ["http", "example"])),
    );

    let request = Request::put("http://www.foo.com/1234.json")
        .header("X-Foo-Header", "Bar")
        .body(())?;
    let response = Response::builder().status(201).body(())?;

    logger.info(&response, &request);
    logger.warning(&(), &request);

    if let Some(memory) = memory {
        for line in memory.messages() {
            println!("retained: {}", line);
        }
    }
    Ok(())
}
