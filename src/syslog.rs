use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::record::LogRecord;
use crate::sink::{LogSink, SinkError};

/// Local syslog sockets, tried in order.
pub const SYSLOG_SOCKET_PATHS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// `user-level messages` facility (RFC 5424, section 6.2.1).
const FACILITY_USER: u8 = 1;

/// Sink writing each record as one datagram to the local syslog daemon.
///
/// Lines use the BSD syslog framing understood by every local daemon:
/// `<PRI>Oct 18 09:14:03 name[pid]: message`.
#[derive(Debug)]
pub struct SyslogSink {
    ident: String,
    path: PathBuf,
    socket: Mutex<UnixDatagram>,
}

impl SyslogSink {
    /// Connect to the first reachable local syslog socket.
    ///
    /// **Parameters**
    /// - `ident`: program name written in front of every message.
    ///
    /// **Returns**
    /// - the last connection error when none of [`SYSLOG_SOCKET_PATHS`]
    ///   accepts a connection.
    pub fn connect(ident: impl Into<String>) -> io::Result<Self> {
        let ident = ident.into();
        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no syslog socket found");
        for path in SYSLOG_SOCKET_PATHS {
            match Self::connect_to(ident.clone(), path) {
                Ok(sink) => return Ok(sink),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// Connect to a syslog datagram socket at an explicit path.
    pub fn connect_to(ident: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        let socket = UnixDatagram::unbound()?;
        socket.connect(path.as_ref())?;
        Ok(Self {
            ident: ident.into(),
            path: path.as_ref().to_path_buf(),
            socket: Mutex::new(socket),
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the datagram sent for `record`.
    pub fn render(&self, record: &LogRecord) -> String {
        let pri = FACILITY_USER * 8 + record.level.syslog_code();
        let timestamp = record.timestamp.with_timezone(&Local).format("%b %e %H:%M:%S");
        let mut line = format!("<{}>{} {}[{}]: ", pri, timestamp, self.ident, std::process::id());
        if !record.tag.is_empty() {
            line.push('[');
            line.push_str(&record.tag);
            line.push_str("] ");
        }
        line.push_str(&record.message);
        line
    }
}

impl LogSink for SyslogSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let line = self.render(record);
        let socket = self.socket.lock().map_err(|_| SinkError::Poisoned)?;
        socket.send(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use chrono::Utc;

    fn record(level: Severity, message: &str) -> LogRecord {
        LogRecord {
            timestamp: Utc::now(),
            level,
            target: "test".to_string(),
            file: None,
            line: None,
            tag: String::new(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_syslog_sink_sends_datagram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.sock");
        let server = UnixDatagram::bind(&path).unwrap();

        let sink = SyslogSink::connect_to("fooApp", &path).unwrap();
        sink.write(&record(Severity::Error, "boom")).unwrap();

        let mut buf = [0u8; 512];
        let n = server.recv(&mut buf).unwrap();
        let got = std::str::from_utf8(&buf[..n]).unwrap();

        // user facility (1) * 8 + error (3)
        assert!(got.starts_with("<11>"), "got {:?}", got);
        assert!(got.contains(&format!("fooApp[{}]: ", std::process::id())));
        assert!(got.ends_with("boom"));
    }

    #[test]
    fn test_syslog_priority_per_severity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.sock");
        let _server = UnixDatagram::bind(&path).unwrap();
        let sink = SyslogSink::connect_to("app", &path).unwrap();

        assert!(sink.render(&record(Severity::Critical, "x")).starts_with("<10>"));
        assert!(sink.render(&record(Severity::Warning, "x")).starts_with("<12>"));
        assert!(sink.render(&record(Severity::Info, "x")).starts_with("<14>"));
        assert!(sink.render(&record(Severity::Debug, "x")).starts_with("<15>"));
    }

    #[test]
    fn test_syslog_connect_to_missing_socket_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SyslogSink::connect_to("app", dir.path().join("missing.sock")).unwrap_err();
        assert!(matches!(
            err.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused
        ));
    }
}
