//! Logging.
//!
//! Diagnostics go through `tracing`. Requests are additionally appended to a
//! [`LogSink`], by default a date-stamped file per day under the configured
//! log directory.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::http::request::Request;

/// Destination for request log lines.
///
/// Appending must never fail from the caller's point of view and must be
/// safe to call from many connections at once.
pub trait LogSink: Send + Sync {
    fn append(&self, line: &str);
}

/// Appends timestamped lines to `<dir>/<YYYY-MM-DD>.log`.
///
/// `append` only queues the line; a dedicated worker thread does the file
/// I/O, so callers on the async runtime never block on the disk. Queued
/// lines are flushed when the log is dropped.
pub struct FileLog {
    writer: NonBlocking,
    _guard: WorkerGuard,
}

impl FileLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let (writer, guard) = tracing_appender::non_blocking(DailyFile { dir: dir.into() });
        Self {
            writer,
            _guard: guard,
        }
    }
}

impl LogSink for FileLog {
    fn append(&self, line: &str) {
        let entry = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            line
        );

        // One write per entry keeps lines whole. Only fails if the worker is gone.
        let _ = self.writer.clone().write_all(entry.as_bytes());
    }
}

/// Runs on the worker thread. Each buffer is one complete entry.
struct DailyFile {
    dir: PathBuf,
}

impl DailyFile {
    fn try_write(&self, buf: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.log", Utc::now().format("%Y-%m-%d")));
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(buf)
    }
}

impl Write for DailyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Err(e) = self.try_write(buf) {
            tracing::debug!(error = %e, dir = %self.dir.display(), "Dropped request log line");
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

/// One-line summary of a request: remote address, method, path, query and
/// header names.
pub fn request_summary(remote: &str, req: &Request) -> String {
    let mut line = format!("{} - {} {}", remote, req.method, req.path);

    if !req.query.is_empty() {
        let pairs: Vec<String> = req.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        line.push_str(" ?");
        line.push_str(&pairs.join("&"));
    }

    let names: Vec<&str> = req.headers.names().collect();
    line.push_str(" - Headers: ");
    line.push_str(&names.join(", "));
    line
}

/// Log lines written for a request: the summary, then its query parameters
/// and POST body when present. Nothing is redacted.
pub fn request_entries(remote: &str, req: &Request) -> Vec<String> {
    let mut entries = vec![request_summary(remote, req)];

    if !req.query.is_empty() {
        let pairs: Vec<String> = req.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        entries.push(format!("Query params: {}", pairs.join(", ")));
    }

    if req.method == "POST" {
        entries.push(format!("POST body: {}", req.body_as_str()));
    }

    entries
}
