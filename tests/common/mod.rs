#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use flate2::read::GzDecoder;
use miniweb::config::Config;
use miniweb::http::connection::HandlerContext;
use miniweb::logging::LogSink;

/// Keeps log lines in memory so tests can inspect them.
#[derive(Default)]
pub struct MemoryLog {
    pub lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for MemoryLog {
    fn append(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

pub fn test_config(root: &Path) -> Config {
    Config {
        port: 8080,
        root_directory: root.to_path_buf(),
        log_directory: root.join("logs"),
        read_timeout_secs: 5,
        write_timeout_secs: 5,
        reject_traversal: false,
    }
}

pub fn test_context(root: &Path) -> (HandlerContext, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::default());
    let ctx = HandlerContext::new(Arc::new(test_config(root)), log.clone());
    (ctx, log)
}

/// A response as seen by a client.
#[derive(Debug)]
pub struct Decoded {
    pub status: u16,
    pub reason: String,
    /// Header lines in the order received
    pub header_lines: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    /// Body bytes as sent on the wire
    pub raw_body: Vec<u8>,
}

impl Decoded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// The body with any gzip content-encoding removed.
    pub fn body(&self) -> Vec<u8> {
        if self.header("Content-Encoding") == Some("gzip") {
            let mut out = Vec::new();
            GzDecoder::new(&self.raw_body[..])
                .read_to_end(&mut out)
                .unwrap();
            out
        } else {
            self.raw_body.clone()
        }
    }
}

pub fn decode_response(bytes: &[u8]) -> Decoded {
    let head_end = bytes
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&bytes[..head_end]).unwrap();
    let mut lines = head.split("\r\n");

    let status_line = lines.next().unwrap();
    let mut parts = status_line.splitn(3, ' ');
    assert_eq!(parts.next(), Some("HTTP/1.1"));
    let status = parts.next().unwrap().parse().unwrap();
    let reason = parts.next().unwrap_or("").to_string();

    let mut header_lines = Vec::new();
    let mut headers = HashMap::new();
    for line in lines {
        let (k, v) = line.split_once(": ").expect("malformed response header");
        header_lines.push((k.to_string(), v.to_string()));
        headers.insert(k.to_ascii_lowercase(), v.to_string());
    }

    let raw_body = bytes[head_end + 4..].to_vec();
    if let Some(len) = headers.get("content-length") {
        assert_eq!(len.parse::<usize>().unwrap(), raw_body.len(), "Content-Length mismatch");
    }

    Decoded {
        status,
        reason,
        header_lines,
        headers,
        raw_body,
    }
}
