use miniweb::http::parser::{MAX_LINE, ParseError, parse_http_request};
use miniweb::http::request::Request;

async fn parse(raw: &[u8]) -> Request {
    let mut reader = raw;
    parse_http_request(&mut reader)
        .await
        .expect("parse failed")
        .expect("no request")
}

#[tokio::test]
async fn test_parse_simple_get_request() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n").await;

    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert!(parsed.query.is_empty());
    assert!(parsed.body.is_empty());
}

#[tokio::test]
async fn test_parse_query_string_is_split_from_path() {
    let parsed = parse(b"GET /search?q=rust%20lang&page=2 HTTP/1.1\r\n\r\n").await;

    assert_eq!(parsed.path, "/search");
    assert_eq!(parsed.target, "/search?q=rust%20lang&page=2");
    assert_eq!(parsed.raw_path(), "/search");
    assert_eq!(parsed.query.len(), 2);
    assert_eq!(parsed.query["q"], "rust lang");
    assert_eq!(parsed.query["page"], "2");
}

#[tokio::test]
async fn test_parse_query_last_duplicate_wins() {
    let parsed = parse(b"GET /?a=1&b=2&a=3 HTTP/1.1\r\n\r\n").await;

    assert_eq!(parsed.query["a"], "3");
    assert_eq!(parsed.query["b"], "2");
}

#[tokio::test]
async fn test_parse_query_bare_key_and_encoded_key() {
    let parsed = parse(b"GET /x?debug&na%6De=v%26w HTTP/1.1\r\n\r\n").await;

    assert_eq!(parsed.query["debug"], "");
    assert_eq!(parsed.query["name"], "v&w");
}

#[tokio::test]
async fn test_parse_path_is_percent_decoded() {
    let parsed = parse(b"GET /my%20docs/a.txt HTTP/1.1\r\n\r\n").await;

    assert_eq!(parsed.path, "/my docs/a.txt");
    assert_eq!(parsed.raw_path(), "/my%20docs/a.txt");
}

#[tokio::test]
async fn test_parse_version_defaults_when_missing() {
    let parsed = parse(b"GET /index.html\r\n\r\n").await;

    assert_eq!(parsed.path, "/index.html");
    assert_eq!(parsed.version, "HTTP/1.1");
}

#[tokio::test]
async fn test_parse_any_method_is_kept() {
    let parsed = parse(b"BREW /pot HTTP/1.1\r\n\r\n").await;

    assert_eq!(parsed.method, "BREW");
}

#[tokio::test]
async fn test_parse_headers_case_insensitive_last_wins() {
    let parsed = parse(b"GET / HTTP/1.1\r\nX-Test: one\r\nx-test: two\r\n\r\n").await;

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("X-TEST"), Some("two"));
}

#[tokio::test]
async fn test_parse_malformed_headers_are_skipped() {
    let raw = b"GET / HTTP/1.1\r\n\
        Host: example.com\r\n\
        BrokenHeader\r\n\
        User-Agent: test-client\r\n\
        : no-name\r\n\
        Accept:*/*\r\n\
        another broken line\r\n\
        \r\n";
    let parsed = parse(raw).await;

    assert_eq!(parsed.headers.len(), 3);
    assert_eq!(parsed.header("Host"), Some("example.com"));
    assert_eq!(parsed.header("User-Agent"), Some("test-client"));
    assert_eq!(parsed.header("Accept"), Some("*/*"));
}

#[tokio::test]
async fn test_parse_header_value_keeps_inner_colons() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost:  localhost:8080  \r\n\r\n").await;

    assert_eq!(parsed.header("Host"), Some("localhost:8080"));
}

#[tokio::test]
async fn test_parse_post_request_with_body() {
    let parsed = parse(b"POST /api HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").await;

    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.body, b"hello");
}

#[tokio::test]
async fn test_parse_body_stops_at_content_length() {
    let mut reader: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
    let parsed = parse_http_request(&mut reader).await.unwrap().unwrap();

    assert_eq!(parsed.body, b"abc");
    assert_eq!(reader, b"def");
}

#[tokio::test]
async fn test_parse_binary_body() {
    let parsed = parse(b"POST /upload HTTP/1.1\r\nContent-Length: 5\r\n\r\n\x00\x01\r\n\xff").await;

    assert_eq!(parsed.body, vec![0, 1, b'\r', b'\n', 0xff]);
}

#[tokio::test]
async fn test_parse_short_body_is_tolerated() {
    let parsed = parse(b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello").await;

    assert_eq!(parsed.body, b"hello");
}

#[tokio::test]
async fn test_parse_invalid_content_length_means_no_body() {
    for value in ["abc", "0", "-5", "99999999999"] {
        let raw = format!("POST / HTTP/1.1\r\nContent-Length: {value}\r\n\r\nleftover");
        let mut reader = raw.as_bytes();
        let parsed = parse_http_request(&mut reader).await.unwrap().unwrap();

        assert!(parsed.body.is_empty(), "Content-Length: {value}");
        assert_eq!(reader, b"leftover");
    }
}

#[tokio::test]
async fn test_parse_empty_stream_is_no_request() {
    let mut reader: &[u8] = b"";
    assert!(parse_http_request(&mut reader).await.unwrap().is_none());

    let mut reader: &[u8] = b"\r\n";
    assert!(parse_http_request(&mut reader).await.unwrap().is_none());
}

#[tokio::test]
async fn test_parse_missing_target_is_an_error() {
    let mut reader: &[u8] = b"GET\r\n\r\n";
    let result = parse_http_request(&mut reader).await;

    assert!(matches!(result, Err(ParseError::MissingTarget)));
}

#[tokio::test]
async fn test_parse_headers_without_terminating_blank_line() {
    let parsed = parse(b"GET / HTTP/1.1\r\nHost: example.com\r\n").await;

    assert_eq!(parsed.header("Host"), Some("example.com"));
}

#[tokio::test]
async fn test_parse_overlong_header_line_is_an_error() {
    // A header that never ends, as if a peer kept streaming without a newline
    let raw = format!("GET / HTTP/1.1\r\nX-Big: {}", "a".repeat(MAX_LINE * 4));
    let mut reader = raw.as_bytes();
    let result = parse_http_request(&mut reader).await;

    assert!(matches!(result, Err(ParseError::LineTooLong)));
}

#[tokio::test]
async fn test_parse_overlong_request_line_is_an_error() {
    let raw = format!("GET /{} HTTP/1.1\r\n\r\n", "p".repeat(MAX_LINE));
    let mut reader = raw.as_bytes();
    let result = parse_http_request(&mut reader).await;

    assert!(matches!(result, Err(ParseError::LineTooLong)));
}

#[tokio::test]
async fn test_parse_line_at_limit_is_accepted() {
    let prefix = "X-Fill: ";
    let value = "v".repeat(MAX_LINE - prefix.len() - 2);
    let raw = format!("GET / HTTP/1.1\r\n{prefix}{value}\r\n\r\n");
    let parsed = parse(raw.as_bytes()).await;

    assert_eq!(parsed.header("X-Fill"), Some(value.as_str()));
}
