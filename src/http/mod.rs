//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 server side: one request per connection,
//! fixed-length bodies only, every response sent with `Connection: close`.
//!
//! # Architecture
//!
//! - **`connection`**: drives one accepted stream through the state machine below
//! - **`parser`**: reads a request off a buffered stream
//! - **`request`**: parsed request and its case-insensitive headers
//! - **`response`**: response representation, builder and gzip support
//! - **`writer`**: serializes a response and writes it to the client
//! - **`mime`**: content types and compressibility by file extension
//! - **`percent`**: percent-decoding of paths and query strings
//! - **`deadline`**: per-read and per-write timeouts on a stream
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Parsing   │ ← Read request line, headers, body
//!        └──────┬──────┘
//!               │ Request received (blank request → Closed)
//!               ▼
//!        ┌─────────────┐
//!        │  Resolving  │ ← Log, map path to a file, build response
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │ Responding  │ ← Write the serialized response
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//! ```
//!
//! Any error jumps straight to `Closed`.
//!
//! # Example
//!
//! ```ignore
//! use miniweb::http::connection::{Connection, HandlerContext};
//! use tokio::net::TcpListener;
//!
//! async fn serve(listener: TcpListener, ctx: HandlerContext) -> anyhow::Result<()> {
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let ctx = ctx.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, addr.to_string(), ctx);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {e:#}");
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
pub mod percent;
pub mod deadline;
