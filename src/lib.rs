//! miniweb - a small static file server
//!
//! Core library for HTTP parsing, file resolution and the connection loop.

pub mod config;
pub mod http;
pub mod logging;
pub mod server;
pub mod static_files;
