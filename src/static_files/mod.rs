//! Static file lookup below the configured root directory.

pub mod resolver;

pub use resolver::{PathResolver, Resolution};
