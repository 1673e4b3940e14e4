//! MIME type detection based on file extensions.

use std::path::Path;

/// Content type used when the extension is unknown or missing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions whose payload is already compressed (or gains nothing from gzip).
const PRECOMPRESSED: &[&str] = &["png", "jpg", "jpeg", "gif", "zip", "gz", "rar", "mp4"];

/// Returns the content type for a file extension.
///
/// The extension may be given with or without its leading dot and is matched
/// case-insensitively.
///
/// # Example
///
/// ```
/// # use miniweb::http::mime::content_type_for;
/// assert_eq!(content_type_for(".html"), "text/html; charset=utf-8");
/// assert_eq!(content_type_for("PNG"), "image/png");
/// assert_eq!(content_type_for("unknown"), "application/octet-stream");
/// ```
pub fn content_type_for(ext: &str) -> &'static str {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "txt" => "text/plain; charset=utf-8",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Returns the content type for a path, looking only at its extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(content_type_for)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Whether a file with this extension is worth gzip-compressing.
pub fn is_compressible(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => !PRECOMPRESSED
            .iter()
            .any(|skip| ext.eq_ignore_ascii_case(skip)),
        None => true,
    }
}
