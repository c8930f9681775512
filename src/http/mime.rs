//! MIME type detection module
//!
//! Infers a Content-Type from a file's extension, case-insensitively.

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Content-Type for a file path
///
/// # Examples
/// ```
/// use dirlist::http::mime::content_type_for;
/// use std::path::Path;
///
/// assert_eq!(content_type_for(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
/// assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(FALLBACK, |ext| by_extension(&ext.to_ascii_lowercase()))
}

fn by_extension(extension: &str) -> &'static str {
    match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "log" => "text/plain; charset=utf-8",
        "md" | "markdown" => "text/markdown; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => FALLBACK,
    }
}
