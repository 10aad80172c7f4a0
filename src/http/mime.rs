//! MIME type detection module
//!
//! Returns the Content-Type for a served path. The override table wins over
//! the generic extension lookup, which is what keeps `.wasm` from ever being
//! served as anything but `application/wasm`.

use std::path::Path;

/// Extensions whose Content-Type is forced regardless of the generic table
pub const MIME_OVERRIDES: &[(&str, &str)] = &[("wasm", WASM_MIME)];

pub const WASM_MIME: &str = "application/wasm";

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Content-Type for `path`, based on its extension
///
/// # Examples
/// ```
/// use std::path::Path;
/// use wasm_devserver::http::mime::mime_type_for;
/// assert_eq!(mime_type_for(Path::new("pkg/app_bg.wasm")), "application/wasm");
/// assert_eq!(mime_type_for(Path::new("index.html")), "text/html; charset=utf-8");
/// assert_eq!(mime_type_for(Path::new("LICENSE")), "application/octet-stream");
/// ```
pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };
    let ext = ext.to_ascii_lowercase();

    MIME_OVERRIDES
        .iter()
        .find(|(e, _)| *e == ext)
        .map_or_else(|| get_content_type(&ext), |&(_, mime)| mime)
}

/// Generic extension table, `ext` must already be lowercase
fn get_content_type(ext: &str) -> &'static str {
    match ext {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "sql" => "application/sql",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",

        _ => DEFAULT_MIME,
    }
}
