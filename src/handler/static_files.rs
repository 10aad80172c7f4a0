//! Static file serving module
//!
//! Maps a request path onto the served root, enforces containment, and
//! builds the file, index, listing or redirect response.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::ffi::OsString;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET/HEAD request from the root directory
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let segments = decode_request_path(ctx.path)?;
    let (target, meta) = resolve(&state.root, &segments).await?;

    if meta.is_dir() {
        if !ctx.path.ends_with('/') {
            return Ok(http::build_redirect_response(&directory_location(
                ctx.path, ctx.query,
            )));
        }
        return serve_directory(ctx, state, &segments, &target).await;
    }

    // A trailing slash only makes sense for directories
    if ctx.path.ends_with('/') {
        return Err(ServeError::NotFound);
    }

    serve_file(ctx, &target, &meta).await
}

/// Percent-decode the request path and split it into safe segments
///
/// Empty and `.` segments are dropped. `..` never resolves: it is refused
/// rather than clamped at the root. On Unix segments keep their raw bytes,
/// so names that are not UTF-8 stay reachable.
pub fn decode_request_path(path: &str) -> Result<Vec<OsString>, ServeError> {
    let decoded: Vec<u8> = percent_decode_str(path).collect();

    let mut segments = Vec::new();
    for segment in decoded.split(|b| *b == b'/') {
        match segment {
            b"" | b"." => {}
            b".." => return Err(ServeError::Forbidden),
            s if s.contains(&0) || s.contains(&b'\\') => return Err(ServeError::Forbidden),
            s => segments.push(segment_to_os(s)?),
        }
    }
    Ok(segments)
}

#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn segment_to_os(bytes: &[u8]) -> Result<OsString, ServeError> {
    use std::os::unix::ffi::OsStringExt;
    Ok(OsString::from_vec(bytes.to_vec()))
}

#[cfg(not(unix))]
fn segment_to_os(bytes: &[u8]) -> Result<OsString, ServeError> {
    std::str::from_utf8(bytes)
        .map(OsString::from)
        .map_err(|_| ServeError::Forbidden)
}

/// Join `segments` onto `root` and stat the result
///
/// Returns the joined (not canonical) path so the extension seen for MIME
/// lookup is the one that was requested, even through a symlink.
async fn resolve(root: &Path, segments: &[OsString]) -> Result<(PathBuf, Metadata), ServeError> {
    let mut target = root.to_path_buf();
    target.extend(segments);

    let canonical = fs::canonicalize(&target)
        .await
        .map_err(|e| ServeError::from_io(&e))?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes served root, refused: {} -> {}",
            target.display(),
            canonical.display()
        ));
        return Err(ServeError::Forbidden);
    }

    let meta = fs::metadata(&canonical)
        .await
        .map_err(|e| ServeError::from_io(&e))?;
    Ok((target, meta))
}

/// `Location` for a directory requested without its trailing slash
///
/// Leading slashes collapse to one so the target can never be read as a
/// protocol-relative URL.
fn directory_location(path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query {
        Some(q) => format!("/{path}/?{q}"),
        None => format!("/{path}/"),
    }
}

/// Diagnostic line for a served file, only when it goes out as wasm
fn wasm_diagnostic(request_path: &str, content_type: &str) -> Option<String> {
    (content_type == mime::WASM_MIME).then(|| logger::wasm_served_line(request_path))
}

/// Serve the first index file, falling back to a generated listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    segments: &[OsString],
    dir: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    for index_file in &state.config.index_files {
        let mut index_segments = segments.to_vec();
        index_segments.push(OsString::from(index_file));
        if let Ok((index_path, meta)) = resolve(&state.root, &index_segments).await {
            if meta.is_file() {
                return serve_file(ctx, &index_path, &meta).await;
            }
        }
    }

    let entries = listing::read_listing(dir).await.map_err(|e| {
        logger::log_warning(&format!(
            "No permission to list directory '{}': {e}",
            dir.display()
        ));
        ServeError::NotFound
    })?;
    let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
    let html = listing::render_listing(&display_path, &entries);
    Ok(http::build_html_response(html, ctx.is_head))
}

/// Serve a regular file
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    meta: &Metadata,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let modified = meta.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(date)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return Ok(http::build_304_response(date));
        }
    }

    let content = fs::read(file_path).await.map_err(|e| {
        logger::log_warning(&format!(
            "Failed to read file '{}': {e}",
            file_path.display()
        ));
        ServeError::from_io(&e)
    })?;

    let content_type = mime::mime_type_for(file_path);
    if let Some(line) = wasm_diagnostic(ctx.path, content_type) {
        logger::log_info(&line);
    }

    Ok(http::build_file_response(
        content,
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    ))
}
