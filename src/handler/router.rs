//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, CORS
//! finalisation and access logging.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let uri = req.uri();
        Self {
            path: uri.path(),
            query: uri.query(),
            is_head: req.method() == Method::HEAD,
            if_modified_since: req
                .headers()
                .get("if-modified-since")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: req.headers().contains_key("if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match *req.method() {
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_request(&req);
            match static_files::serve_path(&ctx, &state).await {
                Ok(resp) => resp,
                Err(e) => http::build_error_response(e, ctx.is_head),
            }
        }
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            http::build_error_response(ServeError::MethodNotAllowed, false)
        }
    };

    let response = http::with_cors(response);

    if state.config.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            req.method().to_string(),
            req.uri().to_string(),
        );
        entry.http_version = format!("{:?}", req.version());
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok());
        logger::log_access(&entry);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use http_body_util::BodyExt;
    use hyper::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    };
    use hyper::StatusCode;
    use std::path::Path;

    fn state_for(root: &Path) -> Arc<AppState> {
        let cfg = ServerConfig::default()
            .with_root(root)
            .with_access_log(false);
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn assert_cors_once<B>(resp: &Response<B>) {
        for (name, value) in [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ] {
            let values: Vec<_> = resp.headers().get_all(&name).iter().collect();
            assert_eq!(values.len(), 1, "{name} should appear exactly once");
            assert_eq!(values[0], value);
        }
    }

    #[tokio::test]
    async fn test_serves_wasm_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let wasm = b"\0asm\x01\0\0\0";
        std::fs::write(dir.path().join("module.wasm"), wasm).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/module.wasm").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
        assert_eq!(resp.headers().get_all("content-type").iter().count(), 1);
        assert_eq!(resp.headers()["content-length"], wasm.len().to_string().as_str());
        assert!(resp.headers().contains_key("last-modified"));
        assert_cors_once(&resp);
        assert_eq!(body_of(resp).await, Bytes::from_static(wasm));
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/missing.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors_once(&resp);
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir(&site).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        let state = state_for(&site);

        let resp = send(&state, Method::GET, "/%2e%2e/secret.txt").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_cors_once(&resp);
        assert_ne!(body_of(resp).await, Bytes::from_static(b"secret"));
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        for uri in ["/", "/does/not/exist.wasm"] {
            let resp = send(&state, Method::OPTIONS, uri).await;
            assert!(resp.status().is_success());
            assert_cors_once(&resp);
            assert!(body_of(resp).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_post_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::POST, "/index.html").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, HEAD, OPTIONS");
        assert_cors_once(&resp);
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, Bytes::from_static(b"<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn test_root_without_index_lists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.wasm"), "x").unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors_once(&resp);
        let body = body_of(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("<a href=\"app.wasm\">app.wasm</a>"));
        assert!(html.contains("<a href=\"pkg/\">pkg/</a>"));
    }

    #[tokio::test]
    async fn test_directory_redirects_to_slash() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/pkg?v=1").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/pkg/?v=1");
        assert_cors_once(&resp);
    }

    #[tokio::test]
    async fn test_redirect_collapses_leading_slashes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("evil.example")).unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "//evil.example").await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/evil.example/");
        assert_cors_once(&resp);
    }

    #[tokio::test]
    async fn test_wasm_named_directory_serves_index_as_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg.wasm")).unwrap();
        std::fs::write(dir.path().join("pkg.wasm/index.html"), "<p>pkg</p>").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/pkg.wasm/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_percent_encoded_wasm_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.wasm"), b"\0asm").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/a.wa%73m").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/wasm");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_name_listed_and_served() {
        use std::os::unix::ffi::OsStrExt;
        let dir = tempfile::tempdir().unwrap();
        let name = std::ffi::OsStr::from_bytes(b"caf\xe9.bin");
        std::fs::write(dir.path().join(name), "raw").unwrap();
        let state = state_for(dir.path());

        let listing = body_of(send(&state, Method::GET, "/").await).await;
        let html = std::str::from_utf8(&listing).unwrap();
        assert!(html.contains("<a href=\"caf%E9.bin\">caf\u{fffd}.bin</a>"));

        let resp = send(&state, Method::GET, "/caf%E9.bin").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, Bytes::from_static(b"raw"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/a.txt/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_has_headers_no_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::HEAD, "/app.js").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/javascript");
        assert_eq!(resp.headers()["content-length"], "15");
        assert_cors_once(&resp);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_if_modified_since_gives_304() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.css"), "body{}").unwrap();
        let state = state_for(dir.path());

        let first = send(&state, Method::GET, "/a.css").await;
        let last_modified = first.headers()["last-modified"].clone();

        let req = Request::builder()
            .uri("/a.css")
            .header("if-modified-since", last_modified)
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_cors_once(&resp);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_get_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "{\"a\":1}").unwrap();
        let state = state_for(dir.path());

        let a = send(&state, Method::GET, "/data.json").await;
        let b = send(&state, Method::GET, "/data.json").await;
        assert_eq!(a.status(), b.status());
        assert_eq!(a.headers(), b.headers());
        assert_eq!(body_of(a).await, body_of(b).await);
    }
}
