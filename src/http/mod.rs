//! HTTP protocol layer module
//!
//! Header, MIME and response helpers, decoupled from filesystem access.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use cors::{apply_cors_headers, with_cors};
pub use mime::mime_type_for;
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_options_response, build_redirect_response,
};
