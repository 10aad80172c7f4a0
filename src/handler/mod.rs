//! Request handler module
//!
//! Routes each request to static file serving and finalises the response.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
