//! Local development static file server.
//!
//! Serves a directory over HTTP/1.1, adds permissive CORS headers to every
//! response and serves `.wasm` files as `application/wasm`.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServeError, ServerError};
pub use server::Server;
