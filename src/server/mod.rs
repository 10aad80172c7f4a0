// Server module entry point
// Binds the listener from an explicit config and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop instead
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

use crate::config::{AppState, ServerConfig};
use crate::error::ServerError;
use crate::logger;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A bound static file server
///
/// The listening socket is acquired in [`Server::bind`] and released when
/// the server is dropped, which `run`/`run_until` do on return.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Validate the root directory and bind the listening socket.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::new(config)?;
        let addr = state.config.socket_addr();
        let listener = create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until Ctrl+C (or SIGTERM on Unix)
    pub async fn run(self) {
        self.run_until(async {
            signal::shutdown_signal().await;
            logger::log_shutdown();
        })
        .await;
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        start_server_loop(self.listener, self.state, shutdown).await;
    }
}
