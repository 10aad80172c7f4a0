// Configuration module entry point
// Holds the explicit server configuration passed into `Server::bind`

mod state;

pub use state::AppState;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Port the development server listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// Server configuration
///
/// The binary always runs with [`ServerConfig::default`]; there is no config
/// file, flag or environment override. Other values are only built in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (all interfaces by default)
    pub host: IpAddr,
    /// TCP port, `0` picks an ephemeral one
    pub port: u16,
    /// Directory served as `/`
    pub root: PathBuf,
    /// Files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Print one access log line per request to stderr
    pub access_log: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            access_log: true,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
