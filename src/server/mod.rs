// Server module entry point
// Startup checks, listener binding and the serving loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::run_accept_loop;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;

/// A bound, ready-to-serve static CORS server.
///
/// Construction validates the root directory before any socket is created,
/// then binds the listener. Serving consumes the server; once `run_until`
/// returns the listener is closed.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    local_addr: SocketAddr,
}

impl Server {
    /// Validate the root directory and bind the listener.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let state = AppState::new(config)?;
        let addr = state.config.get_socket_addr()?;

        let listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        logger::log_server_start(&local_addr, &state.root, &state.config);

        Ok(Self {
            listener,
            state: Arc::new(state),
            local_addr,
        })
    }

    /// Address actually bound (resolves port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Serve until the process is killed
    pub async fn run(self) {
        self.run_until(std::future::pending()).await;
    }

    /// Serve until `shutdown` resolves, then close the listener
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Self {
            listener,
            state,
            local_addr,
        } = self;

        run_accept_loop(listener, state, shutdown).await;
        logger::log_shutdown(&local_addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempSite;

    fn local_config(site: &TempSite) -> Config {
        let mut cfg = Config::for_root(site.path().to_string_lossy());
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.logging.access_log = false;
        cfg
    }

    #[tokio::test]
    async fn test_bind_resolves_ephemeral_port() {
        let site = TempSite::new("server-bind");
        let server = Server::bind(local_config(&site)).unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(server.state().root, site.path().canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_missing_root_fails_before_bind() {
        // A port we already hold: reaching the bind step would yield a Bind error
        let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

        let mut cfg = Config::for_root("/nonexistent/cors-static-server/frontend");
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = held.local_addr().unwrap().port();

        let err = Server::bind(cfg).err().unwrap();
        assert!(matches!(err, ServerError::Filesystem { .. }));
    }

    #[tokio::test]
    async fn test_port_in_use_is_bind_error() {
        let site = TempSite::new("server-in-use");
        let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

        let mut cfg = local_config(&site);
        cfg.server.port = held.local_addr().unwrap().port();

        let err = Server::bind(cfg).err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));
    }

    #[tokio::test]
    async fn test_run_until_stops_and_releases_port() {
        let site = TempSite::new("server-stop");
        let server = Server::bind(local_config(&site)).unwrap();
        let addr = server.local_addr();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        handle.await.unwrap();

        // Listener dropped: the address can be bound again
        let rebound = create_listener(addr).unwrap();
        assert_eq!(rebound.local_addr().unwrap(), addr);
    }
}
