//! Web server for filegate.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{GatewayError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the gateway.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// `config.host` must be a literal IP address; `::` binds the dual-stack
    /// wildcard.
    pub fn new(config: &ServerConfig, app_state: AppState) -> Result<Self> {
        let ip: IpAddr = config.host.parse().map_err(|_| {
            GatewayError::Config(format!("invalid host address: {}", config.host))
        })?;

        Ok(Self {
            addr: SocketAddr::new(ip, config.port),
            app_state: Arc::new(app_state),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn create_test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
        }
    }

    fn create_test_state(dir: &tempfile::TempDir) -> AppState {
        AppState::new(FileStore::new(dir.path()).unwrap())
    }

    #[test]
    fn test_web_server_new() {
        let dir = tempfile::TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_test_state(&dir)).unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_dual_stack_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let server = WebServer::new(&ServerConfig::default(), create_test_state(&dir)).unwrap();

        assert!(server.addr().ip().is_unspecified());
        assert!(server.addr().is_ipv6());
        assert_eq!(server.addr().port(), 3000);
    }

    #[test]
    fn test_web_server_invalid_host() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServerConfig {
            host: "not an address".to_string(),
            port: 0,
        };

        let result = WebServer::new(&config, create_test_state(&dir));
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let server = WebServer::new(&create_test_config(), create_test_state(&dir)).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("Hello World!"));
    }
}
