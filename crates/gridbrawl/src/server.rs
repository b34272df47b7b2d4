//! `GridbrawlServer` builder and accept loop.
//!
//! This is the entry point for running a Gridbrawl server. It ties the
//! layers together: transport → protocol → session → world.

use std::path::Path;
use std::sync::Arc;

use gridbrawl_protocol::SERVER_FULL;
use gridbrawl_session::{SessionConfig, SessionError, SessionHandle};
use gridbrawl_transport::frame::DEFAULT_MAX_FRAME_LEN;
use gridbrawl_transport::{Connection, TcpConnection, TcpTransport, Transport};
use gridbrawl_world::{World, WorldConfig};
use tokio::sync::Mutex;

use crate::GridbrawlError;
use crate::arena::Arena;
use crate::handler::handle_connection;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Everything needed to start a server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on, e.g. `0.0.0.0:5000`.
    pub bind_addr: String,
    pub world: WorldConfig,
    pub session: SessionConfig,
    /// Largest command frame accepted from a client. Bigger frames end the
    /// session.
    pub max_frame_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            world: WorldConfig::default(),
            session: SessionConfig::default(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Reads a JSON [`WorldConfig`]. Fields the file leaves out keep their
/// defaults.
///
/// # Errors
/// [`GridbrawlError::Io`] or [`GridbrawlError::Config`].
pub fn load_world_config(path: &Path) -> Result<WorldConfig, GridbrawlError> {
    let text = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded world config");
    Ok(config)
}

// ---------------------------------------------------------------------------
// Server state
// ---------------------------------------------------------------------------

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) arena: Mutex<Arena>,
    pub(crate) session_config: SessionConfig,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a Gridbrawl server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> Result<(), gridbrawl::GridbrawlError> {
/// use gridbrawl::GridbrawlServerBuilder;
///
/// let server = GridbrawlServerBuilder::new()
///     .bind("0.0.0.0:5000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GridbrawlServerBuilder {
    config: ServerConfig,
}

impl GridbrawlServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Starts from a complete config.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the world configuration.
    pub fn world_config(mut self, world: WorldConfig) -> Self {
        self.config.world = world;
        self
    }

    /// Sets the per-session outbound queue depth.
    pub fn outbound_queue(mut self, depth: usize) -> Self {
        self.config.session.outbound_queue = depth;
        self
    }

    /// Sets the largest command frame accepted from clients.
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.config.max_frame_len = len;
        self
    }

    /// Builds the world and binds the listener.
    ///
    /// # Errors
    /// An invalid world config or a failed bind.
    pub async fn build(self) -> Result<GridbrawlServer, GridbrawlError> {
        let ServerConfig {
            bind_addr,
            world,
            session,
            max_frame_len,
        } = self.config;

        let world = World::new(&world)?;
        let transport = TcpTransport::bind(&bind_addr)
            .await?
            .with_max_frame_len(max_frame_len);

        let state = Arc::new(ServerState {
            arena: Mutex::new(Arena::new(world)),
            session_config: session,
        });

        Ok(GridbrawlServer { transport, state })
    }
}

impl Default for GridbrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound Gridbrawl server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridbrawlServer {
    transport: TcpTransport,
    state: Arc<ServerState>,
}

impl GridbrawlServer {
    /// Creates a new builder.
    pub fn builder() -> GridbrawlServerBuilder {
        GridbrawlServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Admission happens here, under the arena lock: a connection either
    /// gets a slot and a handler task, or the full-server reply. Accept
    /// errors are logged and the loop carries on.
    pub async fn run(mut self) -> Result<(), GridbrawlError> {
        tracing::info!(addr = ?self.local_addr().ok(), "Gridbrawl server running");

        loop {
            let conn = match self.transport.accept().await {
                Ok(conn) => Arc::new(conn),
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                    continue;
                }
            };

            let conn_id = conn.id();
            let (handle, outbound) = SessionHandle::channel(conn_id, &self.state.session_config);
            let admitted = self.state.arena.lock().await.admit(handle);

            match admitted {
                Ok(slot) => {
                    tracing::info!(%slot, %conn_id, peer = ?conn.peer_addr(), "player joined");
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        handle_connection(conn, slot, outbound, state).await;
                    });
                }
                Err(GridbrawlError::Session(SessionError::CapacityExceeded { capacity })) => {
                    tracing::info!(%conn_id, capacity, "server full, rejecting connection");
                    tokio::spawn(reject(conn));
                }
                Err(e) => {
                    tracing::error!(%conn_id, error = %e, "admission failed");
                }
            }
        }
    }
}

/// Sends the full-server reply and closes.
async fn reject(conn: Arc<TcpConnection>) {
    let conn_id = conn.id();
    if let Err(e) = conn.send(SERVER_FULL.as_bytes()).await {
        tracing::debug!(%conn_id, error = %e, "failed to send full-server reply");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "failed to close rejected connection");
    }
}
