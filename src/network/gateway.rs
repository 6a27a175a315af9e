//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds a socket and spawns a Session task for each client, up
//! to the configured connection limit.

use crate::config::MpdConfig;
use crate::engine::Engine;
use crate::handlers::Registry;
use crate::network::Session;
use crate::telemetry::spans;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{Instrument, error, info, instrument, warn};

/// The Gateway accepts incoming TCP connections and spawns sessions.
pub struct Gateway {
    listener: TcpListener,
    registry: Arc<Registry>,
    engine: Arc<dyn Engine>,
    settings: Arc<MpdConfig>,
    slots: Arc<Semaphore>,
    next_id: AtomicU64,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<Registry>,
        engine: Arc<dyn Engine>,
        settings: Arc<MpdConfig>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Listener bound");
        let slots = Arc::new(Semaphore::new(settings.max_connections));
        Ok(Self {
            listener,
            registry,
            engine,
            settings,
            slots,
            next_id: AtomicU64::new(1),
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            let Ok(permit) = Arc::clone(&self.slots).try_acquire_owned() else {
                warn!(%addr, limit = self.settings.max_connections, "Connection limit reached - rejecting");
                drop(stream);
                continue;
            };

            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let session = Session::new(
                id,
                stream,
                addr,
                Arc::clone(&self.registry),
                Arc::clone(&self.engine),
                Arc::clone(&self.settings),
            );

            tokio::spawn(
                async move {
                    if let Err(e) = session.run().await {
                        warn!(error = %e, "Session ended with error");
                    }
                    drop(permit);
                }
                .instrument(spans::connection(id, &addr)),
            );
        }
    }
}
