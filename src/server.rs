use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    config::ServerConfig,
    connection::handle_client_connection,
    context::ServerContext,
    rdb::load_rdb_file,
    replication::run_replication_link,
};

/// A bound server: the listening socket plus the state shared by every
/// connection it accepts.
pub struct RedisServer {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl RedisServer {
    /// Loads the snapshot named by the configuration and binds the listener.
    /// Port 0 picks a free port, see [`RedisServer::local_addr`].
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        let entries = load_rdb_file(&config.dir, &config.dbfilename)
            .await
            .with_context(|| {
                format!(
                    "failed to load snapshot {}/{}",
                    config.dir, config.dbfilename
                )
            })?;

        let listener = TcpListener::bind(("127.0.0.1", config.port))
            .await
            .with_context(|| format!("failed to bind port {}", config.port))?;

        Ok(Self {
            listener,
            context: Arc::new(ServerContext::new(config, entries)),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn context(&self) -> Arc<ServerContext> {
        Arc::clone(&self.context)
    }

    /// Starts the replication link when configured as a replica, then accepts
    /// connections until the process stops.
    pub async fn run(self) -> anyhow::Result<()> {
        let local_addr = self.local_addr()?;
        info!(address = %local_addr, role = self.context.replication.role().as_str(), "server listening");

        if let Some(master) = self.context.config.replica_of.clone() {
            let context = Arc::clone(&self.context);

            tokio::spawn(async move {
                if let Err(e) = run_replication_link(context, master, local_addr.port()).await {
                    error!(error = %e, "replication link failed");
                }
            });
        }

        loop {
            let (stream, address) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            let context = Arc::clone(&self.context);

            tokio::spawn(async move {
                handle_client_connection(stream, context, address.to_string()).await;
            });
        }
    }
}
