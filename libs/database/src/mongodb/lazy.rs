//! Lazily established, process-wide collection handle.
//!
//! The service starts without touching MongoDB. The first request that needs
//! the store connects; every later request reuses the same client. A failed
//! attempt leaves nothing cached, so the next request simply tries again.

use mongodb::{Client, Collection, bson::Document};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use super::{HealthStatus, MongoConfig, MongoError, check_health_detailed, connect_from_config};

/// Owns the connection settings and, once connected, the shared client and
/// collection. Share it behind an `Arc`.
pub struct LazyCollection {
    config: MongoConfig,
    collection_name: String,
    cell: OnceCell<(Client, Collection<Document>)>,
}

impl LazyCollection {
    pub fn new(config: MongoConfig, collection_name: impl Into<String>) -> Self {
        Self {
            config,
            collection_name: collection_name.into(),
            cell: OnceCell::new(),
        }
    }

    /// Return the collection, connecting first if this is the first use.
    ///
    /// Concurrent first callers wait on the same connection attempt.
    #[instrument(skip(self), fields(collection = %self.collection_name))]
    pub async fn connect(&self) -> Result<&Collection<Document>, MongoError> {
        let (_, collection) = self
            .cell
            .get_or_try_init(|| async {
                let client = connect_from_config(&self.config).await.inspect_err(|e| {
                    warn!(error = %e, "MongoDB connection attempt failed");
                })?;
                let collection = client
                    .database(self.config.database())
                    .collection::<Document>(&self.collection_name);
                info!(
                    database = %self.config.database(),
                    collection = %self.collection_name,
                    "Collection handle ready"
                );
                Ok::<_, MongoError>((client, collection))
            })
            .await?;

        Ok(collection)
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }

    /// The connected client, if a connection was ever established
    pub fn client(&self) -> Option<&Client> {
        self.cell.get().map(|(client, _)| client)
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Readiness probe: pings an existing connection, or tries to connect
    pub async fn health(&self) -> HealthStatus {
        if let Err(e) = self.connect().await {
            return HealthStatus::unreachable(e.to_string());
        }
        match self.client() {
            Some(client) => check_health_detailed(client).await,
            None => HealthStatus::unreachable("not connected"),
        }
    }

    /// Close the client if one was opened. Safe to call when never connected.
    pub async fn shutdown(&self) {
        match self.client() {
            Some(client) => {
                info!("Closing MongoDB client");
                client.clone().shutdown().await;
                info!("MongoDB client closed");
            }
            None => info!("MongoDB was never connected, nothing to close"),
        }
    }
}

impl std::fmt::Debug for LazyCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyCollection")
            .field("url", &self.config.redacted_url())
            .field("database", &self.config.database())
            .field("collection", &self.collection_name)
            .field("connected", &self.is_connected())
            .finish()
    }
}
