//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a throwaway MongoDB container.

use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
/// Only the connection string is exposed so callers build their own client
/// the same way production code does.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let url = mongo.connection_string();
/// // Hand `url` to MongoConfig / LazyCollection
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    pub connection_string: String,
}

impl TestMongo {
    /// Create a new standalone MongoDB instance (image tag 7)
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = connection_string_for(host_port);

        tracing::info!(port = host_port, "Test MongoDB ready (mongo:7)");

        Self {
            container,
            connection_string,
        }
    }

    /// Get the connection string for client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

fn connection_string_for(port: u16) -> String {
    format!("mongodb://127.0.0.1:{}/?directConnection=true", port)
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
