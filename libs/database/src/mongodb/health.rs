use mongodb::Client;
use std::time::Instant;

use super::connector::ping;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Optional message (e.g., error details)
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// Status for a store that could not be reached at all
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: Some(message.into()),
            response_time_ms: 0,
        }
    }
}

/// Check MongoDB health with a `ping` command
pub async fn check_health(client: &Client) -> bool {
    ping(client).await.is_ok()
}

/// Check MongoDB health with detailed status
///
/// Returns timing information and any error messages.
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&client).await;
/// if !status.healthy {
///     tracing::warn!("MongoDB unhealthy: {:?}", status.message);
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_status() {
        let status = HealthStatus::unreachable("connection refused");
        assert!(!status.healthy);
        assert_eq!(status.message.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_check_health_detailed() {
        let client = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        let status = check_health_detailed(&client).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
