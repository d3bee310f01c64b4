//! Application state management.
//!
//! This module defines the shared application state passed to all request handlers.
//! The state contains:
//! - Configuration
//! - The lazily connected listings collection

use database::mongodb::LazyCollection;
use std::sync::Arc;

/// Shared application state.
///
/// Cloned per handler; the store is behind an `Arc`, so every clone shares
/// one connection attempt and one client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Listings collection, connected on first use
    pub store: Arc<LazyCollection>,
}

impl AppState {
    pub fn new(config: crate::config::Config) -> Self {
        let store = Arc::new(LazyCollection::new(
            config.mongodb.clone(),
            config.collection.clone(),
        ));
        Self { config, store }
    }
}
