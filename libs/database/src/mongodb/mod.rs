//! MongoDB database connector and utilities
//!
//! Provides connection management, a lazily connected collection handle and
//! health probes.

mod config;
mod connector;
mod health;
mod lazy;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoError, connect_from_config};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use lazy::LazyCollection;

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
