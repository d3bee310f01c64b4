//! Database library providing MongoDB connectors and utilities
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use database::mongodb::{LazyCollection, MongoConfig};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let listings = Arc::new(LazyCollection::new(config, "roommateListings"));
//!
//! // Nothing has been dialled yet; the first call connects.
//! let collection = listings.connect().await?;
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;
