use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Collection holding the listings unless `LISTINGS_COLLECTION` says otherwise
pub const DEFAULT_COLLECTION: &str = "roommateListings";

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub collection: String,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let collection = env_or_default("LISTINGS_COLLECTION", DEFAULT_COLLECTION);
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            collection,
            server,
            environment,
        })
    }
}
