pub mod app_config;
pub mod catalog;
pub mod config;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, sort_products, Catalog, Product, SizeOption, SortOrder};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_json::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
