use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not a JSON object of string values: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CartError {
    /// No usable price could be resolved for an item being added. The cart
    /// is left untouched.
    #[error("price not found for \"{name}\"")]
    PriceNotFound { name: String },

    #[error("item name must not be empty")]
    MissingName,

    #[error(transparent)]
    Store(#[from] StoreError),
}
