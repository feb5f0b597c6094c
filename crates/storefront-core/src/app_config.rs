use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// JSON file backing the durable key-value store (`cart`, `cartTotal`,
    /// `cartSnapshot`).
    pub store_path: PathBuf,
    /// Static product catalog document, a top-level JSON array.
    pub catalog_path: PathBuf,
    /// Location handed to the navigation collaborator after checkout.
    pub checkout_location: String,
}
