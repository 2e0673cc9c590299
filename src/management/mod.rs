mod auth;
mod catalog;
mod config;

pub use auth::TOKEN_FILE_NAME;
pub use auth::TokenManager;
pub use catalog::CatalogError;
pub use catalog::CatalogFilter;
pub use catalog::CatalogManager;
pub use catalog::SectionSummary;
pub use catalog::UNKNOWN_SECTION;
pub use config::CONFIG_CACHE_FILE_NAME;
pub use config::CONFIG_CACHE_MAX_AGE_HOURS;
pub use config::ConfigManager;
