// fixcheck - CI validation for per-game fix modules
//
// This is the library crate containing the checks and data structures.
// The binary crate (main.rs) wires settings, logging and HTTP clients together.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use crate::config::ConfigManager;
pub use error::FixCheckError;
pub use metrics::RunMetrics;
pub use models::{Endpoint, RunReport, Settings, Stage, StageStatus};
pub use services::{
    CheckRunner, DELISTED_STEAM_APPS, HttpFetch, ReqwestFetcher, check_filenames, check_gogfixes,
    check_links, check_steamfixes,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
