//! Data models for fixcheck.
//!
//! - [`Settings`]/[`Endpoint`]: run configuration and upstream data sources
//! - [`FixModule`]/[`Platform`]: fix files found under `gamefixes-*` directories
//! - [`SteamApp`], [`GogProduct`], [`UmuEntry`]: items streamed from catalogs
//! - [`RunReport`], [`Resolution`]: per-check status and reconciliation counts

pub mod catalog;
pub mod config;
pub mod fix;
pub mod run_state;

pub use self::catalog::{GogProduct, ProductId, SteamApp, UmuEntry};
pub use self::config::{Endpoint, GOG_BATCH_LIMIT, Settings};
pub use self::fix::{
    FIX_DIR_PREFIX, FixModule, GOG_FIX_DIR, IGNORED_FILES, Platform, STEAM_FIX_DIR, UMU_PREFIX,
};
pub use self::run_state::{Resolution, RunReport, Stage, StageStatus};
