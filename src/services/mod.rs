//! Services module - the validation checks.
//!
//! Checks run against one project root and stop at the first failure:
//!
//! 1. [`check_links`]: no fix module is a dangling symlink
//! 2. [`check_filenames`]: Steam fixes are numeric, all others `umu-` prefixed
//! 3. [`check_steamfixes`]: Steam app list, then per-app details, then the
//!    delisted whitelist
//! 4. [`check_gogfixes`]: GOG products in batches, then Steam fix aliases,
//!    then the umu database
//!
//! Network access goes through [`HttpFetch`]; responses are read
//! incrementally by [`stream`]. [`CheckRunner`] sequences the four checks and
//! tracks their [`StageStatus`](crate::models::StageStatus).
//!
//! # Usage Example
//!
//! ```ignore
//! use fixcheck::services::{CheckRunner, HttpFetch, ReqwestFetcher};
//!
//! let catalog = ReqwestFetcher::bulk(&settings)?;
//! let mut runner = CheckRunner::new(&settings);
//! runner.run(&catalog, &|| {
//!     Ok(Box::new(ReqwestFetcher::session(&settings)?) as Box<dyn HttpFetch>)
//! })?;
//! ```

pub mod gog;
pub mod http;
pub mod layout;
pub mod runner;
pub mod steam;
pub mod stream;

pub use gog::check_gogfixes;
pub use http::{HttpFetch, ReqwestFetcher};
pub use layout::{FixNaming, check_filenames, check_links, fix_modules};
pub use runner::{CheckRunner, SessionFactory};
pub use steam::{DELISTED_STEAM_APPS, check_steamfixes};
