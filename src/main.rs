//! fixcheck - validates the fix modules of a protonfixes checkout.
//!
//! Runs four checks against the project root, in order, stopping at the
//! first failure:
//!
//! 1. No fix module is a broken symbolic link
//! 2. Fix filenames follow the platform naming rule
//! 3. Every Steam fix names a Steam app (app list, app details, whitelist)
//! 4. Every GOG fix names a GOG product, a Steam fix, or a umu database entry
//!
//! The project root is `FIXCHECK_ROOT` or the current directory. Settings
//! come from `fixcheck.yaml` in the root and `FIXCHECK_*` variables.
//!
//! The project path is the only line written to stdout. Progress and errors
//! go to stderr; the exit code is non-zero when any check fails.

use anyhow::{Context, Result};
use fixcheck::services::{CheckRunner, HttpFetch, ReqwestFetcher};
use fixcheck::{APP_NAME, ConfigManager, FixCheckError, VERSION};

fn main() -> Result<()> {
    let config = ConfigManager::from_environment()?;
    let settings = config.load()?;

    let _guard =
        fixcheck::logging::setup_logging(APP_NAME, settings.debug, settings.log_dir.as_deref())?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    if config.has_settings_file() {
        tracing::info!("Loaded settings from {}", config.settings_path());
    }
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("Effective settings:\n{}", config.render_settings(&settings)?);
    }
    println!("{}", settings.root);

    let catalog = ReqwestFetcher::bulk(&settings)?;
    let open_session = || -> Result<Box<dyn HttpFetch>, FixCheckError> {
        Ok(Box::new(ReqwestFetcher::session(&settings)?))
    };

    let mut runner = CheckRunner::new(&settings);
    let result = runner.run(&catalog, &open_session);
    runner.metrics().log_summary();

    result.with_context(|| format!("Fix validation failed for {}", settings.root))?;

    tracing::info!("All fixes are valid");
    Ok(())
}
