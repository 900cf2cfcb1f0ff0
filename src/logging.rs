use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the given debug mode.
///
/// `RUST_LOG`, when set, takes precedence.
pub fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Setup logging to stderr, plus a daily rotating file when `log_dir` is set.
///
/// Stdout stays free for the project path printed by the binary.
///
/// # Arguments
/// * `log_prefix` - Prefix for log files (e.g., "fixcheck")
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `log_dir` - Optional directory for rotated log files
///
/// # Returns
/// The file writer guard, which must be held until the program exits
pub fn setup_logging(
    log_prefix: &str,
    debug_mode: bool,
    log_dir: Option<&Utf8Path>,
) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            ensure_log_dir(dir)?;
            let file_appender = rolling::daily(dir, log_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false) // No ANSI codes in log files
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: prefix={}, debug={}, dir={:?}",
        log_prefix,
        debug_mode,
        log_dir
    );

    Ok(guard)
}

/// Create the log directory if it doesn't exist
fn ensure_log_dir(dir: &Utf8Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_log_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();

        // Only the directory step, to avoid installing a global subscriber
        ensure_log_dir(&log_dir).unwrap();
        assert!(log_dir.exists());

        // Existing directory is fine
        ensure_log_dir(&log_dir).unwrap();
    }

    #[test]
    fn test_env_filter_builds() {
        // Either RUST_LOG or the fallback directive must produce a filter
        let _ = env_filter(true);
        let _ = env_filter(false);
    }
}
