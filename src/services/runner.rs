use crate::error::FixCheckError;
use crate::metrics::RunMetrics;
use crate::models::{RunReport, Settings, Stage, StageStatus};
use crate::services::gog::check_gogfixes;
use crate::services::http::HttpFetch;
use crate::services::layout::{check_filenames, check_links};
use crate::services::steam::{DELISTED_STEAM_APPS, check_steamfixes};

/// Opens the session used for one stage's fallback queries.
pub type SessionFactory<'a> = dyn Fn() -> Result<Box<dyn HttpFetch>, FixCheckError> + 'a;

/// Runs the four checks in order, stopping at the first failure.
pub struct CheckRunner<'a> {
    settings: &'a Settings,
    report: RunReport,
    metrics: RunMetrics,
}

impl<'a> CheckRunner<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            report: RunReport::new(),
            metrics: RunMetrics::new(),
        }
    }

    /// Runs links, filenames, Steam IDs and GOG IDs, in that order.
    ///
    /// `catalog` serves the bulk requests. Each ID stage opens its own
    /// session through `open_session`; the session is dropped when the
    /// stage ends, whether it passed or failed.
    pub fn run(
        &mut self,
        catalog: &dyn HttpFetch,
        open_session: &SessionFactory<'_>,
    ) -> Result<(), FixCheckError> {
        let settings = self.settings;
        let root = settings.root.as_path();
        let metrics = &self.metrics;
        let report = &mut self.report;

        run_stage(report, Stage::Links, || {
            metrics.record_files(check_links(root)?);
            Ok(())
        })?;

        run_stage(report, Stage::Filenames, || {
            check_filenames(root)?;
            Ok(())
        })?;

        run_stage(report, Stage::SteamIds, || {
            let session = open_session()?;
            let resolution = check_steamfixes(
                root,
                &settings.steam_catalog_url,
                &settings.steam_fallback,
                &DELISTED_STEAM_APPS,
                catalog,
                session.as_ref(),
            )?;
            metrics.record_resolution(&resolution);
            Ok(())
        })?;

        run_stage(report, Stage::GogIds, || {
            let session = open_session()?;
            let resolution = check_gogfixes(
                root,
                &settings.gog_catalog_url,
                &settings.umu_database,
                settings.effective_gog_batch_size(),
                catalog,
                session.as_ref(),
            )?;
            metrics.record_resolution(&resolution);
            Ok(())
        })?;

        Ok(())
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}

fn run_stage<F>(report: &mut RunReport, stage: Stage, check: F) -> Result<(), FixCheckError>
where
    F: FnOnce() -> Result<(), FixCheckError>,
{
    tracing::info!("Running {} check", stage);
    report.advance(stage, StageStatus::Running);

    match check() {
        Ok(()) => {
            report.advance(stage, StageStatus::Passed);
            tracing::info!("{} check passed", stage);
            Ok(())
        }
        Err(e) => {
            report.advance(stage, StageStatus::Failed);
            tracing::error!("{} check failed: {}", stage, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::MockHttpFetch;
    use camino::Utf8PathBuf;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn settings_for(files: &[&str]) -> (TempDir, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        (temp_dir, Settings::for_root(root))
    }

    #[test]
    fn test_filename_failure_stops_run() {
        let (_temp_dir, settings) = settings_for(&["gamefixes-steam/notanumber.py"]);
        let mut catalog = MockHttpFetch::new();
        catalog.expect_get().never();
        let opened = Cell::new(0);
        let open_session = || -> Result<Box<dyn HttpFetch>, FixCheckError> {
            opened.set(opened.get() + 1);
            Ok(Box::new(MockHttpFetch::new()))
        };

        let mut runner = CheckRunner::new(&settings);
        let err = runner.run(&catalog, &open_session).unwrap_err();

        assert!(matches!(err, FixCheckError::InvalidSteamFilename(_)));
        assert_eq!(opened.get(), 0);
        assert_eq!(runner.report().status(Stage::Links), StageStatus::Passed);
        assert_eq!(runner.report().status(Stage::Filenames), StageStatus::Failed);
        assert_eq!(runner.report().status(Stage::SteamIds), StageStatus::NotStarted);
        assert_eq!(runner.report().status(Stage::GogIds), StageStatus::NotStarted);
    }

    #[test]
    fn test_session_per_id_stage() {
        let (_temp_dir, settings) = settings_for(&["gamefixes-steam/231990.py"]);
        let catalog = MockHttpFetch::new();
        let opened = Cell::new(0);
        let open_session = || -> Result<Box<dyn HttpFetch>, FixCheckError> {
            opened.set(opened.get() + 1);
            Ok(Box::new(MockHttpFetch::new()))
        };

        let mut runner = CheckRunner::new(&settings);
        runner.run(&catalog, &open_session).unwrap();

        assert_eq!(opened.get(), 2);
        assert!(runner.report().all_passed());
        assert_eq!(runner.metrics().whitelisted(), 1);
    }
}
