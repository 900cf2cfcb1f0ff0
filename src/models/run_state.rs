use std::fmt;

/// The four checks of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Links,
    Filenames,
    SteamIds,
    GogIds,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Self::Links, Self::Filenames, Self::SteamIds, Self::GogIds];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Filenames => "filenames",
            Self::SteamIds => "steam ids",
            Self::GogIds => "gog ids",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    NotStarted,
    Running,
    Passed,
    Failed,
}

impl StageStatus {
    /// Only forward moves are allowed: NotStarted -> Running -> Passed | Failed
    pub fn can_move_to(self, next: StageStatus) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Running)
                | (Self::Running, Self::Passed)
                | (Self::Running, Self::Failed)
        )
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }
}

/// Per-check status of one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    stages: Vec<(Stage, StageStatus)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            stages: Stage::ALL
                .iter()
                .map(|stage| (*stage, StageStatus::NotStarted))
                .collect(),
        }
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, status)| *status)
            .unwrap_or(StageStatus::NotStarted)
    }

    /// Moves `stage` to `next`, returning false for a backwards transition.
    pub fn advance(&mut self, stage: Stage, next: StageStatus) -> bool {
        let Some(entry) = self.stages.iter_mut().find(|(s, _)| *s == stage) else {
            return false;
        };
        if !entry.1.can_move_to(next) {
            tracing::warn!("Ignoring transition of {} from {:?} to {:?}", stage, entry.1, next);
            return false;
        }
        entry.1 = next;
        true
    }

    pub fn all_passed(&self) -> bool {
        self.stages
            .iter()
            .all(|(_, status)| *status == StageStatus::Passed)
    }

    pub fn first_failure(&self) -> Option<Stage> {
        self.stages
            .iter()
            .find(|(_, status)| *status == StageStatus::Failed)
            .map(|(stage, _)| *stage)
    }

    pub fn stages(&self) -> &[(Stage, StageStatus)] {
        &self.stages
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// How the candidate IDs of one platform were reconciled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub candidates: usize,
    /// Matched in the bulk catalog
    pub by_catalog: usize,
    /// Matched through the per-ID or umu database fallback
    pub by_fallback: usize,
    /// GOG IDs matching a Steam fix filename
    pub by_alias: usize,
    pub whitelisted: usize,
    pub requests: usize,
}

impl Resolution {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    pub fn resolved(&self) -> usize {
        self.by_catalog + self.by_fallback + self.by_alias + self.whitelisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_not_started() {
        let report = RunReport::new();
        assert_eq!(report.stages().len(), 4);
        assert_eq!(report.stages()[0].0, Stage::Links);
        assert_eq!(report.stages()[3].0, Stage::GogIds);
        assert!(
            report
                .stages()
                .iter()
                .all(|(_, status)| *status == StageStatus::NotStarted)
        );
        assert!(!report.all_passed());
    }

    #[test]
    fn test_forward_transitions_only() {
        let mut report = RunReport::new();
        assert!(!report.advance(Stage::Links, StageStatus::Passed));
        assert!(report.advance(Stage::Links, StageStatus::Running));
        assert!(report.advance(Stage::Links, StageStatus::Failed));
        assert!(!report.advance(Stage::Links, StageStatus::Running));
        assert_eq!(report.status(Stage::Links), StageStatus::Failed);
        assert_eq!(report.first_failure(), Some(Stage::Links));
    }

    #[test]
    fn test_all_passed() {
        let mut report = RunReport::new();
        for stage in Stage::ALL {
            report.advance(stage, StageStatus::Running);
            report.advance(stage, StageStatus::Passed);
        }
        assert!(report.all_passed());
        assert_eq!(report.first_failure(), None);
    }

    #[test]
    fn test_resolution_totals() {
        let resolution = Resolution {
            candidates: 5,
            by_catalog: 2,
            by_fallback: 1,
            by_alias: 1,
            whitelisted: 1,
            requests: 3,
        };
        assert_eq!(resolution.resolved(), 5);
    }
}
