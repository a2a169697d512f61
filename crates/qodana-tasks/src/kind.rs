//! Task identities.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use qodana_common::constants;
use qodana_common::error::QodanaError;

/// One of the four inspection tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Pulls the inspections image.
    Update,
    /// Runs the inspections container.
    Run,
    /// Stops the inspections container.
    Stop,
    /// Removes the results directory.
    Clean,
}

impl TaskKind {
    /// All tasks in registration order.
    pub const ALL: [Self; 4] = [Self::Update, Self::Run, Self::Stop, Self::Clean];

    /// Registered task name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Update => constants::UPDATE_INSPECTIONS_TASK_NAME,
            Self::Run => constants::RUN_INSPECTIONS_TASK_NAME,
            Self::Stop => constants::STOP_INSPECTIONS_TASK_NAME,
            Self::Clean => constants::CLEAN_INSPECTIONS_TASK_NAME,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Update => "Pulls the latest Qodana Inspections Docker container",
            Self::Run => "Starts Qodana Inspections in Docker container",
            Self::Stop => "Stops Qodana Inspections Docker container",
            Self::Clean => "Cleans up Qodana Inspections output directory",
        }
    }

    /// Whether a non-zero exit status of this task's process is tolerated.
    ///
    /// Only the stop task: the container may already be gone.
    #[must_use]
    pub const fn ignores_exit_status(self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = QodanaError;

    /// Accepts the short form (`run`) or the registered name (`runInspections`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| {
                let short = format!("{kind:?}");
                s.eq_ignore_ascii_case(&short) || s == kind.name()
            })
            .ok_or_else(|| QodanaError::Config {
                message: format!("unknown task: {s}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names() {
        let names: Vec<_> = TaskKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "updateInspections",
                "runInspections",
                "stopInspections",
                "cleanInspections"
            ]
        );
    }

    #[test]
    fn only_stop_ignores_exit_status() {
        let tolerant: Vec<_> = TaskKind::ALL
            .into_iter()
            .filter(|k| k.ignores_exit_status())
            .collect();
        assert_eq!(tolerant, vec![TaskKind::Stop]);
    }

    #[test]
    fn parses_short_and_registered_names() {
        assert_eq!("run".parse::<TaskKind>().expect("parse"), TaskKind::Run);
        assert_eq!("Clean".parse::<TaskKind>().expect("parse"), TaskKind::Clean);
        assert_eq!(
            "stopInspections".parse::<TaskKind>().expect("parse"),
            TaskKind::Stop
        );
        assert!("deploy".parse::<TaskKind>().is_err());
    }
}
