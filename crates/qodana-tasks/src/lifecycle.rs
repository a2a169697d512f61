//! Container lifecycle as observed through task outcomes.
//!
//! ```text
//!   NoImage          --update--> ImagePresent
//!   ImagePresent     --run-----> ContainerStarted
//!   ContainerStarted --stop----> ContainerAbsent   (also when already absent)
//!   any              --clean---> unchanged
//! ```
//!
//! Skipped tasks leave the state unchanged.

use std::fmt;

use crate::kind::TaskKind;
use crate::outcome::{TaskOutcome, TaskReport};

/// Where the inspections container stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerLifecycle {
    /// Nothing pulled yet in this session.
    #[default]
    NoImage,
    /// The image has been pulled.
    ImagePresent,
    /// The analysis container ran (it may have exited since).
    ContainerStarted,
    /// The container has been stopped or was never there.
    ContainerAbsent,
}

impl ContainerLifecycle {
    /// The state after `report`.
    #[must_use]
    pub const fn advance(self, report: &TaskReport) -> Self {
        if matches!(report.outcome, TaskOutcome::Skipped) {
            return self;
        }
        match report.task {
            TaskKind::Update => Self::ImagePresent,
            TaskKind::Run => Self::ContainerStarted,
            TaskKind::Stop => Self::ContainerAbsent,
            TaskKind::Clean => self,
        }
    }

    /// The state after applying `reports` in order, starting from `self`.
    #[must_use]
    pub fn replay(self, reports: &[TaskReport]) -> Self {
        reports.iter().fold(self, |state, report| state.advance(report))
    }
}

impl fmt::Display for ContainerLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => write!(f, "no image"),
            Self::ImagePresent => write!(f, "image present"),
            Self::ContainerStarted => write!(f, "container started"),
            Self::ContainerAbsent => write!(f, "container absent"),
        }
    }
}
