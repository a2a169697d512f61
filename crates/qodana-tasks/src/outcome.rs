//! What a task does, and what happened when it ran.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use qodana_invocation::Invocation;

use crate::kind::TaskKind;

/// The concrete work a task performs once its settings are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Launch the container runtime.
    Container(Invocation),
    /// Remove a directory.
    Clean {
        /// Canonical directory to remove.
        path: PathBuf,
    },
}

/// Result of executing a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The process ran. A non-zero code is only possible for tolerant tasks.
    Executed {
        /// Exit code of the process.
        exit_code: i32,
    },
    /// The task's `only_if` predicate was false.
    Skipped,
    /// The results directory was handled.
    Cleaned {
        /// Directory that was targeted.
        path: PathBuf,
        /// Whether anything was removed.
        removed: bool,
    },
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executed { exit_code: 0 } => write!(f, "done"),
            Self::Executed { exit_code } => write!(f, "done (exit code {exit_code} ignored)"),
            Self::Skipped => write!(f, "skipped"),
            Self::Cleaned {
                path,
                removed: true,
            } => write!(f, "removed {}", path.display()),
            Self::Cleaned {
                path,
                removed: false,
            } => write!(f, "nothing to remove at {}", path.display()),
        }
    }
}

/// A task together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task that ran.
    pub task: TaskKind,
    /// What happened.
    pub outcome: TaskOutcome,
}

/// Description of a task as it would run now, without running it.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTask {
    /// The task.
    pub task: TaskKind,
    /// Registered name.
    pub name: &'static str,
    /// Group the task belongs to.
    pub group: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Registered names of direct dependencies.
    pub depends_on: Vec<&'static str>,
    /// Whether the `only_if` predicates currently hold.
    pub enabled: bool,
    /// The resolved work.
    pub action: TaskAction,
}
