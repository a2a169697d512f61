//! Resolved per-task settings.
//!
//! Each struct is the result of one resolution pass over a task node's
//! properties. Snapshots are rebuilt on every pass and never cached.

use std::path::PathBuf;

use serde::Serialize;

/// Resolved settings of the image pull task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSettings {
    /// Container runtime executable.
    pub executable: String,
    /// Image to pull.
    pub image: String,
}

/// Resolved settings of the analysis task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSettings {
    /// Container runtime executable.
    pub executable: String,
    /// Image to run.
    pub image: String,
    /// Name given to the container.
    pub container: String,
    /// Analysed project directory.
    pub project_dir: PathBuf,
    /// Results directory.
    pub results_dir: PathBuf,
    /// Cache directory, if any.
    pub cache_dir: Option<PathBuf>,
    /// Inspection profile, if any.
    pub profile_path: Option<PathBuf>,
    /// Disabled plugins list, if any.
    pub disabled_plugins_path: Option<PathBuf>,
    /// Save the HTML report.
    pub save_report: bool,
    /// Serve the HTML report.
    pub show_report: bool,
    /// Host port for the report.
    pub show_report_port: u16,
    /// JVM parameters for the IDE inside the container.
    pub jvm_parameters: Vec<String>,
    /// Only inspect changed files.
    pub changes: bool,
}

/// Resolved settings of the container stop task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopSettings {
    /// Container runtime executable.
    pub executable: String,
    /// Container to stop.
    pub container: String,
}

/// Resolved settings of the results cleanup task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanSettings {
    /// Directory to remove.
    pub results_dir: PathBuf,
}
