//! `qodana-runner run`: Run the inspections container.

use std::path::PathBuf;

use clap::Args;

use qodana_config::settings::{RunOverrides, Settings};
use qodana_tasks::TaskKind;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Only inspect changed files.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub changes: Option<bool>,

    /// Inspection profile to mount into the container.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Disabled plugins list to mount into the container.
    #[arg(long)]
    pub disabled_plugins: Option<PathBuf>,

    /// JVM parameter for the IDE inside the container (repeatable).
    #[arg(long, allow_hyphen_values = true)]
    pub jvm: Vec<String>,

    /// Image to run.
    #[arg(long)]
    pub image: Option<String>,

    /// Name given to the container.
    #[arg(long)]
    pub container: Option<String>,
}

impl RunArgs {
    /// The run task overrides given on the command line.
    #[must_use]
    pub fn overrides(&self) -> RunOverrides {
        RunOverrides {
            image: self.image.clone(),
            container: self.container.clone(),
            profile_path: self.profile.clone(),
            disabled_plugins_path: self.disabled_plugins.clone(),
            jvm_parameters: (!self.jvm.is_empty()).then(|| self.jvm.clone()),
            changes: self.changes,
        }
    }
}

/// Executes the `run` command.
///
/// Runs `updateInspections` first (unless auto-update is off), then the
/// analysis. Blocks until the container exits.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the pull or the
/// analysis fails.
pub fn execute(global: &super::GlobalArgs, args: &RunArgs) -> anyhow::Result<()> {
    let flags = Settings {
        run: args.overrides(),
        ..Settings::default()
    };
    let graph = super::load_graph(global, flags)?;
    let _ = super::run_task(&graph, TaskKind::Run)?;
    Ok(())
}
