//! `qodana-runner update`: Pull the latest inspections image.

use clap::Args;

use qodana_config::settings::{Settings, UpdateOverrides};
use qodana_tasks::TaskKind;

/// Arguments for the `update` command.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Image to pull instead of the analysis image.
    #[arg(long)]
    pub image: Option<String>,
}

/// Executes the `update` command.
///
/// Skipped when auto-update is disabled.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the pull fails.
pub fn execute(global: &super::GlobalArgs, args: &UpdateArgs) -> anyhow::Result<()> {
    let flags = Settings {
        update: UpdateOverrides {
            image: args.image.clone(),
        },
        ..Settings::default()
    };
    let graph = super::load_graph(global, flags)?;
    let _ = super::run_task(&graph, TaskKind::Update)?;
    Ok(())
}
