//! `qodana-runner clean`: Remove the results directory.

use clap::Args;

use qodana_config::settings::Settings;
use qodana_tasks::TaskKind;

/// Arguments for the `clean` command.
#[derive(Args, Debug)]
pub struct CleanArgs {}

/// Executes the `clean` command.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the directory cannot
/// be removed.
pub fn execute(global: &super::GlobalArgs, _args: &CleanArgs) -> anyhow::Result<()> {
    let graph = super::load_graph(global, Settings::default())?;
    let _ = super::run_task(&graph, TaskKind::Clean)?;
    Ok(())
}
