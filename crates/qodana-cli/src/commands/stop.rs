//! `qodana-runner stop`: Stop the inspections container.

use clap::Args;

use qodana_config::settings::{Settings, StopOverrides};
use qodana_tasks::TaskKind;

/// Arguments for the `stop` command.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// Container to stop instead of the analysis container.
    #[arg(long)]
    pub container: Option<String>,
}

/// Executes the `stop` command.
///
/// The runtime's exit status is ignored: the container may already be gone.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or the runtime cannot be
/// launched at all.
pub fn execute(global: &super::GlobalArgs, args: &StopArgs) -> anyhow::Result<()> {
    tracing::info!("stopping inspections container");
    let flags = Settings {
        stop: StopOverrides {
            container: args.container.clone(),
        },
        ..Settings::default()
    };
    let graph = super::load_graph(global, flags)?;
    let _ = super::run_task(&graph, TaskKind::Stop)?;
    Ok(())
}
