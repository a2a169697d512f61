//! CLI command definitions and dispatch.

pub mod clean;
pub mod plan;
pub mod run;
pub mod stop;
pub mod update;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use qodana_common::constants;
use qodana_config::QodanaExtension;
use qodana_config::settings::{ExtensionSettings, Settings};
use qodana_runtime::{DockerCli, FsResultsCleaner};
use qodana_tasks::{ContainerLifecycle, TaskGraph, TaskKind, TaskReport};

/// qodana-runner: Qodana inspections in a container.
#[derive(Parser, Debug)]
#[command(name = "qodana-runner", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Project-wide settings.
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Settings shared by every subcommand. Each one overrides the settings file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Settings file (defaults to `qodana-runner.yaml` in the project directory).
    #[arg(long, global = true, env = "QODANA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Container runtime executable.
    #[arg(long, global = true, env = "QODANA_EXECUTABLE")]
    pub executable: Option<String>,

    /// Project directory (defaults to the current directory).
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Results directory.
    #[arg(long, global = true)]
    pub results: Option<PathBuf>,

    /// Cache directory shared between runs.
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Save the HTML report.
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true")]
    pub save_report: Option<bool>,

    /// Serve the HTML report.
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true")]
    pub show_report: Option<bool>,

    /// Host port the report is exposed on.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Pull the image before running.
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true")]
    pub auto_update: Option<bool>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl GlobalArgs {
    fn extension_settings(&self) -> ExtensionSettings {
        ExtensionSettings {
            executable: self.executable.clone(),
            project_path: self.project.clone(),
            results_path: self.results.clone(),
            cache_path: self.cache.clone(),
            save_report: self.save_report,
            show_report: self.show_report,
            show_report_port: self.port,
            auto_update: self.auto_update,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull the latest inspections image.
    Update(update::UpdateArgs),
    /// Run the inspections container.
    Run(run::RunArgs),
    /// Stop the inspections container.
    Stop(stop::StopArgs),
    /// Remove the results directory.
    Clean(clean::CleanArgs),
    /// Show what a task would do, without running it.
    Plan(plan::PlanArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded or a fatal task fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Update(args) => update::execute(&cli.global, &args),
        Command::Run(args) => run::execute(&cli.global, &args),
        Command::Stop(args) => stop::execute(&cli.global, &args),
        Command::Clean(args) => clean::execute(&cli.global, &args),
        Command::Plan(args) => plan::execute(&cli.global, &args),
    }
}

/// Registers the task graph and applies the settings file, then `flags`.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or parsed.
pub fn load_graph(global: &GlobalArgs, flags: Settings) -> anyhow::Result<TaskGraph> {
    let project_dir = match &global.project {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let file = match &global.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_optional(&project_dir.join(constants::DEFAULT_SETTINGS_FILE))?
            .unwrap_or_default(),
    };
    let flags = Settings {
        qodana: global.extension_settings(),
        ..flags
    };

    let extension = QodanaExtension::new(&project_dir);
    let graph = TaskGraph::register(&extension);
    graph.apply(&file.merge(flags));
    Ok(graph)
}

/// Executes `kind` with the production executor and prints the outcome.
///
/// # Errors
///
/// Returns an error if the task graph fails.
pub fn run_task(graph: &TaskGraph, kind: TaskKind) -> anyhow::Result<Vec<TaskReport>> {
    let reports = graph.execute(kind, &DockerCli::new(), &FsResultsCleaner)?;
    crate::output::print_reports(&reports);
    let state = ContainerLifecycle::default().replay(&reports);
    tracing::debug!(%state, "container lifecycle");
    Ok(reports)
}
