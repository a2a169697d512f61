//! `qodana-runner plan`: Show what a task would do, without running it.

use clap::Args;

use qodana_config::settings::Settings;
use qodana_tasks::{PlannedTask, TaskAction, TaskKind};

use super::run::RunArgs;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Task to plan (`update`, `run`, `stop`, `clean`, or a registered name).
    #[arg(default_value = "run")]
    pub task: String,

    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,

    /// Run task overrides, as accepted by `run`.
    #[command(flatten)]
    pub run: RunArgs,
}

/// Executes the `plan` command.
///
/// Resolves settings for the task and its dependencies and prints the
/// invocations they would launch.
///
/// # Errors
///
/// Returns an error if the task is unknown or settings cannot be resolved.
#[allow(clippy::print_stdout)]
pub fn execute(global: &super::GlobalArgs, args: &PlanArgs) -> anyhow::Result<()> {
    let kind: TaskKind = args.task.parse()?;
    let flags = Settings {
        run: args.run.overrides(),
        ..Settings::default()
    };
    let graph = super::load_graph(global, flags)?;

    let planned = graph
        .execution_plan(kind)?
        .into_iter()
        .map(|task| graph.describe(task))
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&planned)?);
        return Ok(());
    }

    println!("Plan for: {}", kind.name());
    println!("{}", "\u{2550}".repeat(40));
    println!();
    for task in &planned {
        for line in render(task) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Text lines describing one planned task.
fn render(task: &PlannedTask) -> Vec<String> {
    let marker = if task.enabled { "+" } else { "-" };
    let mut lines = vec![format!("  {marker} {} ({})", task.name, task.description)];
    if !task.depends_on.is_empty() {
        lines.push(format!("      depends on: {}", task.depends_on.join(", ")));
    }
    if !task.enabled {
        lines.push("      skipped: only_if predicate is false".to_string());
    }
    match &task.action {
        TaskAction::Container(invocation) => {
            lines.push(format!("      command: {}", invocation.display_line()));
        }
        TaskAction::Clean { path } => {
            lines.push(format!("      remove: {}", path.display()));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use qodana_config::QodanaExtension;
    use qodana_tasks::TaskGraph;

    use super::*;

    #[test]
    fn render_marks_skipped_update() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = TaskGraph::register(&QodanaExtension::new(dir.path()));
        graph.extension().auto_update.set(false);

        let lines = render(&graph.describe(TaskKind::Update).expect("describe"));
        assert!(lines[0].starts_with("  - updateInspections"), "got: {lines:?}");
        assert!(lines.iter().any(|l| l.contains("skipped")));
        assert!(lines.iter().any(|l| l.contains("docker pull jetbrains/qodana")));
    }

    #[test]
    fn render_lists_run_dependency() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = TaskGraph::register(&QodanaExtension::new(dir.path()));

        let lines = render(&graph.describe(TaskKind::Run).expect("describe"));
        assert!(lines[0].starts_with("  + runInspections"), "got: {lines:?}");
        assert!(lines.iter().any(|l| l.contains("depends on: updateInspections")));
        assert!(lines.iter().any(|l| l.contains("--name idea-inspections")));
    }
}
