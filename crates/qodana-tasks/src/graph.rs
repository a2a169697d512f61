//! The task graph.
//!
//! Dependency edges and `only_if` predicates are separate concerns. Edges
//! are fixed at registration and decide ordering; predicates are evaluated
//! when a task is about to execute and decide whether it does anything.
//! `runInspections` always depends on `updateInspections`, even when
//! `auto_update` is off and the update is skipped.

use std::collections::{BTreeMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};

use qodana_common::constants;
use qodana_common::error::{QodanaError, Result};
use qodana_config::QodanaExtension;
use qodana_config::settings::Settings;
use qodana_invocation::builder;
use qodana_runtime::{ProcessExecutor, ProcessOutput, ResultsCleaner};

use crate::kind::TaskKind;
use crate::outcome::{PlannedTask, TaskAction, TaskOutcome, TaskReport};
use crate::task::{CleanTask, RunTask, StopTask, UpdateTask};

type Predicate = Box<dyn Fn() -> bool>;

/// The registered inspection tasks and their ordering.
pub struct TaskGraph {
    graph: DiGraph<TaskKind, ()>,
    nodes: BTreeMap<TaskKind, NodeIndex>,
    predicates: BTreeMap<TaskKind, Vec<Predicate>>,
    extension: QodanaExtension,
    update: UpdateTask,
    run: RunTask,
    stop: StopTask,
    clean: CleanTask,
}

impl TaskGraph {
    /// Registers the four tasks against `extension`.
    ///
    /// Cross-task conventions are wired here, once: update reads run's
    /// image, stop reads run's container, clean reads run's results
    /// directory.
    #[must_use]
    pub fn register(extension: &QodanaExtension) -> Self {
        let run = RunTask::new(extension);
        let update = UpdateTask::new(extension, &run);
        let stop = StopTask::new(extension, &run);
        let clean = CleanTask::new(&run);

        let mut graph = DiGraph::new();
        let nodes: BTreeMap<_, _> = TaskKind::ALL
            .into_iter()
            .map(|kind| (kind, graph.add_node(kind)))
            .collect();

        let mut this = Self {
            graph,
            nodes,
            predicates: BTreeMap::new(),
            extension: extension.clone(),
            update,
            run,
            stop,
            clean,
        };
        this.add_dependency(TaskKind::Run, TaskKind::Update);

        let auto_update = extension.auto_update.clone();
        this.only_if(TaskKind::Update, move || auto_update.get_or_else(true));

        tracing::debug!(group = constants::GROUP_NAME, "registered inspection tasks");
        this
    }

    /// Adds a dependency edge: `dependent` runs after `dependency`.
    pub fn add_dependency(&mut self, dependent: TaskKind, dependency: TaskKind) {
        let _ = self
            .graph
            .update_edge(self.nodes[&dependency], self.nodes[&dependent], ());
    }

    /// Adds an execution-time predicate. A task runs only if all of its
    /// predicates hold.
    pub fn only_if(&mut self, kind: TaskKind, predicate: impl Fn() -> bool + 'static) {
        self.predicates
            .entry(kind)
            .or_default()
            .push(Box::new(predicate));
    }

    /// Applies a settings layer on top of the current values.
    pub fn apply(&self, settings: &Settings) {
        self.extension.apply(&settings.qodana);
        self.update.image.set_if_some(settings.update.image.clone());
        self.run.apply(&settings.run);
        self.stop.container.set_if_some(settings.stop.container.clone());
    }

    /// The project-wide settings.
    #[must_use]
    pub const fn extension(&self) -> &QodanaExtension {
        &self.extension
    }

    /// The image pull task.
    #[must_use]
    pub const fn update(&self) -> &UpdateTask {
        &self.update
    }

    /// The analysis task.
    #[must_use]
    pub const fn run(&self) -> &RunTask {
        &self.run
    }

    /// The container stop task.
    #[must_use]
    pub const fn stop(&self) -> &StopTask {
        &self.stop
    }

    /// The results cleanup task.
    #[must_use]
    pub const fn clean(&self) -> &CleanTask {
        &self.clean
    }

    /// Direct dependencies of `kind`.
    #[must_use]
    pub fn dependencies_of(&self, kind: TaskKind) -> Vec<TaskKind> {
        let mut deps: Vec<TaskKind> = self
            .graph
            .neighbors_directed(self.nodes[&kind], Direction::Incoming)
            .map(|idx| self.graph[idx])
            .collect();
        deps.sort();
        deps
    }

    /// `kind` and its transitive dependencies, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains a cycle.
    pub fn execution_plan(&self, kind: TaskKind) -> Result<Vec<TaskKind>> {
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, self.nodes[&kind]);
        let mut required = HashSet::new();
        while let Some(idx) = dfs.next(reversed) {
            let _ = required.insert(idx);
        }

        let order = petgraph::algo::toposort(&self.graph, None).map_err(|_cycle| {
            QodanaError::Config {
                message: "cyclic dependency detected in task graph".into(),
            }
        })?;
        Ok(order
            .into_iter()
            .filter(|idx| required.contains(idx))
            .map(|idx| self.graph[idx])
            .collect())
    }

    /// Whether all `only_if` predicates of `kind` currently hold.
    #[must_use]
    pub fn is_enabled(&self, kind: TaskKind) -> bool {
        self.predicates
            .get(&kind)
            .is_none_or(|predicates| predicates.iter().all(|p| p()))
    }

    /// Resolves the task's settings and builds its work.
    ///
    /// Resolution happens on every call, so it reflects the latest values.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is unresolved.
    pub fn action(&self, kind: TaskKind) -> Result<TaskAction> {
        Ok(match kind {
            TaskKind::Update => {
                TaskAction::Container(builder::build_update(&self.update.resolve()?))
            }
            TaskKind::Run => TaskAction::Container(builder::build_run(&self.run.resolve()?)),
            TaskKind::Stop => TaskAction::Container(builder::build_stop(&self.stop.resolve()?)),
            TaskKind::Clean => TaskAction::Clean {
                path: builder::clean_target(&self.clean.resolve()?),
            },
        })
    }

    /// Describes `kind` as it would execute now. Launches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is unresolved.
    pub fn describe(&self, kind: TaskKind) -> Result<PlannedTask> {
        Ok(PlannedTask {
            task: kind,
            name: kind.name(),
            group: constants::GROUP_NAME,
            description: kind.description(),
            depends_on: self
                .dependencies_of(kind)
                .into_iter()
                .map(TaskKind::name)
                .collect(),
            enabled: self.is_enabled(kind),
            action: self.action(kind)?,
        })
    }

    /// Executes `kind` and its dependencies in order.
    ///
    /// Stops at the first failure. A failed update or run is fatal; the
    /// stop task's exit status never is.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is unresolved, a process cannot be
    /// launched, a fatal process exits non-zero, or cleanup fails.
    pub fn execute(
        &self,
        kind: TaskKind,
        executor: &dyn ProcessExecutor,
        cleaner: &dyn ResultsCleaner,
    ) -> Result<Vec<TaskReport>> {
        let plan = self.execution_plan(kind)?;
        tracing::info!(
            target_task = kind.name(),
            plan = ?plan.iter().map(|k| k.name()).collect::<Vec<_>>(),
            "executing task graph"
        );

        // Every task in the plan is resolved before the first process starts.
        let actions = plan
            .into_iter()
            .map(|task| self.action(task).map(|action| (task, action)))
            .collect::<Result<Vec<_>>>()?;

        let mut reports = Vec::with_capacity(actions.len());
        for (task, action) in actions {
            let outcome = self.execute_task(task, action, executor, cleaner)?;
            tracing::info!(task = task.name(), %outcome, "task finished");
            reports.push(TaskReport { task, outcome });
        }
        Ok(reports)
    }

    fn execute_task(
        &self,
        kind: TaskKind,
        action: TaskAction,
        executor: &dyn ProcessExecutor,
        cleaner: &dyn ResultsCleaner,
    ) -> Result<TaskOutcome> {
        if !self.is_enabled(kind) {
            tracing::info!(task = kind.name(), "skipping, only_if predicate is false");
            return Ok(TaskOutcome::Skipped);
        }

        match action {
            TaskAction::Container(invocation) => {
                tracing::info!(
                    task = kind.name(),
                    command = %invocation.display_line(),
                    "starting"
                );
                let output = executor.execute(&invocation)?;
                check_exit_status(kind, &output)
            }
            TaskAction::Clean { path } => {
                let removed = cleaner.clean(&path)?;
                Ok(TaskOutcome::Cleaned { path, removed })
            }
        }
    }
}

/// Maps a process exit to an outcome according to the task's policy.
fn check_exit_status(kind: TaskKind, output: &ProcessOutput) -> Result<TaskOutcome> {
    if output.success() {
        return Ok(TaskOutcome::Executed { exit_code: 0 });
    }
    if kind.ignores_exit_status() {
        tracing::warn!(
            task = kind.name(),
            exit_code = output.exit_code,
            "ignoring non-zero exit status"
        );
        return Ok(TaskOutcome::Executed {
            exit_code: output.exit_code,
        });
    }
    Err(QodanaError::ProcessFailure {
        task: kind.name(),
        exit_code: output.exit_code,
        output: output.combined(),
    })
}

impl std::fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.graph.edge_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use qodana_invocation::{ContainerAction, Invocation};
    use qodana_runtime::FsResultsCleaner;

    use super::*;

    /// Records invocations and answers with a fixed exit code.
    struct RecordingExecutor {
        exit_code: i32,
        seen: RefCell<Vec<Invocation>>,
    }

    impl RecordingExecutor {
        fn new(exit_code: i32) -> Self {
            Self {
                exit_code,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn actions(&self) -> Vec<ContainerAction> {
            self.seen.borrow().iter().map(|i| i.action.clone()).collect()
        }
    }

    impl ProcessExecutor for RecordingExecutor {
        fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.seen.borrow_mut().push(invocation.clone());
            Ok(ProcessOutput {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: "container error".into(),
            })
        }
    }

    fn graph_for(dir: &Path) -> TaskGraph {
        TaskGraph::register(&QodanaExtension::new(dir))
    }

    #[test]
    fn run_depends_on_update() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        assert_eq!(graph.dependencies_of(TaskKind::Run), vec![TaskKind::Update]);
        assert!(graph.dependencies_of(TaskKind::Stop).is_empty());
        assert!(graph.dependencies_of(TaskKind::Clean).is_empty());
        assert!(graph.dependencies_of(TaskKind::Update).is_empty());
    }

    #[test]
    fn run_plan_puts_update_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        assert_eq!(
            graph.execution_plan(TaskKind::Run).expect("plan"),
            vec![TaskKind::Update, TaskKind::Run]
        );
        assert_eq!(
            graph.execution_plan(TaskKind::Stop).expect("plan"),
            vec![TaskKind::Stop]
        );
    }

    #[test]
    fn disabling_auto_update_keeps_edge_but_skips_update() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph.extension().auto_update.set(false);

        assert_eq!(graph.dependencies_of(TaskKind::Run), vec![TaskKind::Update]);
        assert!(!graph.is_enabled(TaskKind::Update));

        let executor = RecordingExecutor::new(0);
        let reports = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .expect("execute");
        assert_eq!(reports[0].task, TaskKind::Update);
        assert_eq!(reports[0].outcome, TaskOutcome::Skipped);
        assert_eq!(reports[1].task, TaskKind::Run);
        assert_eq!(executor.seen.borrow().len(), 1);
    }

    #[test]
    fn predicate_is_evaluated_at_execution_time() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        assert!(graph.is_enabled(TaskKind::Update));
        graph.extension().auto_update.set(false);
        assert!(!graph.is_enabled(TaskKind::Update));
        graph.extension().auto_update.set(true);
        assert!(graph.is_enabled(TaskKind::Update));
    }

    #[test]
    fn run_executes_pull_then_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        let executor = RecordingExecutor::new(0);

        let reports = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .expect("execute");
        assert_eq!(reports.len(), 2);
        assert_eq!(
            executor.actions(),
            vec![
                ContainerAction::Pull {
                    image: "jetbrains/qodana".into()
                },
                ContainerAction::Run {
                    image: "jetbrains/qodana".into(),
                    container: "idea-inspections".into()
                },
            ]
        );
    }

    #[test]
    fn failed_update_aborts_before_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        let executor = RecordingExecutor::new(1);

        let err = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .unwrap_err();
        match err {
            QodanaError::ProcessFailure {
                task,
                exit_code,
                output,
            } => {
                assert_eq!(task, "updateInspections");
                assert_eq!(exit_code, 1);
                assert_eq!(output, "container error");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(executor.seen.borrow().len(), 1);
    }

    #[test]
    fn failed_run_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph.extension().auto_update.set(false);
        let executor = RecordingExecutor::new(125);

        let err = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .unwrap_err();
        assert!(
            matches!(
                err,
                QodanaError::ProcessFailure { task: "runInspections", exit_code: 125, .. }
            ),
            "got: {err}"
        );
    }

    #[test]
    fn unresolved_run_settings_fail_before_any_launch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph
            .extension()
            .results_path
            .set_convention(qodana_config::Provider::absent());
        let executor = RecordingExecutor::new(0);

        let err = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .unwrap_err();
        assert!(
            matches!(err, QodanaError::Missing { property: "run.results_dir" }),
            "got: {err}"
        );
        assert!(executor.seen.borrow().is_empty(), "pull must not start");
    }

    #[test]
    fn missing_project_path_fails_before_any_launch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph
            .extension()
            .project_path
            .set_convention(qodana_config::Provider::absent());
        let executor = RecordingExecutor::new(0);

        let err = graph
            .execute(TaskKind::Run, &executor, &FsResultsCleaner)
            .unwrap_err();
        assert!(
            matches!(err, QodanaError::Missing { property: "run.project_dir" }),
            "got: {err}"
        );
        assert!(executor.seen.borrow().is_empty());
    }

    #[test]
    fn clean_refuses_results_path_pointing_at_project() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("src")).expect("mkdir");
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {}").expect("write");
        let graph = graph_for(dir.path());
        graph.apply(&Settings::from_yaml("qodana:\n  results_path: .\n").expect("parse"));

        let err = graph
            .execute(TaskKind::Clean, &RecordingExecutor::new(0), &FsResultsCleaner)
            .unwrap_err();
        assert!(matches!(err, QodanaError::Config { .. }), "got: {err}");
        assert!(dir.path().join("src/main.rs").exists());
    }

    #[test]
    fn stop_never_fails_on_exit_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        for code in 0..=255 {
            let executor = RecordingExecutor::new(code);
            let reports = graph
                .execute(TaskKind::Stop, &executor, &FsResultsCleaner)
                .expect("stop must not fail");
            assert_eq!(
                reports[0].outcome,
                TaskOutcome::Executed { exit_code: code }
            );
        }
    }

    #[test]
    fn stop_targets_run_container() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph.run().container.set("custom".into());
        let executor = RecordingExecutor::new(0);
        let _ = graph
            .execute(TaskKind::Stop, &executor, &FsResultsCleaner)
            .expect("execute");
        assert_eq!(
            executor.actions(),
            vec![ContainerAction::Stop {
                container: "custom".into()
            }]
        );
    }

    #[test]
    fn clean_removes_run_results_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        let results = graph.run().resolve().expect("resolve").results_dir;
        std::fs::create_dir_all(results.join("report")).expect("mkdir");

        let executor = RecordingExecutor::new(0);
        let reports = graph
            .execute(TaskKind::Clean, &executor, &FsResultsCleaner)
            .expect("execute");
        assert_eq!(
            reports[0].outcome,
            TaskOutcome::Cleaned {
                path: results.clone(),
                removed: true
            }
        );
        assert!(!results.exists());
        assert!(executor.seen.borrow().is_empty());
    }

    #[test]
    fn apply_layers_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        let settings = Settings::from_yaml(
            "qodana:\n  show_report_port: 9090\n\
             run:\n  changes: true\n\
             stop:\n  container: pinned\n",
        )
        .expect("parse");
        graph.apply(&settings);

        let run = graph.run().resolve().expect("resolve");
        assert_eq!(run.show_report_port, 9090);
        assert!(run.changes);
        assert_eq!(graph.stop().resolve().expect("resolve").container, "pinned");
    }

    #[test]
    fn describe_reports_dependencies_and_predicate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph.extension().auto_update.set(false);

        let run = graph.describe(TaskKind::Run).expect("describe");
        assert_eq!(run.depends_on, vec!["updateInspections"]);
        assert!(run.enabled);
        assert_eq!(run.group, "qodana");

        let update = graph.describe(TaskKind::Update).expect("describe");
        assert!(!update.enabled);

        let json = serde_json::to_value(&run).expect("serialize");
        assert_eq!(json["name"], "runInspections");
    }

    #[test]
    fn clean_action_matches_run_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = graph_for(dir.path());
        graph.extension().results_path.set(PathBuf::from("reports/qodana"));
        let run = graph.run().resolve().expect("resolve");
        assert_eq!(
            graph.action(TaskKind::Clean).expect("action"),
            TaskAction::Clean {
                path: run.results_dir
            }
        );
    }
}
