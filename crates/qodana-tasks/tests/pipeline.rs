//! End-to-end pipeline: settings file, task graph, and a scripted executor.

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use qodana_common::error::{QodanaError, Result};
use qodana_config::QodanaExtension;
use qodana_config::settings::{ExtensionSettings, RunOverrides, Settings};
use qodana_invocation::Invocation;
use qodana_runtime::{FsResultsCleaner, ProcessExecutor, ProcessOutput};
use qodana_tasks::{TaskGraph, TaskKind, TaskOutcome};

/// Answers each launch with the next scripted exit code and records the
/// rendered command line.
struct ScriptedExecutor {
    exit_codes: RefCell<VecDeque<i32>>,
    command_lines: RefCell<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    fn new(exit_codes: &[i32]) -> Self {
        Self {
            exit_codes: RefCell::new(exit_codes.iter().copied().collect()),
            command_lines: RefCell::new(Vec::new()),
        }
    }
}

impl ProcessExecutor for ScriptedExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut line = vec![invocation.executable.clone()];
        line.extend(invocation.command_line());
        self.command_lines.borrow_mut().push(line);
        let exit_code = self.exit_codes.borrow_mut().pop_front().unwrap_or(0);
        Ok(ProcessOutput {
            exit_code,
            stdout: String::new(),
            stderr: format!("exit {exit_code}"),
        })
    }
}

fn load_graph(project: &Path, yaml: &str) -> TaskGraph {
    let path = project.join("qodana-runner.yaml");
    std::fs::write(&path, yaml).expect("write settings");
    let settings = Settings::load(&path).expect("load settings");

    let graph = TaskGraph::register(&QodanaExtension::new(project));
    graph.apply(&settings);
    graph
}

#[test]
fn settings_file_drives_full_run_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = std::fs::canonicalize(dir.path()).expect("canonicalize");
    std::fs::write(root.join("profile.xml"), "<profile/>").expect("write profile");

    let graph = load_graph(
        dir.path(),
        concat!(
            "qodana:\n  cache_path: .cache\n  save_report: true\n  show_report_port: 9090\n",
            "run:\n  profile_path: profile.xml\n",
            "  jvm_parameters: ['-Xmx2g', '-Dfoo=bar']\n  changes: true\n",
        ),
    );
    let executor = ScriptedExecutor::new(&[0, 0]);
    let reports = graph
        .execute(TaskKind::Run, &executor, &FsResultsCleaner)
        .expect("execute");
    assert_eq!(reports.len(), 2);

    let lines = executor.command_lines.borrow();
    assert_eq!(lines[0], vec!["docker", "pull", "jetbrains/qodana"]);

    let project = root.display().to_string();
    let expected: Vec<String> = vec![
        "docker".into(),
        "run".into(),
        "--rm".into(),
        "--name".into(),
        "idea-inspections".into(),
        "-p".into(),
        "9090:8080".into(),
        "-v".into(),
        format!("{project}:/data/project"),
        "-v".into(),
        format!("{}:/data/results", root.join("build/results").display()),
        "-v".into(),
        format!("{}:/data/cache", root.join(".cache").display()),
        "-v".into(),
        format!("{}:/data/profile.xml", root.join("profile.xml").display()),
        "-e".into(),
        "--save-report".into(),
        "-e".into(),
        "IDE_PROPERTIES_PROPERTY=-Xmx2g -Dfoo=bar".into(),
        "jetbrains/qodana".into(),
        "-changes".into(),
    ];
    assert_eq!(lines[1], expected);
}

#[test]
fn flags_override_settings_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = load_graph(dir.path(), "qodana:\n  auto_update: true\n  show_report_port: 9090\n");

    graph.apply(&Settings {
        qodana: ExtensionSettings {
            auto_update: Some(false),
            ..ExtensionSettings::default()
        },
        run: RunOverrides {
            container: Some("ci-inspections".into()),
            ..RunOverrides::default()
        },
        ..Settings::default()
    });

    let executor = ScriptedExecutor::new(&[0]);
    let reports = graph
        .execute(TaskKind::Run, &executor, &FsResultsCleaner)
        .expect("execute");
    assert_eq!(reports[0].outcome, TaskOutcome::Skipped);

    let lines = executor.command_lines.borrow();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(&"9090:8080".to_string()));
    assert!(lines[0].contains(&"ci-inspections".to_string()));
    drop(lines);

    let stop = ScriptedExecutor::new(&[1]);
    let _ = graph
        .execute(TaskKind::Stop, &stop, &FsResultsCleaner)
        .expect("stop tolerates failure");
    assert_eq!(
        stop.command_lines.borrow()[0],
        vec!["docker", "stop", "ci-inspections"]
    );
}

#[test]
fn lifecycle_update_run_stop_clean() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = load_graph(dir.path(), "");
    let executor = ScriptedExecutor::new(&[0, 0, 137]);

    let _ = graph
        .execute(TaskKind::Run, &executor, &FsResultsCleaner)
        .expect("run");
    let results = graph.run().resolve().expect("resolve").results_dir;
    std::fs::create_dir_all(&results).expect("simulate container output");
    std::fs::write(results.join("qodana.sarif.json"), "{}").expect("write");

    let stop = graph
        .execute(TaskKind::Stop, &executor, &FsResultsCleaner)
        .expect("stop");
    assert_eq!(stop[0].outcome, TaskOutcome::Executed { exit_code: 137 });

    let clean = graph
        .execute(TaskKind::Clean, &executor, &FsResultsCleaner)
        .expect("clean");
    assert!(matches!(clean[0].outcome, TaskOutcome::Cleaned { removed: true, .. }));
    assert!(!results.exists());
    assert_eq!(executor.command_lines.borrow().len(), 3);
}

#[test]
fn failing_pull_reports_captured_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let graph = load_graph(dir.path(), "run:\n  image: jetbrains/qodana:missing\n");
    let executor = ScriptedExecutor::new(&[1]);

    let err = graph
        .execute(TaskKind::Run, &executor, &FsResultsCleaner)
        .unwrap_err();
    assert!(matches!(err, QodanaError::ProcessFailure { task: "updateInspections", .. }));
    assert!(err.to_string().contains("exit 1"), "got: {err}");
    assert_eq!(
        executor.command_lines.borrow()[0],
        vec!["docker", "pull", "jetbrains/qodana:missing"]
    );
}

#[test]
fn invalid_settings_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("qodana-runner.yaml");
    std::fs::write(&path, "qodana:\n  autoUpdate: false\n").expect("write");
    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, QodanaError::Yaml { .. }), "got: {err}");
}
