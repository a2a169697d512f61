//! Synchronous process execution for container runtime invocations.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use qodana_common::error::{QodanaError, Result};
use qodana_invocation::Invocation;

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (`-1` when the process was terminated by a signal).
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with code zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output followed by standard error, for error reports.
    #[must_use]
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// Runs invocations to completion.
///
/// Implementors block until the process exits. A non-zero exit code is
/// reported through [`ProcessOutput`], not as an error; only a failure to
/// launch the process is an `Err`.
pub trait ProcessExecutor {
    /// Runs the invocation and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be launched.
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Executor that launches the container runtime CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerCli;

impl DockerCli {
    /// Creates the executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessExecutor for DockerCli {
    fn execute(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let program = resolve_executable(&invocation.executable)?;
        let args = invocation.command_line();
        tracing::info!(executable = %program.display(), ?args, "launching container runtime");

        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| QodanaError::Spawn {
                executable: invocation.executable.clone(),
                source: e,
            })?;

        let result = ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        for line in result.stdout.lines() {
            tracing::info!(stream = "stdout", "{line}");
        }
        for line in result.stderr.lines() {
            tracing::info!(stream = "stderr", "{line}");
        }
        tracing::debug!(exit_code = result.exit_code, "container runtime exited");
        Ok(result)
    }
}

/// Resolves a bare executable name through `PATH`; paths are used as given.
///
/// # Errors
///
/// Returns [`QodanaError::Spawn`] if a bare name cannot be found on `PATH`.
pub fn resolve_executable(executable: &str) -> Result<PathBuf> {
    let candidate = Path::new(executable);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return Ok(candidate.to_path_buf());
    }
    which::which(executable).map_err(|e| QodanaError::Spawn {
        executable: executable.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, e),
    })
}

#[cfg(test)]
mod tests {
    use qodana_invocation::ContainerAction;

    use super::*;

    #[test]
    fn combined_joins_non_empty_streams() {
        let out = ProcessOutput {
            exit_code: 1,
            stdout: "pulled\n".into(),
            stderr: "warning\n".into(),
        };
        assert_eq!(out.combined(), "pulled\nwarning");

        let only_err = ProcessOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "boom".into(),
        };
        assert_eq!(only_err.combined(), "boom");
    }

    #[test]
    fn success_is_exit_code_zero() {
        let mut out = ProcessOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(out.success());
        out.exit_code = 125;
        assert!(!out.success());
    }

    #[test]
    fn explicit_paths_are_not_looked_up() {
        let resolved = resolve_executable("/opt/bin/docker").expect("resolve");
        assert_eq!(resolved, PathBuf::from("/opt/bin/docker"));
        let relative = resolve_executable("./bin/docker").expect("resolve");
        assert_eq!(relative, PathBuf::from("./bin/docker"));
    }

    #[test]
    fn unknown_bare_name_is_spawn_error() {
        let err = resolve_executable("qodana-runner-no-such-binary").unwrap_err();
        assert!(matches!(err, QodanaError::Spawn { .. }), "got: {err}");
    }

    #[test]
    fn missing_executable_fails_to_launch() {
        let inv = Invocation::new(
            "/nonexistent/qodana-runner/docker",
            ContainerAction::Pull {
                image: "jetbrains/qodana".into(),
            },
        );
        let err = DockerCli::new().execute(&inv).unwrap_err();
        assert!(matches!(err, QodanaError::Spawn { .. }), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_code_and_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("fake-docker");
        std::fs::write(&script, "#!/bin/sh\necho \"$@\"\necho oops >&2\nexit 3\n").expect("write");
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
                .expect("chmod");
        }

        let inv = Invocation::new(
            script.to_string_lossy(),
            ContainerAction::Stop {
                container: "idea-inspections".into(),
            },
        );
        let out = DockerCli::new().execute(&inv).expect("execute");
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout.trim(), "stop idea-inspections");
        assert_eq!(out.stderr.trim(), "oops");
    }
}
