//! Unified error types for the qodana-runner workspace.
//!
//! Absent optional settings are never errors; they resolve to `None` and
//! simply elide the binding or parameter they would have produced.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum QodanaError {
    /// A required setting resolved to nothing.
    #[error("missing required setting `{property}`")]
    Missing {
        /// Name of the unresolved setting.
        property: &'static str,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The container runtime could not be launched at all.
    #[error("failed to launch `{executable}`: {source}")]
    Spawn {
        /// Executable that failed to start.
        executable: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An external process exited with a non-zero status.
    #[error("task `{task}` failed with exit code {exit_code}:\n{output}")]
    ProcessFailure {
        /// Registered name of the failing task.
        task: &'static str,
        /// Exit code reported by the process (`-1` if killed by a signal).
        exit_code: i32,
        /// Captured output of the process.
        output: String,
    },

    /// The settings file could not be parsed.
    #[error("invalid settings file: {source}")]
    Yaml {
        /// Underlying YAML error.
        #[from]
        source: serde_yaml::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, QodanaError>;
