//! The fully determined container runtime invocation.

use serde::Serialize;

use qodana_common::types::{Binding, EnvParameter};

/// What the container runtime is asked to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ContainerAction {
    /// Pull an image.
    Pull {
        /// Image to pull.
        image: String,
    },
    /// Start a named, self-removing container from an image.
    Run {
        /// Image to run.
        image: String,
        /// Name given to the container.
        container: String,
    },
    /// Stop a named container.
    Stop {
        /// Container to stop.
        container: String,
    },
}

/// A container runtime invocation, ready to hand to an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Container runtime executable.
    pub executable: String,
    /// Runtime subcommand and its target.
    pub action: ContainerAction,
    /// Positional arguments passed to the container.
    pub arguments: Vec<String>,
    /// Parameters passed to the container environment.
    pub env_parameters: Vec<EnvParameter>,
    /// Host-to-container volume bindings.
    pub volume_bindings: Vec<Binding>,
    /// Host-to-container port bindings.
    pub port_bindings: Vec<Binding>,
}

impl Invocation {
    /// Creates an invocation with no bindings, parameters, or arguments.
    #[must_use]
    pub fn new(executable: impl Into<String>, action: ContainerAction) -> Self {
        Self {
            executable: executable.into(),
            action,
            arguments: Vec::new(),
            env_parameters: Vec::new(),
            volume_bindings: Vec::new(),
            port_bindings: Vec::new(),
        }
    }

    /// Renders the runtime arguments, without the executable.
    ///
    /// `run` renders as
    /// `run --rm --name <container> [-p b]* [-v b]* [-e p]* <image> [args]`.
    /// Every environment parameter, flag or assignment, is passed with `-e`.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        match &self.action {
            ContainerAction::Pull { image } => vec!["pull".into(), image.clone()],
            ContainerAction::Stop { container } => vec!["stop".into(), container.clone()],
            ContainerAction::Run { image, container } => {
                let mut args: Vec<String> =
                    vec!["run".into(), "--rm".into(), "--name".into(), container.clone()];
                for binding in &self.port_bindings {
                    args.push("-p".into());
                    args.push(binding.to_string());
                }
                for binding in &self.volume_bindings {
                    args.push("-v".into());
                    args.push(binding.to_string());
                }
                for param in &self.env_parameters {
                    args.push("-e".into());
                    args.push(param.to_string());
                }
                args.push(image.clone());
                args.extend(self.arguments.iter().cloned());
                args
            }
        }
    }

    /// Renders the invocation as a single display line.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.executable.clone();
        for arg in self.command_line() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}
