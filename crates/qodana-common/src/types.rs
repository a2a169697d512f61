//! Domain primitive types: bindings and environment parameters.

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

/// A host-to-container mapping rendered as `"<host>:<container>"`.
///
/// Used for both volume bindings (paths) and port bindings (ports).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    host: String,
    container: String,
}

impl Binding {
    /// Creates a binding from already formatted host and container sides.
    #[must_use]
    pub fn new(host: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }

    /// Creates a volume binding. The host path is expected to be canonical.
    #[must_use]
    pub fn volume(host: &Path, container: &str) -> Self {
        Self::new(host.to_string_lossy(), container)
    }

    /// Creates a port binding.
    #[must_use]
    pub fn port(host: u16, container: u16) -> Self {
        Self::new(host.to_string(), container.to_string())
    }

    /// Host side of the binding.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Container side of the binding.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.container)
    }
}

impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single environment parameter handed to the analysis container.
///
/// Flags (`--save-report`) and assignments (`KEY=value`) share one ordered
/// sequence. The variants stay distinct so the rendering layer, not the
/// builder, decides how each reaches the container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnvParameter {
    /// A standalone flag token.
    Flag(String),
    /// A `KEY=value` assignment.
    Assignment {
        /// Variable name.
        key: String,
        /// Variable value.
        value: String,
    },
}

impl EnvParameter {
    /// Creates a flag parameter.
    #[must_use]
    pub fn flag(token: impl Into<String>) -> Self {
        Self::Flag(token.into())
    }

    /// Creates a `KEY=value` parameter.
    #[must_use]
    pub fn assignment(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assignment {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for EnvParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(token) => write!(f, "{token}"),
            Self::Assignment { key, value } => write!(f, "{key}={value}"),
        }
    }
}

impl Serialize for EnvParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn volume_binding_formats_host_then_container() {
        let b = Binding::volume(&PathBuf::from("/home/me/project"), "/data/project");
        assert_eq!(b.to_string(), "/home/me/project:/data/project");
        assert_eq!(b.host(), "/home/me/project");
        assert_eq!(b.container(), "/data/project");
    }

    #[test]
    fn port_binding_formats_ports() {
        assert_eq!(Binding::port(9090, 8080).to_string(), "9090:8080");
    }

    #[test]
    fn env_parameter_display() {
        assert_eq!(EnvParameter::flag("--save-report").to_string(), "--save-report");
        assert_eq!(
            EnvParameter::assignment("IDE_PROPERTIES_PROPERTY", "-Xmx2g -Dfoo=bar").to_string(),
            "IDE_PROPERTIES_PROPERTY=-Xmx2g -Dfoo=bar"
        );
    }

    #[test]
    fn bindings_serialize_as_strings() {
        let json = serde_json::to_string(&vec![Binding::port(8080, 8080)]).expect("serialize");
        assert_eq!(json, r#"["8080:8080"]"#);
    }
}
