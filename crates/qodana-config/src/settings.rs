//! Layered settings: the YAML settings file and command-line overrides.
//!
//! Every layer has the same shape, with every field optional. Layers are
//! merged from lowest to highest precedence (settings file, then flags) and
//! the result is applied on top of the built-in conventions.
//!
//! ```yaml
//! qodana:
//!   show_report: true
//!   show_report_port: 9090
//! run:
//!   profile_path: .qodana/profile.xml
//!   jvm_parameters: ["-Xmx2g"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use qodana_common::error::{QodanaError, Result};

/// Overrides for the project-wide `qodana` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionSettings {
    /// Container runtime executable.
    pub executable: Option<String>,
    /// Project directory.
    pub project_path: Option<PathBuf>,
    /// Results directory.
    pub results_path: Option<PathBuf>,
    /// Cache directory.
    pub cache_path: Option<PathBuf>,
    /// Save the HTML report.
    pub save_report: Option<bool>,
    /// Serve the HTML report.
    pub show_report: Option<bool>,
    /// Host port for the report.
    pub show_report_port: Option<u16>,
    /// Pull the image before running.
    pub auto_update: Option<bool>,
}

impl ExtensionSettings {
    /// Merges `higher` over `self`; fields set in `higher` win.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            executable: higher.executable.or(self.executable),
            project_path: higher.project_path.or(self.project_path),
            results_path: higher.results_path.or(self.results_path),
            cache_path: higher.cache_path.or(self.cache_path),
            save_report: higher.save_report.or(self.save_report),
            show_report: higher.show_report.or(self.show_report),
            show_report_port: higher.show_report_port.or(self.show_report_port),
            auto_update: higher.auto_update.or(self.auto_update),
        }
    }
}

/// Overrides for the image pull task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateOverrides {
    /// Image to pull instead of the analysis task's image.
    pub image: Option<String>,
}

/// Overrides for the analysis task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOverrides {
    /// Image to run.
    pub image: Option<String>,
    /// Name given to the container.
    pub container: Option<String>,
    /// Inspection profile mounted into the container.
    pub profile_path: Option<PathBuf>,
    /// Disabled plugins list mounted into the container.
    pub disabled_plugins_path: Option<PathBuf>,
    /// JVM parameters for the IDE inside the container.
    pub jvm_parameters: Option<Vec<String>>,
    /// Only inspect changed files.
    pub changes: Option<bool>,
}

impl RunOverrides {
    /// Merges `higher` over `self`; fields set in `higher` win.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            image: higher.image.or(self.image),
            container: higher.container.or(self.container),
            profile_path: higher.profile_path.or(self.profile_path),
            disabled_plugins_path: higher.disabled_plugins_path.or(self.disabled_plugins_path),
            jvm_parameters: higher.jvm_parameters.or(self.jvm_parameters),
            changes: higher.changes.or(self.changes),
        }
    }
}

/// Overrides for the container stop task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StopOverrides {
    /// Container to stop instead of the analysis task's container.
    pub container: Option<String>,
}

/// One complete settings layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Project-wide settings.
    pub qodana: ExtensionSettings,
    /// Image pull task settings.
    pub update: UpdateOverrides,
    /// Analysis task settings.
    pub run: RunOverrides,
    /// Container stop task settings.
    pub stop: StopOverrides,
}

impl Settings {
    /// Parses a settings layer from YAML text. An empty document yields
    /// an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or contains unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Loads a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading settings file");
        let content = std::fs::read_to_string(path).map_err(|e| QodanaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Loads a settings file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file");
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Merges `higher` over `self`, section by section.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            qodana: self.qodana.merge(higher.qodana),
            update: UpdateOverrides {
                image: higher.update.image.or(self.update.image),
            },
            run: self.run.merge(higher.run),
            stop: StopOverrides {
                container: higher.stop.container.or(self.stop.container),
            },
        }
    }
}
