//! The project-wide `qodana` settings block.

use std::path::{Path, PathBuf};

use qodana_common::constants;
use qodana_common::paths;

use crate::property::Property;
use crate::settings::ExtensionSettings;

/// Project-wide settings shared by all inspection tasks.
///
/// Created once per run. Task nodes never copy these values; they install
/// conventions that read the properties lazily.
#[derive(Debug, Clone)]
pub struct QodanaExtension {
    /// Container runtime executable.
    pub executable: Property<String>,
    /// Canonical path of the analysed project.
    pub project_path: Property<PathBuf>,
    /// Directory the analysis writes its results to.
    pub results_path: Property<PathBuf>,
    /// Optional cache directory shared between runs.
    pub cache_path: Property<PathBuf>,
    /// Whether the container saves an HTML report.
    pub save_report: Property<bool>,
    /// Whether the container serves the HTML report.
    pub show_report: Property<bool>,
    /// Host port the report is exposed on.
    pub show_report_port: Property<u16>,
    /// Whether the image is pulled before every analysis.
    pub auto_update: Property<bool>,
}

impl QodanaExtension {
    /// Creates the extension with its built-in conventions for the project
    /// rooted at `project_dir`.
    ///
    /// `results_path` defaults to `<project_path>/build/results` and follows
    /// later overrides of `project_path`.
    #[must_use]
    pub fn new(project_dir: &Path) -> Self {
        let project_path =
            Property::with_convention("project_path", paths::canonicalize(project_dir));
        let results_path = Property::new("results_path");
        results_path.set_convention(
            project_path
                .provider()
                .map(|project: PathBuf| project.join(constants::DEFAULT_RESULTS_SUBDIR)),
        );

        Self {
            executable: Property::with_convention("executable", constants::EXECUTABLE.to_string()),
            project_path,
            results_path,
            cache_path: Property::new("cache_path"),
            save_report: Property::with_convention("save_report", false),
            show_report: Property::with_convention("show_report", false),
            show_report_port: Property::with_convention(
                "show_report_port",
                constants::DEFAULT_SHOW_REPORT_PORT,
            ),
            auto_update: Property::with_convention("auto_update", true),
        }
    }

    /// Applies one settings layer as explicit values. Fields left `None` in
    /// `settings` keep whatever the property resolved to before.
    pub fn apply(&self, settings: &ExtensionSettings) {
        self.executable.set_if_some(settings.executable.clone());
        self.project_path.set_if_some(settings.project_path.clone());
        self.results_path.set_if_some(settings.results_path.clone());
        self.cache_path.set_if_some(settings.cache_path.clone());
        self.save_report.set_if_some(settings.save_report);
        self.show_report.set_if_some(settings.show_report);
        self.show_report_port.set_if_some(settings.show_report_port);
        self.auto_update.set_if_some(settings.auto_update);
        tracing::debug!(?settings, "applied extension settings");
    }
}
