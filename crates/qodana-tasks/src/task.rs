//! Per-task settings and their conventions.
//!
//! Each task owns its properties. Where a task needs a value another task
//! owns (the image name, the container name, the results directory), its
//! convention holds a handle to that task's property, handed over once at
//! registration. Nothing is looked up by name and nothing is copied.

use std::path::PathBuf;

use qodana_common::constants;
use qodana_common::error::{QodanaError, Result};
use qodana_common::paths;
use qodana_config::settings::RunOverrides;
use qodana_config::{Property, Provider, QodanaExtension};
use qodana_invocation::settings::{CleanSettings, RunSettings, StopSettings, UpdateSettings};

/// Settings of the image pull task.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    /// Container runtime executable.
    pub executable: Property<String>,
    /// Image to pull. Defaults to the analysis task's image.
    pub image: Property<String>,
}

impl UpdateTask {
    pub(crate) fn new(extension: &QodanaExtension, run: &RunTask) -> Self {
        let executable = Property::new("update.executable");
        executable.set_convention(extension.executable.provider());
        let image = Property::new("update.image");
        image.set_convention(run.image.provider());
        Self { executable, image }
    }

    /// Resolves the task settings in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable or image is unresolved.
    pub fn resolve(&self) -> Result<UpdateSettings> {
        Ok(UpdateSettings {
            executable: self.executable.get()?,
            image: self.image.get()?,
        })
    }
}

/// Settings of the analysis task.
#[derive(Debug, Clone)]
pub struct RunTask {
    /// Container runtime executable.
    pub executable: Property<String>,
    /// Image to run.
    pub image: Property<String>,
    /// Name given to the container.
    pub container: Property<String>,
    /// Analysed project directory.
    pub project_dir: Property<PathBuf>,
    /// Results directory, relative paths taken from the project directory.
    pub results_dir: Property<PathBuf>,
    /// Optional cache directory.
    pub cache_dir: Property<PathBuf>,
    /// Optional inspection profile.
    pub profile_path: Property<PathBuf>,
    /// Optional disabled plugins list.
    pub disabled_plugins_path: Property<PathBuf>,
    /// Save the HTML report.
    pub save_report: Property<bool>,
    /// Serve the HTML report.
    pub show_report: Property<bool>,
    /// Host port for the report.
    pub show_report_port: Property<u16>,
    /// JVM parameters for the IDE inside the container.
    pub jvm_parameters: Property<Vec<String>>,
    /// Only inspect changed files.
    pub changes: Property<bool>,
}

impl RunTask {
    pub(crate) fn new(extension: &QodanaExtension) -> Self {
        let executable = Property::new("run.executable");
        executable.set_convention(extension.executable.provider());

        let project_dir = Property::new("run.project_dir");
        project_dir.set_convention(
            extension
                .project_path
                .provider()
                .map(|path: PathBuf| paths::canonicalize(&path)),
        );

        let results_dir = Property::new("run.results_dir");
        results_dir.set_convention(relative_to(&project_dir, &extension.results_path));
        let cache_dir = Property::new("run.cache_dir");
        cache_dir.set_convention(relative_to(&project_dir, &extension.cache_path));

        let save_report = Property::new("run.save_report");
        save_report.set_convention(extension.save_report.provider());
        let show_report = Property::new("run.show_report");
        show_report.set_convention(extension.show_report.provider());
        let show_report_port = Property::new("run.show_report_port");
        show_report_port.set_convention(extension.show_report_port.provider());

        Self {
            executable,
            image: Property::with_convention(
                "run.image",
                constants::DOCKER_IMAGE_NAME_INSPECTIONS.to_string(),
            ),
            container: Property::with_convention(
                "run.container",
                constants::DOCKER_CONTAINER_NAME_INSPECTIONS.to_string(),
            ),
            project_dir,
            results_dir,
            cache_dir,
            profile_path: Property::new("run.profile_path"),
            disabled_plugins_path: Property::new("run.disabled_plugins_path"),
            save_report,
            show_report,
            show_report_port,
            jvm_parameters: Property::with_convention("run.jvm_parameters", Vec::new()),
            changes: Property::with_convention("run.changes", false),
        }
    }

    /// Applies a settings layer as explicit values.
    pub fn apply(&self, overrides: &RunOverrides) {
        self.image.set_if_some(overrides.image.clone());
        self.container.set_if_some(overrides.container.clone());
        self.profile_path.set_if_some(overrides.profile_path.clone());
        self.disabled_plugins_path
            .set_if_some(overrides.disabled_plugins_path.clone());
        self.jvm_parameters
            .set_if_some(overrides.jvm_parameters.clone());
        self.changes.set_if_some(overrides.changes);
    }

    /// Resolves the task settings in one pass.
    ///
    /// Optional paths given relative are taken from the project directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable, project directory, or results
    /// directory is unresolved.
    pub fn resolve(&self) -> Result<RunSettings> {
        let project_dir = self.project_dir.get()?;
        let in_project = |path: PathBuf| paths::resolve_against(&project_dir, &path);
        Ok(RunSettings {
            executable: self.executable.get()?,
            image: self.image.get()?,
            container: self.container.get()?,
            results_dir: in_project(self.results_dir.get()?),
            cache_dir: self.cache_dir.get_or_none().map(in_project),
            profile_path: self.profile_path.get_or_none().map(in_project),
            disabled_plugins_path: self.disabled_plugins_path.get_or_none().map(in_project),
            save_report: self.save_report.get_or_else(false),
            show_report: self.show_report.get_or_else(false),
            show_report_port: self
                .show_report_port
                .get_or_else(constants::DEFAULT_SHOW_REPORT_PORT),
            jvm_parameters: self.jvm_parameters.get_or_else(Vec::new()),
            changes: self.changes.get_or_else(false),
            project_dir,
        })
    }
}

/// Settings of the container stop task.
#[derive(Debug, Clone)]
pub struct StopTask {
    /// Container runtime executable.
    pub executable: Property<String>,
    /// Container to stop. Defaults to the analysis task's container.
    pub container: Property<String>,
}

impl StopTask {
    pub(crate) fn new(extension: &QodanaExtension, run: &RunTask) -> Self {
        let executable = Property::new("stop.executable");
        executable.set_convention(extension.executable.provider());
        let container = Property::new("stop.container");
        container.set_convention(run.container.provider());
        Self {
            executable,
            container,
        }
    }

    /// Resolves the task settings in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable or container is unresolved.
    pub fn resolve(&self) -> Result<StopSettings> {
        Ok(StopSettings {
            executable: self.executable.get()?,
            container: self.container.get()?,
        })
    }
}

/// Settings of the results cleanup task.
#[derive(Debug, Clone)]
pub struct CleanTask {
    /// Directory to remove. Defaults to the analysis task's results directory.
    pub results_dir: Property<PathBuf>,
    project_dir: Property<PathBuf>,
}

impl CleanTask {
    pub(crate) fn new(run: &RunTask) -> Self {
        let results_dir = Property::new("clean.results_dir");
        results_dir.set_convention(run.results_dir.provider());
        Self {
            results_dir,
            project_dir: run.project_dir.clone(),
        }
    }

    /// Resolves the task settings in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the project or results directory is unresolved,
    /// or if removing the results directory would remove the project.
    pub fn resolve(&self) -> Result<CleanSettings> {
        let project_dir = paths::canonicalize(&self.project_dir.get()?);
        let results_dir = paths::resolve_against(&project_dir, &self.results_dir.get()?);
        if project_dir.starts_with(&results_dir) {
            return Err(QodanaError::Config {
                message: format!(
                    "results directory {} contains the project directory {}",
                    results_dir.display(),
                    project_dir.display()
                ),
            });
        }
        Ok(CleanSettings { results_dir })
    }
}

/// A provider reading `path`, resolved against `base` when relative.
fn relative_to(base: &Property<PathBuf>, path: &Property<PathBuf>) -> Provider<PathBuf> {
    let base = base.clone();
    let path = path.clone();
    Provider::from_fn(move || {
        let path = path.get_or_none()?;
        Some(match base.get_or_none() {
            Some(base) => paths::resolve_against(&base, &path),
            None => paths::canonicalize(&path),
        })
    })
}
