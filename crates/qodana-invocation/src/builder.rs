//! One builder per task kind.
//!
//! Variable-length sequences are assembled by mapping each optional setting
//! to an entry or `None` and dropping the `None`s, so the relative order of
//! the present entries is fixed and an absent setting never leaves a
//! placeholder behind.

use std::path::Path;

use qodana_common::constants;
use qodana_common::paths;
use qodana_common::types::{Binding, EnvParameter};

use crate::invocation::{ContainerAction, Invocation};
use crate::settings::{CleanSettings, RunSettings, StopSettings, UpdateSettings};

/// Builds the image pull invocation.
#[must_use]
pub fn build_update(settings: &UpdateSettings) -> Invocation {
    Invocation::new(
        settings.executable.clone(),
        ContainerAction::Pull {
            image: settings.image.clone(),
        },
    )
}

/// Builds the analysis invocation.
#[must_use]
pub fn build_run(settings: &RunSettings) -> Invocation {
    let mut invocation = Invocation::new(
        settings.executable.clone(),
        ContainerAction::Run {
            image: settings.image.clone(),
            container: settings.container.clone(),
        },
    );
    invocation.port_bindings = port_bindings(settings);
    invocation.volume_bindings = volume_bindings(settings);
    invocation.env_parameters = env_parameters(settings);
    invocation.arguments = arguments(settings);
    tracing::debug!(
        volumes = invocation.volume_bindings.len(),
        env = invocation.env_parameters.len(),
        "built run invocation"
    );
    invocation
}

/// Builds the container stop invocation.
#[must_use]
pub fn build_stop(settings: &StopSettings) -> Invocation {
    Invocation::new(
        settings.executable.clone(),
        ContainerAction::Stop {
            container: settings.container.clone(),
        },
    )
}

/// Returns the canonical directory the cleanup task removes.
#[must_use]
pub fn clean_target(settings: &CleanSettings) -> std::path::PathBuf {
    paths::canonicalize(&settings.results_dir)
}

/// The report port binding. The container side is always 8080.
#[must_use]
pub fn port_bindings(settings: &RunSettings) -> Vec<Binding> {
    vec![Binding::port(
        settings.show_report_port,
        constants::CONTAINER_REPORT_PORT,
    )]
}

/// Project, results, and the optional cache, profile, and disabled-plugins
/// bindings, in that order.
#[must_use]
pub fn volume_bindings(settings: &RunSettings) -> Vec<Binding> {
    [
        Some(volume(&settings.project_dir, constants::CONTAINER_PROJECT_DIR)),
        Some(volume(&settings.results_dir, constants::CONTAINER_RESULTS_DIR)),
        settings
            .cache_dir
            .as_deref()
            .map(|dir| volume(dir, constants::CONTAINER_CACHE_DIR)),
        settings
            .profile_path
            .as_deref()
            .map(|file| volume(file, constants::CONTAINER_PROFILE_FILE)),
        settings
            .disabled_plugins_path
            .as_deref()
            .map(|file| volume(file, constants::CONTAINER_DISABLED_PLUGINS_FILE)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Report flags, then the aggregated JVM properties entry.
#[must_use]
pub fn env_parameters(settings: &RunSettings) -> Vec<EnvParameter> {
    [
        settings
            .save_report
            .then(|| EnvParameter::flag(constants::SAVE_REPORT_FLAG)),
        settings
            .show_report
            .then(|| EnvParameter::flag(constants::SHOW_REPORT_FLAG)),
        (!settings.jvm_parameters.is_empty()).then(|| {
            EnvParameter::assignment(
                constants::IDE_PROPERTIES_ENV,
                settings.jvm_parameters.join(" "),
            )
        }),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `-changes` when only changed files are inspected.
#[must_use]
pub fn arguments(settings: &RunSettings) -> Vec<String> {
    settings
        .changes
        .then(|| constants::CHANGES_ARGUMENT.to_string())
        .into_iter()
        .collect()
}

fn volume(host: &Path, container: &str) -> Binding {
    Binding::volume(&paths::canonicalize(host), container)
}
