//! Default values, task names, and container-side mount points.

/// Default container runtime executable.
pub const EXECUTABLE: &str = "docker";

/// Image that runs the inspections.
pub const DOCKER_IMAGE_NAME_INSPECTIONS: &str = "jetbrains/qodana";

/// Name given to the inspections container so it can be stopped later.
pub const DOCKER_CONTAINER_NAME_INSPECTIONS: &str = "idea-inspections";

/// Name of the configuration block (and the YAML section) holding the
/// project-wide settings.
pub const EXTENSION_NAME: &str = "qodana";

/// Group all inspection tasks are registered under.
pub const GROUP_NAME: &str = "qodana";

/// Registered name of the image pull task.
pub const UPDATE_INSPECTIONS_TASK_NAME: &str = "updateInspections";
/// Registered name of the analysis task.
pub const RUN_INSPECTIONS_TASK_NAME: &str = "runInspections";
/// Registered name of the container stop task.
pub const STOP_INSPECTIONS_TASK_NAME: &str = "stopInspections";
/// Registered name of the results cleanup task.
pub const CLEAN_INSPECTIONS_TASK_NAME: &str = "cleanInspections";

/// Results directory, relative to the project directory.
pub const DEFAULT_RESULTS_SUBDIR: &str = "build/results";

/// Default host port the report is exposed on.
pub const DEFAULT_SHOW_REPORT_PORT: u16 = 8080;

/// HTTP port the report server listens on inside the container. Fixed.
pub const CONTAINER_REPORT_PORT: u16 = 8080;

/// Mount point of the analysed project inside the container.
pub const CONTAINER_PROJECT_DIR: &str = "/data/project";
/// Mount point of the results directory inside the container.
pub const CONTAINER_RESULTS_DIR: &str = "/data/results";
/// Mount point of the cache directory inside the container.
pub const CONTAINER_CACHE_DIR: &str = "/data/cache";
/// Location of the inspection profile inside the container.
pub const CONTAINER_PROFILE_FILE: &str = "/data/profile.xml";
/// Location of the disabled plugins list inside the container.
pub const CONTAINER_DISABLED_PLUGINS_FILE: &str = "/root/.config/idea/disabled_plugins.txt";

/// Environment variable the IDE inside the container reads JVM properties from.
pub const IDE_PROPERTIES_ENV: &str = "IDE_PROPERTIES_PROPERTY";

/// Flag asking the container to save the HTML report.
pub const SAVE_REPORT_FLAG: &str = "--save-report";
/// Flag asking the container to serve the HTML report.
pub const SHOW_REPORT_FLAG: &str = "--show-report";
/// Argument restricting the analysis to changed files.
pub const CHANGES_ARGUMENT: &str = "-changes";

/// Settings file looked up in the project directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "qodana-runner.yaml";

/// Application name used in CLI output.
pub const APP_NAME: &str = "qodana-runner";
