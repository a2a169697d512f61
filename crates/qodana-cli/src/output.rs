//! Formatted output helpers for CLI commands.

use qodana_tasks::TaskReport;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Prints one status line per executed task to stderr.
#[allow(clippy::print_stderr)]
pub fn print_reports(reports: &[TaskReport]) {
    eprintln!();
    for report in reports {
        eprintln!("  {}", format_report(report));
    }
}

/// Formats a task report as a single colored status line.
#[must_use]
pub fn format_report(report: &TaskReport) -> String {
    use qodana_tasks::TaskOutcome;

    let (symbol, color) = match &report.outcome {
        TaskOutcome::Executed { exit_code: 0 } | TaskOutcome::Cleaned { .. } => ("●", GREEN),
        TaskOutcome::Executed { .. } => ("●", YELLOW),
        TaskOutcome::Skipped => ("○", DIM),
    };
    format!(
        "{color}{symbol}{RESET} {BOLD}{}{RESET} {DIM}{}{RESET}",
        report.task.name(),
        report.outcome
    )
}
