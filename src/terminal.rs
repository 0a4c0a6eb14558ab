//! Terminal concerns: color detection, tracing setup, and the status display.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use abzdok_core::{StatusDisplay, StatusKind};
use indicatif::{ProgressBar, ProgressStyle};

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_disable_color(
    no_color_flag: bool,
    no_color_env: bool,
    dumb_terminal: bool,
) -> bool {
    no_color_flag || no_color_env || dumb_terminal
}

pub(crate) fn should_use_spinner(
    stderr_is_terminal: bool,
    quiet: bool,
    dumb_terminal: bool,
) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// Log level used when `RUST_LOG` is unset.
///
/// `warn` by default so that log lines do not interleave with the status
/// display.
pub(crate) fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

pub(crate) fn init_tracing(default_level: &str, no_color: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

/// Status display on stderr.
///
/// In progress is a spinner (or a plain line without a TTY); success and
/// error replace it with a printed message. Quiet mode keeps only errors.
pub(crate) struct TerminalStatus {
    use_spinner: bool,
    quiet: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalStatus {
    pub(crate) fn new(use_spinner: bool, quiet: bool) -> Self {
        Self {
            use_spinner,
            quiet,
            spinner: Mutex::new(None),
        }
    }

    fn clear_spinner(&self) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(spinner) = slot.take() {
            spinner.finish_and_clear();
        }
    }

    fn start_spinner(&self, message: &str) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        let spinner = slot.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });
        spinner.set_message(message.to_string());
    }
}

impl StatusDisplay for TerminalStatus {
    fn render(&self, kind: StatusKind, message: &str) {
        match kind {
            StatusKind::Idle => self.clear_spinner(),
            StatusKind::InProgress if self.use_spinner => self.start_spinner(message),
            StatusKind::InProgress | StatusKind::Success => {
                self.clear_spinner();
                if !self.quiet {
                    eprintln!("{message}");
                }
            }
            StatusKind::Error => {
                self.clear_spinner();
                eprintln!("{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_disable_color_any_source() {
        assert!(!should_disable_color(false, false, false));
        assert!(should_disable_color(true, false, false));
        assert!(should_disable_color(false, true, false));
        assert!(should_disable_color(false, false, true));
    }

    #[test]
    fn test_should_use_spinner_requires_interactive_stderr() {
        assert!(should_use_spinner(true, false, false));
        assert!(!should_use_spinner(false, false, false));
        assert!(!should_use_spinner(true, true, false));
        assert!(!should_use_spinner(true, false, true));
    }

    #[test]
    fn test_default_log_level_priority() {
        assert_eq!(default_log_level(0, false), "warn");
        assert_eq!(default_log_level(1, false), "debug");
        assert_eq!(default_log_level(5, false), "trace");
        assert_eq!(default_log_level(2, true), "error");
    }

    #[test]
    fn test_terminal_status_without_spinner_never_holds_a_bar() {
        let status = TerminalStatus::new(false, true);
        status.show_status("Generiere...");
        status.show_success("Generieren erfolgreich!");
        assert!(status.spinner.lock().unwrap().is_none());
    }
}
