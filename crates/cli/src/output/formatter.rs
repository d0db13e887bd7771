//! Output formatter for human-readable and JSON output
//!
//! Ensures consistent output formatting across all commands. Results go to
//! stdout; errors and warnings go to stderr so listings stay pipeable.

use std::sync::{Arc, Mutex};

use console::style;
use serde::Serialize;

use super::OutputConfig;

/// Where formatted lines end up
#[derive(Debug, Clone, Default)]
enum Sink {
    #[default]
    Console,
    Capture(Arc<Mutex<Captured>>),
}

#[derive(Debug, Default)]
struct Captured {
    stdout: String,
    stderr: String,
}

/// Formatter for CLI output
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors or progress.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
    sink: Sink,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            sink: Sink::Console,
        }
    }

    /// Create a formatter that records output instead of printing it
    pub fn capture(config: OutputConfig) -> Self {
        Self {
            config,
            sink: Sink::Capture(Arc::default()),
        }
    }

    /// Everything written to stdout so far (capturing formatters only)
    pub fn captured_stdout(&self) -> String {
        match &self.sink {
            Sink::Console => String::new(),
            Sink::Capture(buf) => lock(buf).stdout.clone(),
        }
    }

    /// Everything written to stderr so far (capturing formatters only)
    pub fn captured_stderr(&self) -> String {
        match &self.sink {
            Sink::Console => String::new(),
            Sink::Capture(buf) => lock(buf).stderr.clone(),
        }
    }

    pub fn output_config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }

        if self.colors_enabled() {
            self.out(&format!("{} {message}", style("✓").green()));
        } else {
            self.out(&format!("✓ {message}"));
        }
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            self.err(&serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string()));
        } else if self.colors_enabled() {
            self.err(&format!("{} {message}", style("✗").red()));
        } else {
            self.err(&format!("✗ {message}"));
        }
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.out(&json),
            Err(e) => self.err(&format!("Error serializing output: {e}")),
        }
    }

    /// Print a line of text (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        self.out(message);
    }

    fn out(&self, line: &str) {
        match &self.sink {
            Sink::Console => println!("{line}"),
            Sink::Capture(buf) => {
                let mut buf = lock(buf);
                buf.stdout.push_str(line);
                buf.stdout.push('\n');
            }
        }
    }

    fn err(&self, line: &str) {
        match &self.sink {
            Sink::Console => eprintln!("{line}"),
            Sink::Capture(buf) => {
                let mut buf = lock(buf);
                buf.stderr.push_str(line);
                buf.stderr.push('\n');
            }
        }
    }
}

fn lock(buf: &Mutex<Captured>) -> std::sync::MutexGuard<'_, Captured> {
    buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
