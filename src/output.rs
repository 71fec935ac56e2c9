// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::DeploymentTerminal;
use crate::stack::StackEvent;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print one stack event as it is observed.
    pub fn event(&self, event: &StackEvent) {
        match self.mode {
            OutputMode::Normal => println!("{event}"),
            OutputMode::Quiet => {}
            OutputMode::Json => print_json(&JsonStackEvent {
                event: "stack_event",
                detail: event,
            }),
        }
    }

    /// Print the terminal status reported by the event stream.
    pub fn terminal(&self, terminal: DeploymentTerminal) {
        match self.mode {
            OutputMode::Normal => println!("Stack {terminal}"),
            OutputMode::Quiet => {}
            OutputMode::Json => print_json(&JsonTerminal {
                event: "terminal",
                detail: terminal,
            }),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "warning",
                    message,
                    duration_secs: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                // Print only the essential result
                println!("{message}");
            }
            OutputMode::Json => print_json(&JsonEvent {
                event: "success",
                message,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print the final report as pretty JSON (a single JSON line in JSON mode).
    pub fn report<T: Serialize>(&self, report: &T) {
        let rendered = match self.mode {
            OutputMode::Json => serde_json::to_string(report),
            OutputMode::Normal | OutputMode::Quiet => serde_json::to_string_pretty(report),
        };
        match rendered {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!("failed to render report: {}", e),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                    duration_secs: self.duration(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonStackEvent<'a> {
    event: &'a str,
    detail: &'a StackEvent,
}

#[derive(Serialize)]
struct JsonTerminal<'a> {
    event: &'a str,
    detail: DeploymentTerminal,
}
