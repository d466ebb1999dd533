//! Structured build reporting.
//!
//! The orchestrator never prints directly. It reports through a [`Logger`],
//! which groups messages by task: a task is started with [`Logger::task`],
//! collects infos, warnings and errors while it runs, and flushes them when
//! the next task starts or when [`Logger::finish`] is called.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait Logger {
    /// End the current task (if any) and start a new one.
    fn task(&mut self, name: &str);

    /// Update the current task's status line.
    fn status(&mut self, text: &str);

    fn info(&mut self, text: &str);

    fn warn(&mut self, text: &str);

    /// Add a non-fatal error. Errors are counted so the run can report failure.
    fn error(&mut self, text: &str);

    /// End the current task and flush everything still buffered.
    fn finish(&mut self);

    fn error_count(&self) -> usize;

    fn warning_count(&self) -> usize;
}

#[derive(Default)]
struct TaskBuffer {
    name: Option<String>,
    infos: Vec<String>,
    warns: Vec<String>,
    errs: Vec<String>,
}

/// Terminal logger with one spinner per task.
pub struct ConsoleLogger {
    current: TaskBuffer,
    spinner: Option<ProgressBar>,
    status_text: String,
    quiet: bool,
    errors: usize,
    warnings: usize,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            current: TaskBuffer::default(),
            spinner: None,
            status_text: String::new(),
            quiet: false,
            errors: 0,
            warnings: 0,
        }
    }

    /// A logger that only counts. Nothing is printed.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::new()
        }
    }

    fn end_task(&mut self) {
        let failed = !self.current.errs.is_empty();
        if let Some(spinner) = self.spinner.take() {
            let line = status_line(
                &self.status_text,
                self.current.warns.len(),
                self.current.errs.len(),
            );
            spinner.finish_and_clear();
            if failed {
                eprintln!("{} {}", "x".red(), line);
            } else {
                eprintln!("{} {}", "✓".green(), line);
            }
        }

        let task = std::mem::take(&mut self.current);
        if self.quiet {
            return;
        }
        if let Some(name) = task.name {
            for e in &task.errs {
                eprintln!("{} {}", format!("[{}]", name).red(), e);
            }
            for w in &task.warns {
                eprintln!("{} {}", format!("[{}]", name).yellow(), w);
            }
            for i in &task.infos {
                eprintln!("{} {}", format!("[{}]", name).cyan(), i);
            }
        } else {
            // Messages logged before any task was started.
            for e in &task.errs {
                eprintln!("{} {}", "x".red(), e);
            }
            for w in &task.warns {
                eprintln!("{} {}", "⚠".yellow(), w);
            }
            for i in &task.infos {
                eprintln!("  {}", i);
            }
        }
    }

    fn refresh(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(status_line(
                &self.status_text,
                self.current.warns.len(),
                self.current.errs.len(),
            ));
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn task(&mut self, name: &str) {
        self.end_task();

        self.current.name = Some(name.to_string());
        self.status_text = name.to_string();

        if !self.quiet && console::Term::stderr().is_term() {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner.set_message(name.to_string());
            self.spinner = Some(spinner);
        } else if !self.quiet {
            eprintln!("{} {}", "▶".blue(), name.bold());
        }
    }

    fn status(&mut self, text: &str) {
        self.status_text = text.to_string();
        self.refresh();
    }

    fn info(&mut self, text: &str) {
        self.current.infos.push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.current.warns.push(text.to_string());
        self.warnings += 1;
        self.refresh();
    }

    fn error(&mut self, text: &str) {
        self.current.errs.push(text.to_string());
        self.errors += 1;
        self.refresh();
    }

    fn finish(&mut self) {
        self.end_task();
        self.status_text.clear();
    }

    fn error_count(&self) -> usize {
        self.errors
    }

    fn warning_count(&self) -> usize {
        self.warnings
    }
}

/// Records every message. Used by tests and by embedders that render
/// diagnostics themselves.
#[derive(Debug, Default)]
pub struct CaptureLogger {
    pub tasks: Vec<String>,
    pub infos: Vec<String>,
    pub warns: Vec<String>,
    pub errors: Vec<String>,
}

impl CaptureLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for CaptureLogger {
    fn task(&mut self, name: &str) {
        self.tasks.push(name.to_string());
    }

    fn status(&mut self, _text: &str) {}

    fn info(&mut self, text: &str) {
        self.infos.push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.warns.push(text.to_string());
    }

    fn error(&mut self, text: &str) {
        self.errors.push(text.to_string());
    }

    fn finish(&mut self) {}

    fn error_count(&self) -> usize {
        self.errors.len()
    }

    fn warning_count(&self) -> usize {
        self.warns.len()
    }
}

/// Status text with a `(N warnings, M errors)` suffix when anything was reported.
pub fn status_line(text: &str, warnings: usize, errors: usize) -> String {
    if warnings == 0 && errors == 0 {
        return text.to_string();
    }

    let mut parts = Vec::new();
    if warnings > 0 {
        parts.push(format!(
            "{} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" }
        ));
    }
    if errors > 0 {
        parts.push(format!(
            "{} error{}",
            errors,
            if errors == 1 { "" } else { "s" }
        ));
    }
    format!("{} ({})", text, parts.join(", "))
}
