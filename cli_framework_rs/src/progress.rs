//! Spinner for long-running command work.
//!
//! Every operation is a no-op when the context is quiet. The animation only
//! draws when stderr is a terminal; final status lines always go through the
//! context streams so they can be captured.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::context::{CommandContext, Stream};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct Spinner {
    bar: Option<ProgressBar>,
    stdout: Stream,
    stderr: Stream,
    quiet: bool,
    color: bool,
    animate: bool,
}

impl Spinner {
    /// Spinner bound to `ctx`'s streams; not started yet.
    pub fn new(ctx: &CommandContext) -> Self {
        let stderr = ctx.stderr();
        Self {
            animate: stderr.is_terminal(),
            bar: None,
            stdout: ctx.stdout(),
            stderr,
            quiet: ctx.quiet,
            color: ctx.color,
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        let bar = if self.animate {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };
        let template = ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(template);
        bar.set_message(message.to_string());
        if self.animate {
            bar.enable_steady_tick(Duration::from_millis(80));
        }
        self.bar = Some(bar);
    }

    pub fn update(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn is_running(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop and print a green check line to stdout (the current message if `None`).
    pub fn succeed(&mut self, message: Option<&str>) {
        let text = self.final_message(message);
        if self.stop() {
            let symbol = style("✓").green().bold().force_styling(self.color);
            let _ = writeln!(self.stdout, "{} {}", symbol, text);
        }
    }

    /// Stop and print a red cross line to stderr.
    pub fn fail(&mut self, message: Option<&str>) {
        let text = self.final_message(message);
        if self.stop() {
            let symbol = style("✗").red().bold().force_styling(self.color);
            let _ = writeln!(self.stderr, "{} {}", symbol, text);
        }
    }

    /// Clear the spinner without a status line. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        match self.bar.take() {
            Some(bar) => {
                bar.finish_and_clear();
                true
            }
            None => false,
        }
    }

    fn final_message(&self, message: Option<&str>) -> String {
        match (message, &self.bar) {
            (Some(text), _) => text.to_string(),
            (None, Some(bar)) => bar.message(),
            (None, None) => String::new(),
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
