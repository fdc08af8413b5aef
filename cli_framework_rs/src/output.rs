//! Output helpers available to every executor through its [`CommandContext`].
//!
//! `log`, `success`, `table`, `list` and `boxed` write to stdout; `error`,
//! `warn`, `info` and `debug` write to stderr. `warn`, `info` and `debug` are
//! silent when quiet, and `debug` additionally needs `context.debug`.

use std::io::{self, Write};

use console::{measure_text_width, style};

use crate::colors::Painter;
use crate::context::CommandContext;
use crate::progress::Spinner;

impl CommandContext {
    pub fn painter(&self) -> Painter {
        Painter::new(self.color)
    }

    /// Plain line to stdout.
    pub fn log(&self, message: &str) -> io::Result<()> {
        writeln!(self.stdout(), "{}", message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        let symbol = style("✗").red().bold().force_styling(self.color);
        writeln!(self.stderr(), "{} {}", symbol, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let symbol = style("⚠").yellow().bold().force_styling(self.color);
        writeln!(self.stderr(), "{} {}", symbol, message)
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let symbol = style("ℹ").blue().bold().force_styling(self.color);
        writeln!(self.stderr(), "{} {}", symbol, message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        let symbol = style("✓").green().bold().force_styling(self.color);
        writeln!(self.stdout(), "{} {}", symbol, message)
    }

    pub fn debug(&self, message: &str) -> io::Result<()> {
        if !self.debug || self.quiet {
            return Ok(());
        }
        writeln!(self.stderr(), "{}", self.painter().dim(&format!("[debug] {}", message)))
    }

    pub fn table<S: AsRef<str>>(&self, headers: &[S], rows: &[Vec<String>]) -> io::Result<()> {
        self.stdout().write_all(render_table(headers, rows).as_bytes())
    }

    pub fn list<S: AsRef<str>>(&self, items: &[S]) -> io::Result<()> {
        self.stdout().write_all(render_list(items).as_bytes())
    }

    pub fn boxed(&self, text: &str) -> io::Result<()> {
        self.stdout().write_all(render_box(text).as_bytes())
    }

    /// Spinner bound to this context (inert when quiet).
    pub fn spinner(&self) -> Spinner {
        Spinner::new(self)
    }
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(cell));
    format!("{}{}", cell, " ".repeat(fill))
}

fn border(widths: &[usize], left: &str, middle: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(middle), right)
}

/// Box-drawn table; short rows are padded with empty cells.
pub fn render_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    fn cell(row: &[String], index: usize) -> &str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
    let header_cells: Vec<String> = (0..columns)
        .map(|i| headers.get(i).map(|h| h.as_ref().to_string()).unwrap_or_default())
        .collect();

    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .map(|row| measure_text_width(cell(row, i)))
                .chain(std::iter::once(measure_text_width(&header_cells[i])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {} ", pad(c, *w)))
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let mut out = border(&widths, "┌", "┬", "┐");
    if !headers.is_empty() {
        out.push_str(&line(header_cells.iter().map(String::as_str).collect()));
        out.push_str(&border(&widths, "├", "┼", "┤"));
    }
    for row in rows {
        out.push_str(&line((0..columns).map(|i| cell(row, i)).collect()));
    }
    out.push_str(&border(&widths, "└", "┴", "┘"));
    out
}

pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("  • {}\n", item.as_ref()))
        .collect()
}

pub fn render_box(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let mut out = format!("┌{}┐\n", "─".repeat(width + 2));
    for line in &lines {
        out.push_str(&format!("│ {} │\n", pad(line, width)));
    }
    out.push_str(&format!("└{}┘\n", "─".repeat(width + 2)));
    out
}
