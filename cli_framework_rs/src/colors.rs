//! ANSI color helpers for framework-generated output.
//!
//! Whether anything is painted is decided per invocation by
//! `CommandContext::color`, never by probing the terminal here.

// ============================================================================
// ANSI Color Codes
// ============================================================================

pub const RED: &str = "\x1b[31m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

/// Colorizer that can be passed around to format functions.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Errors - RED
    pub fn error(&self, s: &str) -> String {
        self.wrap(s, RED)
    }

    /// Debug output, hints - DIM
    pub fn dim(&self, s: &str) -> String {
        self.wrap(s, DIM)
    }

    pub fn wrap(&self, s: &str, code: &str) -> String {
        if self.enabled {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}
