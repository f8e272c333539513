//! Terminal output formatting and utilities.
//!
//! This module provides consistent output formatting across all commands,
//! including colors, diagnostics and error messages.

pub mod colors;
pub mod errors;

use colors::ColorSupport;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    /// Output handler that never emits escape codes
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            colors: ColorSupport::disabled(),
        }
    }

    pub fn colors(&self) -> &ColorSupport {
        &self.colors
    }

    /// Print command output as-is
    pub fn print(&self, text: &str) {
        println!("{}", text);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.colors.red("✗"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
