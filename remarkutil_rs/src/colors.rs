//! Terminal color utilities for human-readable diff output.

use std::io::IsTerminal;

use clap::ValueEnum;

// ============================================================================
// ANSI Color Codes
// ============================================================================

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

// ============================================================================
// Color State
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Determines if colors should be used based on ColorMode and terminal detection.
pub fn is_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Colorizer that can be passed around to format functions.
#[derive(Clone, Copy, Debug)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: is_enabled(mode),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    /// Content only present in stream A - RED
    pub fn only_a(&self, s: &str) -> String {
        self.wrap(s, RED)
    }

    /// Content only present in stream B - GREEN
    pub fn only_b(&self, s: &str) -> String {
        self.wrap(s, GREEN)
    }

    /// Outcome type changes - YELLOW
    pub fn changed(&self, s: &str) -> String {
        self.wrap(s, YELLOW)
    }

    /// Source locations - CYAN
    pub fn location(&self, s: &str) -> String {
        self.wrap(s, CYAN)
    }

    /// Section titles - BOLD
    pub fn header(&self, s: &str) -> String {
        self.wrap(s, BOLD)
    }

    /// Separators - DIM
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
