//! Terminal capability probing.
//!
//! Detection runs once at startup. Only the colour flag is consumed today: when it is off the
//! renderer emits plain text with no SGR sequences at all.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub color: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        Self::from_env(
            |key| std::env::var(key).ok(),
            crossterm::style::available_color_count(),
        )
    }

    /// Decide colour support from environment lookups and the terminal's advertised colour
    /// count. `NO_COLOR` wins over `FORCE_COLOR`; a `dumb` terminal never gets colour.
    pub fn from_env<F>(lookup: F, color_count: u16) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let color = if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            false
        } else if lookup("FORCE_COLOR").is_some_and(|v| v != "0") {
            true
        } else if lookup("TERM").is_some_and(|t| t == "dumb") {
            false
        } else {
            color_count >= 8
        };
        Self { color }
    }

    pub fn monochrome() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }
}
