use std::fmt;
use std::str::FromStr;

/// How a single query token is located inside candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Ordered subsequence: characters in order, gaps allowed.
    #[default]
    Fuzzy,
    /// Contiguous substring.
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match mode `{0}` (expected `fuzzy` or `normal`)")]
pub struct ParseModeError(pub String);

impl MatchMode {
    pub const ALL: [MatchMode; 2] = [MatchMode::Fuzzy, MatchMode::Normal];

    /// Next mode in the fixed cycle order (wraps around).
    pub fn next(self) -> Self {
        match self {
            MatchMode::Fuzzy => MatchMode::Normal,
            MatchMode::Normal => MatchMode::Fuzzy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Fuzzy => "fuzzy",
            MatchMode::Normal => "normal",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = ParseModeError;

    /// Case-insensitive, surrounding whitespace ignored. `exact` is accepted for `normal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuzzy" => Ok(MatchMode::Fuzzy),
            "normal" | "exact" => Ok(MatchMode::Normal),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
