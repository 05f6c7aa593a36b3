use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Workout difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Impossible,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Impossible => "impossible",
        }
    }

    /// Case-insensitive parse; `None` for anything unrecognised.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Level::Beginner),
            "intermediate" => Some(Level::Intermediate),
            "impossible" => Some(Level::Impossible),
            _ => None,
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse_lenient(s).ok_or_else(|| format!("Unknown level: {}", s))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Level::parse_lenient("BEGINNER"), Some(Level::Beginner));
        assert_eq!(Level::parse_lenient(" Intermediate "), Some(Level::Intermediate));
        assert_eq!(Level::parse_lenient("impossible"), Some(Level::Impossible));
        assert_eq!(Level::parse_lenient("expert"), None);
    }

    #[test]
    fn test_round_trips_through_display() {
        for level in [Level::Beginner, Level::Intermediate, Level::Impossible] {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
    }
}
