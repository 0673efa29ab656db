use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One-time supports a player may use during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifeline {
    /// Removes two wrong options.
    FiftyFifty,
    /// Swaps the current question for another one at the same level.
    ChangeQuestion,
    /// Asks the hint provider for a nudge based on the explanation.
    AiSupport,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lifeline: {0}")]
pub struct UnknownLifeline(String);

impl Lifeline {
    pub const ALL: [Self; 3] = [Self::FiftyFifty, Self::ChangeQuestion, Self::AiSupport];

    /// Wire name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "fifty_fifty",
            Lifeline::ChangeQuestion => "change_question",
            Lifeline::AiSupport => "ai_support",
        }
    }

    /// Human-readable label for menus.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "50/50",
            Lifeline::ChangeQuestion => "Change Question",
            Lifeline::AiSupport => "AI Support",
        }
    }
}

impl fmt::Display for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifeline {
    type Err = UnknownLifeline;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lifeline| lifeline.as_str() == s)
            .ok_or_else(|| UnknownLifeline(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        for lifeline in Lifeline::ALL {
            assert_eq!(lifeline.as_str().parse::<Lifeline>().unwrap(), lifeline);
        }
        assert!("phone_a_friend".parse::<Lifeline>().is_err());
    }

    #[test]
    fn serde_matches_wire_names() {
        let json = serde_json::to_string(&Lifeline::ChangeQuestion).unwrap();
        assert_eq!(json, "\"change_question\"");
    }
}
