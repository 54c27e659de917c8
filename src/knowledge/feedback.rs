//! Discrete feedback levels reported after a round

use std::fmt;
use std::str::FromStr;

use crate::core::error::TrainerError;

/// Observations contributed by one feedback event
pub const FEEDBACK_DENOMINATOR: i32 = 3;

/// How hard the player found the last round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    Easy,
    Fair,
    Hard,
    Brutal,
}

impl Feedback {
    pub const ALL: [Feedback; 4] = [Feedback::Easy, Feedback::Fair, Feedback::Hard, Feedback::Brutal];

    /// `(numerator, denominator)` increment merged into the knowledge base
    pub fn increment(self) -> (i32, i32) {
        let numerator = match self {
            Feedback::Easy => 0,
            Feedback::Fair => 1,
            Feedback::Hard => 2,
            Feedback::Brutal => 3,
        };
        (numerator, FEEDBACK_DENOMINATOR)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feedback::Easy => "easy",
            Feedback::Fair => "fair",
            Feedback::Hard => "hard",
            Feedback::Brutal => "brutal",
        };
        f.write_str(name)
    }
}

impl FromStr for Feedback {
    type Err = TrainerError;

    /// Accepts the level number `0`-`3` or its name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "easy" => Ok(Feedback::Easy),
            "1" | "fair" => Ok(Feedback::Fair),
            "2" | "hard" => Ok(Feedback::Hard),
            "3" | "brutal" => Ok(Feedback::Brutal),
            other => Err(TrainerError::UnknownFeedback(other.to_string())),
        }
    }
}
