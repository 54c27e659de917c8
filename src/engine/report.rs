//! What the presentation layer gets to show for a round

use std::fmt;

use serde::Serialize;

use crate::engine::Round;

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleLine {
    pub id: u16,
    pub name: &'static str,
    pub intensity: u8,
}

/// Display payload for the current round
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub code: String,
    pub desired: f64,
    pub min: f64,
    pub max: f64,
    pub obstacles: Vec<ObstacleLine>,
    pub mastery_percent: f64,
}

impl RoundReport {
    pub fn new(round: &Round, mastery: f64) -> Self {
        let outcome = &round.outcome;
        Self {
            code: round.code.clone(),
            desired: outcome.desired,
            min: outcome.bound.min,
            max: outcome.bound.max,
            obstacles: outcome
                .permutation
                .enabled()
                .map(|(o, intensity)| ObstacleLine { id: o.id, name: o.name, intensity })
                .collect(),
            mastery_percent: mastery * 100.0,
        }
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code: {}", self.code)?;
        writeln!(
            f,
            "Difficulty: desired {:.3}, bound [{:.3}, {:.3}]",
            self.desired, self.min, self.max
        )?;
        if self.obstacles.is_empty() {
            writeln!(f, "  (no obstacles)")?;
        }
        for line in &self.obstacles {
            writeln!(f, "  {:<16} {:>2}", line.name, line.intensity)?;
        }
        write!(f, "Mastery: {:.1}%", self.mastery_percent)
    }
}
