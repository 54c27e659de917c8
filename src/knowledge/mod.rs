//! Knowledge base of difficulty observations
//!
//! Holds at most one [`Observation`] per configuration and keeps the set
//! monotone: if `a.permutation <= b.permutation` then `a.ratio <= b.ratio`.
//! Every ingestion evicts whatever the new observation contradicts.

pub mod bounds;
pub mod feedback;
pub mod observation;
pub mod store;

pub use bounds::Bound;
pub use feedback::Feedback;
pub use observation::Observation;
pub use store::{FileStore, MemoryStore, RecordStore};

use tracing::{debug, warn};

use crate::obstacle::OBSTACLE_COUNT;
use crate::permutation::{Permutation, MAX_INTENSITY};

/// Records with a ratio below `1 / MASTERY_DIVISOR` count towards mastery
const MASTERY_DIVISOR: i64 = 6;

/// Monotone set of difficulty observations
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<Observation>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored records
    ///
    /// Records are ingested one by one, so a store that somehow holds
    /// contradicting records or repeated configurations still yields a
    /// monotone knowledge base with one record per configuration.
    pub fn from_records(records: Vec<Observation>) -> Self {
        let mut kb = Self::new();
        for record in records {
            kb.ingest(record.permutation, record.numerator, record.denominator);
        }
        kb
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Difficulty interval for `permutation`
    pub fn bounds(&self, permutation: &Permutation) -> Bound {
        bounds::query(&self.records, permutation)
    }

    /// Merge an increment into the record for `permutation`
    ///
    /// Any existing record for the same configuration is folded in and
    /// replaced. Returns how many other records were evicted as inconsistent.
    pub fn ingest(&mut self, permutation: Permutation, numerator: i32, denominator: i32) -> usize {
        let mut merged = Observation::new(permutation, numerator, denominator);

        if let Some(pos) = self.records.iter().position(|r| r.permutation == permutation) {
            let mut old = self.records.swap_remove(pos);
            loop {
                match (
                    merged.numerator.checked_add(old.numerator),
                    merged.denominator.checked_add(old.denominator),
                ) {
                    (Some(numerator), Some(denominator)) => {
                        merged.numerator = numerator;
                        merged.denominator = denominator;
                        break;
                    }
                    _ => {
                        // Halving keeps 0 <= n <= d and roughly the same ratio
                        warn!(permutation = %permutation, denominator = old.denominator, "counts saturated, halving history");
                        old.numerator /= 2;
                        old.denominator /= 2;
                    }
                }
            }
        }

        self.insert(merged)
    }

    /// Record a feedback event for `permutation`
    pub fn record_feedback(&mut self, permutation: Permutation, feedback: Feedback) -> usize {
        let (numerator, denominator) = feedback.increment();
        self.ingest(permutation, numerator, denominator)
    }

    fn insert(&mut self, new: Observation) -> usize {
        let mut evicted = 0;
        let mut i = 0;
        while i < self.records.len() {
            if self.records[i].is_consistent_with(&new) {
                i += 1;
            } else {
                let gone = self.records.swap_remove(i);
                debug!(permutation = %gone.permutation, ratio = gone.ratio(), "evicted contradicted record");
                evicted += 1;
            }
        }
        self.records.push(new);
        evicted
    }

    /// True if no pair of records contradicts the monotonicity rule
    pub fn is_consistent(&self) -> bool {
        self.records.iter().enumerate().all(|(i, a)| {
            self.records[i + 1..].iter().all(|b| a.is_consistent_with(b))
        })
    }

    /// Slot-wise maximum over every configuration rated clearly easy
    pub fn mastered(&self) -> Permutation {
        self.records
            .iter()
            .filter(|r| (r.numerator as i64) * MASTERY_DIVISOR < r.denominator as i64)
            .fold(Permutation::empty(), |acc, r| acc.join(&r.permutation))
    }

    /// Fraction of total obstacle intensity that has been mastered, in `[0, 1]`
    pub fn mastery(&self) -> f64 {
        self.mastered().total() as f64 / (OBSTACLE_COUNT as f64 * MAX_INTENSITY as f64)
    }
}
