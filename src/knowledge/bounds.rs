//! Difficulty bounds derived from the knowledge base

use serde::Serialize;

use crate::knowledge::observation::Observation;
use crate::permutation::Permutation;

/// Achievable difficulty interval `[min, max]` for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    /// No evidence: anything in `[0, 1]` is possible
    pub const UNKNOWN: Bound = Bound { min: 0.0, max: 1.0 };

    /// `min <= x <= max`
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Distance from `x` to the nearest end of the interval, 0 inside
    pub fn distance_to(&self, x: f64) -> f64 {
        if x < self.min {
            self.min - x
        } else if x > self.max {
            x - self.max
        } else {
            0.0
        }
    }
}

/// Bound for `permutation` given `records`
///
/// Records above the configuration cap `max`, records below it raise `min`.
/// A crossed interval means the monotonicity invariant was broken, which is
/// unrecoverable.
pub fn query(records: &[Observation], permutation: &Permutation) -> Bound {
    let mut bound = Bound::UNKNOWN;

    for record in records {
        let ratio = record.ratio();
        if permutation.is_subset(&record.permutation) {
            bound.max = bound.max.min(ratio);
        }
        if record.permutation.is_subset(permutation) {
            bound.min = bound.min.max(ratio);
        }
    }

    assert!(
        bound.min <= bound.max,
        "knowledge base lost monotonicity: bound [{}, {}] for {}",
        bound.min,
        bound.max,
        permutation
    );
    bound
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(slot: usize, v: u8) -> Permutation {
        let mut p = Permutation::empty();
        p.set(slot, v);
        p
    }

    #[test]
    fn test_empty_records_unknown() {
        assert_eq!(query(&[], &Permutation::empty()), Bound::UNKNOWN);
    }

    #[test]
    fn test_exact_match_pins_both_ends() {
        let records = [Observation::new(perm(0, 10), 1, 3)];
        let b = query(&records, &perm(0, 10));
        assert_eq!(b.min, b.max);
        assert!((b.min - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lower_and_upper_evidence() {
        let records = [
            Observation::new(perm(0, 5), 1, 3),
            Observation::new(perm(0, 20), 2, 3),
        ];
        let b = query(&records, &perm(0, 10));
        assert!((b.min - 1.0 / 3.0).abs() < 1e-12);
        assert!((b.max - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_incomparable_record_ignored() {
        let records = [Observation::new(perm(1, 5), 3, 3)];
        assert_eq!(query(&records, &perm(0, 5)), Bound::UNKNOWN);
    }

    #[test]
    #[should_panic(expected = "monotonicity")]
    fn test_crossed_bound_panics() {
        let records = [
            Observation::new(perm(0, 5), 3, 3),
            Observation::new(perm(0, 20), 0, 3),
        ];
        query(&records, &perm(0, 10));
    }

    #[test]
    fn test_distance_to() {
        let b = Bound { min: 0.25, max: 0.5 };
        assert_eq!(b.distance_to(0.3), 0.0);
        assert!((b.distance_to(0.1) - 0.15).abs() < 1e-12);
        assert!((b.distance_to(0.75) - 0.25).abs() < 1e-12);
        assert!(b.contains(0.25) && b.contains(0.5));
    }
}
