//! Observation records and the on-disk record layout

use std::cmp::Ordering;

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::obstacle::OBSTACLE_COUNT;
use crate::permutation::Permutation;

/// Accumulated feedback for one configuration
///
/// `numerator / denominator` is the difficulty ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub permutation: Permutation,
    pub numerator: i32,
    pub denominator: i32,
}

impl Observation {
    pub fn new(permutation: Permutation, numerator: i32, denominator: i32) -> Self {
        Self { permutation, numerator, denominator }
    }

    pub fn ratio(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Exact ratio comparison by cross-multiplication
    pub fn cmp_ratio(&self, other: &Observation) -> Ordering {
        let lhs = self.numerator as i64 * other.denominator as i64;
        let rhs = other.numerator as i64 * self.denominator as i64;
        lhs.cmp(&rhs)
    }

    /// True when `self` and `other` do not contradict the monotonicity rule
    ///
    /// Comparable pairs must have their ratios ordered like their
    /// configurations; incomparable pairs are always consistent.
    pub fn is_consistent_with(&self, other: &Observation) -> bool {
        if self.permutation.is_subset(&other.permutation)
            && self.cmp_ratio(other) == Ordering::Greater
        {
            return false;
        }
        if other.permutation.is_subset(&self.permutation)
            && other.cmp_ratio(self) == Ordering::Greater
        {
            return false;
        }
        true
    }

    /// A record is well formed if its ratio lies in `[0, 1]`
    pub fn is_well_formed(&self) -> bool {
        self.denominator > 0 && (0..=self.denominator).contains(&self.numerator)
    }
}

/// Fixed 32-byte record as written to the knowledge store
///
/// 24 intensity bytes followed by numerator and denominator in native byte
/// order. No header, no version.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawRecord {
    pub intensities: [u8; OBSTACLE_COUNT],
    pub numerator: i32,
    pub denominator: i32,
}

pub const RECORD_SIZE: usize = std::mem::size_of::<RawRecord>();

/// Largest denominator accepted from the store, leaving headroom for merges
pub const MAX_STORED_DENOMINATOR: i32 = i32::MAX / 2;

impl From<&Observation> for RawRecord {
    fn from(obs: &Observation) -> Self {
        Self {
            intensities: *obs.permutation.intensities(),
            numerator: obs.numerator,
            denominator: obs.denominator,
        }
    }
}

impl RawRecord {
    /// Convert back, rejecting out-of-range intensities, bad ratios and
    /// denominators too close to overflow
    pub fn to_observation(&self) -> Option<Observation> {
        let permutation = Permutation::from_intensities(self.intensities)?;
        let obs = Observation::new(permutation, self.numerator, self.denominator);
        (obs.is_well_formed() && obs.denominator <= MAX_STORED_DENOMINATOR).then_some(obs)
    }
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
    fn test_record_size_is_32_bytes() {
        assert_eq!(RECORD_SIZE, 32);
    }

    #[test]
    fn test_ratio_comparison_is_exact() {
        let a = Observation::new(Permutation::empty(), 1, 3);
        let b = Observation::new(Permutation::empty(), 2, 6);
        assert_eq!(a.cmp_ratio(&b), Ordering::Equal);
        let c = Observation::new(Permutation::empty(), 2, 3);
        assert_eq!(a.cmp_ratio(&c), Ordering::Less);
    }

    #[test]
    fn test_superset_must_not_be_easier() {
        let easy_small = Observation::new(perm(0, 4), 0, 3);
        let hard_big = Observation::new(perm(0, 8), 3, 3);
        assert!(easy_small.is_consistent_with(&hard_big));

        let hard_small = Observation::new(perm(0, 4), 3, 3);
        let easy_big = Observation::new(perm(0, 8), 0, 3);
        assert!(!hard_small.is_consistent_with(&easy_big));
        assert!(!easy_big.is_consistent_with(&hard_small));
    }

    #[test]
    fn test_incomparable_always_consistent() {
        let a = Observation::new(perm(0, 4), 3, 3);
        let b = Observation::new(perm(1, 4), 0, 3);
        assert!(a.is_consistent_with(&b));
    }

    #[test]
    fn test_equal_configs_need_equal_ratios() {
        let a = Observation::new(perm(2, 10), 1, 3);
        let b = Observation::new(perm(2, 10), 2, 3);
        assert!(!a.is_consistent_with(&b));
        assert!(a.is_consistent_with(&a));
    }

    #[test]
    fn test_raw_record_validation() {
        let obs = Observation::new(perm(5, 32), 2, 3);
        let raw = RawRecord::from(&obs);
        assert_eq!(raw.to_observation(), Some(obs));

        let bad_ratio = RawRecord { numerator: 4, ..raw };
        assert!(bad_ratio.to_observation().is_none());

        let zero_den = RawRecord { numerator: 0, denominator: 0, ..raw };
        assert!(zero_den.to_observation().is_none());

        let huge_den = RawRecord { numerator: 0, denominator: i32::MAX, ..raw };
        assert!(huge_den.to_observation().is_none());
        let limit_den = RawRecord { numerator: 1, denominator: MAX_STORED_DENOMINATOR, ..raw };
        assert!(limit_den.to_observation().is_some());

        let mut bad_intensity = raw;
        bad_intensity.intensities[0] = 40;
        assert!(bad_intensity.to_observation().is_none());
    }
}
