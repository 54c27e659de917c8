//! Configuration vectors and their pointwise partial order
//!
//! A [`Permutation`] assigns every obstacle slot an intensity in
//! `0..=MAX_INTENSITY`, where 0 disables the obstacle. `A <= B` holds when
//! every slot of `A` is at most the matching slot of `B`; vectors that are
//! larger in some slots and smaller in others are incomparable.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::obstacle::{Obstacle, OBSTACLES, OBSTACLE_COUNT};

/// Highest intensity an obstacle can be set to
pub const MAX_INTENSITY: u8 = 32;

/// One obstacle-set configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Permutation([u8; OBSTACLE_COUNT]);

impl Permutation {
    /// The all-zero configuration (every obstacle disabled)
    pub const fn empty() -> Self {
        Self([0; OBSTACLE_COUNT])
    }

    /// Build from raw intensities, rejecting any above [`MAX_INTENSITY`]
    pub fn from_intensities(intensities: [u8; OBSTACLE_COUNT]) -> Option<Self> {
        if intensities.iter().all(|&v| v <= MAX_INTENSITY) {
            Some(Self(intensities))
        } else {
            None
        }
    }

    pub fn intensities(&self) -> &[u8; OBSTACLE_COUNT] {
        &self.0
    }

    pub fn get(&self, slot: usize) -> u8 {
        self.0[slot]
    }

    /// Set a slot's intensity, clamped to [`MAX_INTENSITY`]
    pub fn set(&mut self, slot: usize, intensity: u8) {
        self.0[slot] = intensity.min(MAX_INTENSITY);
    }

    /// True iff every slot of `self` is <= the same slot of `other`
    pub fn is_subset(&self, other: &Permutation) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// Slot-wise maximum of two configurations (lattice join)
    pub fn join(&self, other: &Permutation) -> Permutation {
        let mut out = *self;
        for (a, b) in out.0.iter_mut().zip(other.0.iter()) {
            *a = (*a).max(*b);
        }
        out
    }

    /// Sum of all intensities
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&v| v as u32).sum()
    }

    /// Enabled obstacles paired with their intensity, in catalog order
    pub fn enabled(&self) -> impl Iterator<Item = (&'static Obstacle, u8)> + '_ {
        OBSTACLES
            .iter()
            .zip(self.0.iter())
            .filter(|(_, &v)| v > 0)
            .map(|(o, &v)| (o, v))
    }
}

impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.is_subset(other), other.is_subset(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (obstacle, intensity) in self.enabled() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", obstacle.name, intensity)?;
            first = false;
        }
        if first {
            write!(f, "(none)")?;
        }
        Ok(())
    }
}
