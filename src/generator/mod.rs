//! Randomized configuration search
//!
//! Samples a target difficulty and grows a configuration one obstacle at a
//! time until the knowledge base's bound for it brackets the target.
//!
//! Boundary rules:
//! - a configuration is still too easy when `max < desired` (strict)
//! - it brackets the target when `min <= desired <= max`
//! - when trimming an overshoot crosses a discontinuity, the lower intensity
//!   wins only if its gap to `desired` is strictly smaller; ties keep the
//!   higher intensity

use rand::RngCore;
use serde::Serialize;
use tracing::{debug, trace};

use crate::knowledge::{Bound, KnowledgeBase};
use crate::obstacle::OBSTACLE_COUNT;
use crate::permutation::{Permutation, MAX_INTENSITY};
use crate::rng::SecureRng;

/// How the search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchEnd {
    /// The empty configuration already brackets the target
    Empty,
    /// A configuration whose bound contains the target
    Bracketed,
    /// Trimming crossed a jump in the bound; the nearer side was kept
    Discontinuity,
    /// Every obstacle was placed without reaching the target
    Exhausted,
}

/// Result of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub permutation: Permutation,
    pub bound: Bound,
    pub desired: f64,
    pub end: SearchEnd,
    /// Bound queries issued, including the initial empty one
    pub queries: usize,
}

impl SearchOutcome {
    pub fn is_bracketed(&self) -> bool {
        self.bound.contains(self.desired)
    }
}

/// Sample a target difficulty and search for a configuration bracketing it
pub fn generate<R: RngCore>(kb: &KnowledgeBase, rng: &mut SecureRng<R>) -> SearchOutcome {
    let desired = rng.uniform_f64();
    search(kb, rng, desired)
}

/// Search for a configuration bracketing `desired`
pub fn search<R: RngCore>(kb: &KnowledgeBase, rng: &mut SecureRng<R>, desired: f64) -> SearchOutcome {
    let mut permutation = Permutation::empty();
    let mut bound = kb.bounds(&permutation);
    let mut queries = 1;

    if bound.contains(desired) {
        debug!(desired, "empty configuration brackets target");
        return SearchOutcome { permutation, bound, desired, end: SearchEnd::Empty, queries };
    }

    let mut order: [usize; OBSTACLE_COUNT] = std::array::from_fn(|slot| slot);
    rng.shuffle(&mut order);

    for slot in order {
        let intensity = rng.uniform(1, MAX_INTENSITY as u64) as u8;
        permutation.set(slot, intensity);
        bound = kb.bounds(&permutation);
        queries += 1;
        trace!(slot, intensity, min = bound.min, max = bound.max, "placed obstacle");

        if bound.max < desired {
            continue;
        }
        if bound.min <= desired {
            return SearchOutcome { permutation, bound, desired, end: SearchEnd::Bracketed, queries };
        }

        // Overshot: walk this obstacle back down
        let (end, final_bound) = trim(kb, &mut permutation, slot, bound, desired, &mut queries);
        return SearchOutcome { permutation, bound: final_bound, desired, end, queries };
    }

    debug!(desired, min = bound.min, max = bound.max, "search exhausted all obstacles");
    SearchOutcome { permutation, bound, desired, end: SearchEnd::Exhausted, queries }
}

/// Decrement `slot` until the bound reaches `desired` or jumps past it
///
/// Entered with `bound.min > desired`. Leaves `permutation` at the chosen
/// intensity and returns that intensity's bound.
fn trim(
    kb: &KnowledgeBase,
    permutation: &mut Permutation,
    slot: usize,
    mut bound: Bound,
    desired: f64,
    queries: &mut usize,
) -> (SearchEnd, Bound) {
    let mut intensity = permutation.get(slot);

    while intensity > 0 {
        let above = (intensity, bound);
        intensity -= 1;
        permutation.set(slot, intensity);
        bound = kb.bounds(permutation);
        *queries += 1;

        if bound.max < desired {
            let (hi, hi_bound) = above;
            if bound.distance_to(desired) < hi_bound.distance_to(desired) {
                debug!(slot, kept = intensity, desired, "discontinuity, kept lower side");
                return (SearchEnd::Discontinuity, bound);
            }
            permutation.set(slot, hi);
            debug!(slot, kept = hi, desired, "discontinuity, kept upper side");
            return (SearchEnd::Discontinuity, hi_bound);
        }
        if bound.min <= desired {
            return (SearchEnd::Bracketed, bound);
        }
    }

    // Even the obstacle-free configuration is provably harder than desired
    debug!(slot, desired, min = bound.min, "no configuration reaches target");
    (SearchEnd::Discontinuity, bound)
}
