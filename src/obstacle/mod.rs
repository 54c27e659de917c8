//! Obstacle catalog
//!
//! The fixed set of tunable obstacles. Ids are stable across versions and
//! deliberately sparse; the slot index (position in [`OBSTACLES`]) is what a
//! [`Permutation`](crate::permutation::Permutation) is indexed by.

use serde::Serialize;

/// Number of obstacles, and the length of every configuration vector
pub const OBSTACLE_COUNT: usize = 24;

/// A tunable obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Obstacle {
    pub id: u16,
    pub name: &'static str,
}

impl Obstacle {
    const fn new(id: u16, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// All obstacles, in slot order
pub static OBSTACLES: [Obstacle; OBSTACLE_COUNT] = [
    Obstacle::new(1, "Spike Floor"),
    Obstacle::new(2, "Spike Ceiling"),
    Obstacle::new(4, "Saw Blade"),
    Obstacle::new(5, "Crumbling Ledge"),
    Obstacle::new(7, "Wind Gust"),
    Obstacle::new(8, "Moving Platform"),
    Obstacle::new(11, "Laser Grid"),
    Obstacle::new(12, "Flame Jet"),
    Obstacle::new(14, "Ice Patch"),
    Obstacle::new(17, "Conveyor"),
    Obstacle::new(18, "Bounce Pad"),
    Obstacle::new(21, "Falling Block"),
    Obstacle::new(22, "Homing Drone"),
    Obstacle::new(25, "Turret"),
    Obstacle::new(27, "Darkness"),
    Obstacle::new(30, "Rising Water"),
    Obstacle::new(31, "Gravity Flip"),
    Obstacle::new(33, "Pendulum"),
    Obstacle::new(36, "Sticky Goo"),
    Obstacle::new(40, "Crusher"),
    Obstacle::new(41, "Timer Door"),
    Obstacle::new(44, "Teleporter"),
    Obstacle::new(48, "Decoy Coin"),
    Obstacle::new(52, "Time Limit"),
];

/// Find an obstacle's slot by id
pub fn slot_of(id: u16) -> Option<usize> {
    OBSTACLES.iter().position(|o| o.id == id)
}

/// Get an obstacle by id
pub fn get(id: u16) -> Option<&'static Obstacle> {
    OBSTACLES.iter().find(|o| o.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<u16> = OBSTACLES.iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), OBSTACLE_COUNT);
    }

    #[test]
    fn test_ids_are_sparse() {
        let max_id = OBSTACLES.iter().map(|o| o.id).max().unwrap();
        assert!(max_id as usize > OBSTACLE_COUNT);
    }

    #[test]
    fn test_lookup_by_id() {
        assert_eq!(slot_of(4), Some(2));
        assert_eq!(get(40).map(|o| o.name), Some("Crusher"));
        assert_eq!(slot_of(3), None);
    }
}
