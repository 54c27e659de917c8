//! cktrain - Adaptive obstacle-course difficulty trainer

pub mod core;
pub mod encoder;
pub mod engine;
pub mod generator;
pub mod knowledge;
pub mod obstacle;
pub mod permutation;
pub mod rng;
