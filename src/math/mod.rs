//! Mathematical utilities for descriptors and annealing

/// Color and grid distances, variance, and rounding helpers
pub mod distance;
/// Seeded and unseeded uniform random sources
pub mod random;
