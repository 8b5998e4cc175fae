//! Time-curve primitives for scene programs.

pub mod ease;
