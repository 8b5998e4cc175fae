//! Scene variants: the serde-facing parameter model and the pure,
//! time-indexed programs built from it.

pub mod model;
pub mod program;
