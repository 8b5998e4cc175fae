//! Shared primitives: error taxonomy, geometry/rate types, blend math.

pub mod core;
pub mod error;
pub(crate) mod math;
