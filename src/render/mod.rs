//! CPU compositing of frame descriptors onto a reusable surface.

pub(crate) mod composite;
pub mod overlay;
pub mod surface;
