//! Render lifecycle: the cooperative tick driver and its owning manager.

pub mod compositor;
pub mod render_session;
