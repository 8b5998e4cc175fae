//! Source decoding and frame preparation.
//!
//! All IO happens here, front-loaded before a render starts: every source
//! image becomes an immutable [`frame::PreparedFrame`] at exact canvas
//! dimensions, so the per-tick draw path never touches the decoder or
//! rescales pixels.

pub mod decode;
pub mod frame;
