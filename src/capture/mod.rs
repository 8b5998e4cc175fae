//! Codec negotiation, stream encoders, and the recording state machine.

pub mod codec;
pub mod encoder;
pub mod ffmpeg;
pub mod session;
