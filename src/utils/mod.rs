//! Utility modules for fabchat
//!
//! Small building blocks shared by the decoding and orchestration layers.

pub mod cancel;
pub mod sse_stream;

pub use sse_stream::{SseStream, SseStreamExt};
