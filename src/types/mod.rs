//! Core data types shared across the engine.

pub mod chat;
pub mod events;
pub mod tools;

pub use chat::*;
pub use events::*;
pub use tools::*;
