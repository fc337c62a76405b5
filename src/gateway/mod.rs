//! Gateways to the generation upstream and the tool server.
//!
//! The orchestrator never talks HTTP directly; it consumes the
//! [`GenerationBackend`] and [`ToolExecutor`] contracts, for which
//! [`GenerationGateway`] and [`ToolGateway`] are the production
//! implementations.

pub mod catalogue;
pub mod generation;
pub mod tools;

pub use catalogue::default_catalogue;
pub use generation::{GenerationBackend, GenerationGateway};
pub use tools::{DiscoverySource, ToolDiscovery, ToolExecutor, ToolGateway, ToolOutcome};
