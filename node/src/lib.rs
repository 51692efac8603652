//! chanvote node: opens the stores, starts the address worker and routes
//! inbound channel messages to the elections they belong to.

pub mod config;
pub mod error;
pub mod node;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{InboundMessage, NodeParts, VotingNode};
