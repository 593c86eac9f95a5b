//! Escort-specific behavior tree nodes.
//!
//! Nodes are unit structs (or small parameter structs) implementing
//! [`behavior_tree::Behavior`] over the escort [`Blackboard`](super::blackboard::Blackboard):
//!
//! - `conditions`: Nodes that only inspect the world and the blackboard
//! - `actions`: Nodes that command the host

pub mod actions;
pub mod conditions;

pub use actions::*;
pub use conditions::*;
