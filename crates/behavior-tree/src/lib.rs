//! Reactive behavior trees for tick-driven bots.
//!
//! A tree holds no per-run state. The host re-evaluates it from the root
//! every frame, and a branch that needs more frames (a move, a paced
//! conversation) answers [`Status::Running`] and is simply re-entered on the
//! next tick. Timers, targets and the current state live in the context `C`.
//!
//! # Nodes
//!
//! - [`Sequence`] / [`Selector`]: ordered AND / first-handler-wins
//! - [`Switch`]: dispatch on a key projected from the context
//! - [`Guard`]: predicate gate in front of a single child
//! - [`Action`]: closure leaf for one-line steps
//!
//! [`builder`] has boxed constructors for all of them.

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod status;

pub use behavior::Behavior;
pub use composite::{Selector, Sequence, Switch};
pub use decorator::Guard;
pub use leaf::Action;
pub use status::Status;
