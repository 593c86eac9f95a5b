//! The node trait.

use crate::Status;

/// A node evaluated against a blackboard `C`.
///
/// Nodes are shared between ticks and hold no mutable state of their own;
/// anything that must outlive a tick is written to `ctx`.
pub trait Behavior<C>: Send + Sync {
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
