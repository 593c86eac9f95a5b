//! Single-child wrappers.

use crate::{Behavior, Status};

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Ticks its child only while `predicate` holds, `Failure` otherwise.
///
/// Inside a [`Selector`](crate::Selector) a guard reads as a rule: "when X,
/// do Y, else fall through".
pub struct Guard<C> {
    predicate: Predicate<C>,
    child: Box<dyn Behavior<C>>,
}

impl<C> Guard<C> {
    pub fn new(
        predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
        child: Box<dyn Behavior<C>>,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            child,
        }
    }
}

impl<C> Behavior<C> for Guard<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        if !(self.predicate)(ctx) {
            return Status::Failure;
        }
        self.child.tick(ctx)
    }
}
