//! Closure-backed leaves.
//!
//! Most leaves in an escort tree are one-liners ("clear the target and move
//! on"). [`Action`] lets those be written inline instead of as a struct.

use crate::{Behavior, Status};

/// Leaf that runs a closure against the context and returns its status.
pub struct Action<C> {
    run: Box<dyn Fn(&mut C) -> Status + Send + Sync>,
}

impl<C> Action<C> {
    pub fn new(run: impl Fn(&mut C) -> Status + Send + Sync + 'static) -> Self {
        Self { run: Box::new(run) }
    }
}

impl<C> Behavior<C> for Action<C> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (self.run)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sequence;

    #[test]
    fn actions_share_the_context_within_a_tick() {
        let seq: Sequence<Vec<u32>> = Sequence::new(vec![
            Box::new(Action::new(|log: &mut Vec<u32>| {
                log.push(1);
                Status::Success
            })),
            Box::new(Action::new(|log: &mut Vec<u32>| {
                log.push(log.len() as u32 + 1);
                if log.len() < 4 { Status::Success } else { Status::Failure }
            })),
        ]);

        let mut log = Vec::new();
        assert_eq!(seq.tick(&mut log), Status::Success);
        assert_eq!(seq.tick(&mut log), Status::Failure);
        assert_eq!(log, vec![1, 2, 1, 4]);
    }
}
