//! Composite nodes.
//!
//! [`Sequence`] and [`Selector`] walk their children left to right and stop
//! at the first child that decides the tick. [`Switch`] picks exactly one
//! child from a key, which is how a state enum on the blackboard selects the
//! subtree for the current state.

use crate::{Behavior, Status};

type KeyFn<C, K> = Box<dyn Fn(&C) -> K + Send + Sync>;

/// Runs children in order while they succeed.
///
/// # Semantics
///
/// - `Success`: move on to the next child
/// - `Failure` or `Running`: stop and return it
/// - every child succeeded: `Success`
///
/// A leading condition child therefore gates everything after it.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Sequence<C> {
    /// # Panics
    ///
    /// Panics on an empty child list; an empty sequence is a wiring mistake.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(!children.is_empty(), "Sequence needs at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            let status = child.tick(ctx);
            if status != Status::Success {
                return status;
            }
        }
        Status::Success
    }
}

/// Tries children in order until one handles the tick.
///
/// # Semantics
///
/// - `Success` or `Running`: stop and return it
/// - `Failure`: try the next child
/// - nobody handled it: `Failure`
///
/// A child may write to the blackboard and still return `Failure` (pick a
/// target, rotate a path); the children below it then see the update on the
/// same tick.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Selector<C> {
    /// # Panics
    ///
    /// Panics on an empty child list.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(!children.is_empty(), "Selector needs at least one child");
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.children
            .iter()
            .map(|child| child.tick(ctx))
            .find(|status| status.is_handled())
            .unwrap_or(Status::Failure)
    }
}

/// Ticks the one child registered for the current key.
///
/// The key is read once per tick. Keys without a case go to `default`.
pub struct Switch<C, K> {
    key: KeyFn<C, K>,
    cases: Vec<(K, Box<dyn Behavior<C>>)>,
    default: Box<dyn Behavior<C>>,
}

impl<C, K: PartialEq> Switch<C, K> {
    pub fn new(
        key: impl Fn(&C) -> K + Send + Sync + 'static,
        cases: Vec<(K, Box<dyn Behavior<C>>)>,
        default: Box<dyn Behavior<C>>,
    ) -> Self {
        Self {
            key: Box::new(key),
            cases,
            default,
        }
    }
}

impl<C, K> Behavior<C> for Switch<C, K>
where
    K: PartialEq + Send + Sync,
{
    fn tick(&self, ctx: &mut C) -> Status {
        let key = (self.key)(ctx);
        let child = self
            .cases
            .iter()
            .find_map(|(case, child)| (*case == key).then_some(child))
            .unwrap_or(&self.default);
        child.tick(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which leaves ran, in order.
    #[derive(Default)]
    struct Trace {
        mode: u8,
        ran: Vec<&'static str>,
    }

    struct Leaf(&'static str, Status);

    impl Behavior<Trace> for Leaf {
        fn tick(&self, ctx: &mut Trace) -> Status {
            ctx.ran.push(self.0);
            self.1
        }
    }

    fn leaf(name: &'static str, status: Status) -> Box<dyn Behavior<Trace>> {
        Box::new(Leaf(name, status))
    }

    #[test]
    fn sequence_runs_through_successes() {
        let seq = Sequence::new(vec![leaf("a", Status::Success), leaf("b", Status::Success)]);
        let mut trace = Trace::default();

        assert_eq!(seq.tick(&mut trace), Status::Success);
        assert_eq!(trace.ran, ["a", "b"]);
    }

    #[test]
    fn sequence_stops_at_failure_or_running() {
        let failing = Sequence::new(vec![
            leaf("check", Status::Failure),
            leaf("act", Status::Success),
        ]);
        let mut trace = Trace::default();
        assert_eq!(failing.tick(&mut trace), Status::Failure);
        assert_eq!(trace.ran, ["check"]);

        let moving = Sequence::new(vec![leaf("move", Status::Running), leaf("talk", Status::Success)]);
        let mut trace = Trace::default();
        assert_eq!(moving.tick(&mut trace), Status::Running);
        assert_eq!(trace.ran, ["move"]);
    }

    #[test]
    fn selector_falls_through_failures() {
        let sel = Selector::new(vec![
            leaf("fight", Status::Failure),
            leaf("follow", Status::Running),
            leaf("idle", Status::Success),
        ]);
        let mut trace = Trace::default();

        assert_eq!(sel.tick(&mut trace), Status::Running);
        assert_eq!(trace.ran, ["fight", "follow"]);
    }

    #[test]
    fn selector_fails_when_nothing_applies() {
        let sel = Selector::new(vec![leaf("a", Status::Failure), leaf("b", Status::Failure)]);
        let mut trace = Trace::default();

        assert_eq!(sel.tick(&mut trace), Status::Failure);
        assert_eq!(trace.ran, ["a", "b"]);
    }

    #[test]
    fn switch_ticks_only_the_matching_case() {
        let switch = Switch::new(
            |ctx: &Trace| ctx.mode,
            vec![(0, leaf("zero", Status::Success)), (1, leaf("one", Status::Running))],
            leaf("default", Status::Failure),
        );

        let mut trace = Trace {
            mode: 1,
            ..Trace::default()
        };
        assert_eq!(switch.tick(&mut trace), Status::Running);
        assert_eq!(trace.ran, ["one"]);

        trace.mode = 7;
        assert_eq!(switch.tick(&mut trace), Status::Failure);
        assert_eq!(trace.ran, ["one", "default"]);
    }

    #[test]
    #[should_panic(expected = "Selector needs at least one child")]
    fn empty_selector_is_rejected() {
        let _ = Selector::<Trace>::new(Vec::new());
    }
}
