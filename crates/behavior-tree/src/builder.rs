//! Boxed constructors, so trees read as nested calls:
//!
//! ```rust,ignore
//! selector(vec![
//!     guard(|bb| bb.in_combat(), fight()),
//!     action(|bb| bb.follow()),
//! ])
//! ```

use crate::{Action, Behavior, Guard, Selector, Sequence, Status, Switch};

#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

/// See [`Switch`].
#[inline]
pub fn switch<C: 'static, K>(
    key: impl Fn(&C) -> K + Send + Sync + 'static,
    cases: Vec<(K, Box<dyn Behavior<C>>)>,
    default: Box<dyn Behavior<C>>,
) -> Box<dyn Behavior<C>>
where
    K: PartialEq + Send + Sync + 'static,
{
    Box::new(Switch::new(key, cases, default))
}

#[inline]
pub fn guard<C: 'static>(
    predicate: impl Fn(&C) -> bool + Send + Sync + 'static,
    child: Box<dyn Behavior<C>>,
) -> Box<dyn Behavior<C>> {
    Box::new(Guard::new(predicate, child))
}

#[inline]
pub fn action<C: 'static>(
    run: impl Fn(&mut C) -> Status + Send + Sync + 'static,
) -> Box<dyn Behavior<C>> {
    Box::new(Action::new(run))
}
