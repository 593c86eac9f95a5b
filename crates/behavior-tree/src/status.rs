//! Node results.

/// Outcome of ticking a node once.
///
/// Parents read the three values as:
/// - `Success`: the node did its job this tick
/// - `Failure`: the node does not apply; try the next sibling
/// - `Running`: the node issued work that spans ticks and owns this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    Running,
}

impl Status {
    /// `true` for `Success` and `Running`: a selector stops on either.
    #[inline]
    pub fn is_handled(self) -> bool {
        !matches!(self, Status::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failure_is_unhandled() {
        assert!(Status::Success.is_handled());
        assert!(Status::Running.is_handled());
        assert!(!Status::Failure.is_handled());
    }
}
