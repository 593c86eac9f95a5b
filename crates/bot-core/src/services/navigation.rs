use strum::{Display, IntoStaticStr};

use crate::geometry::Vec3;

/// Outcome of a single pathing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, IntoStaticStr)]
pub enum MoveResult {
    Moved,
    ReachedDestination,
    Failed,
    PathGenerationFailed,
    UnstuckAttempt,
}

impl MoveResult {
    /// Pathing gave up; the caller should fall back to a straight-line move.
    #[inline]
    pub fn needs_fallback(self) -> bool {
        matches!(self, Self::Failed | Self::PathGenerationFailed)
    }
}

pub trait Navigator {
    /// Advances one step along a generated path toward `destination`.
    fn move_to(&mut self, destination: Vec3) -> MoveResult;

    /// Straight-line move that bypasses path generation.
    fn click_to_move(&mut self, destination: Vec3);

    /// True when the agent is close enough to `destination` to stop.
    fn at_location(&self, destination: Vec3) -> bool;

    /// Walkable-surface trace from `from` to `to`.
    ///
    /// Returns the first obstruction hit, or `None` when the segment is clear.
    fn trace_obstruction(&self, _from: Vec3, _to: Vec3) -> Option<Vec3> {
        None
    }

    /// Snaps `point` onto the ground below it, or `None` when there is none.
    fn ground_height(&self, point: Vec3) -> Option<Vec3> {
        Some(point)
    }

    fn can_mount(&self) -> bool;

    fn mount(&mut self);

    fn dismount(&mut self);
}
