//! "Move toward X until told to stop".
//!
//! A [`MovementState`] debounces one movement context. Once the start
//! condition fires the mover keeps going on later ticks until it arrives or
//! the stop condition holds, even if the start condition has since cleared.
//! The stop condition wins when both hold.

use std::time::{Duration, Instant};

use behavior_tree::Status;
use bot_core::{MoveResult, Navigator, Vec3};
use tracing::{debug, info};

use crate::throttle::Throttle;

const PROGRESS_NOTICE_INTERVAL: Duration = Duration::from_secs(1);

/// One evaluation of a movement's inputs.
#[derive(Clone, Copy, Debug)]
pub struct MoveRequest<'a> {
    pub start: bool,
    pub stop: bool,
    pub destination: Vec3,
    pub label: &'a str,
}

#[derive(Clone, Debug)]
pub struct MovementState {
    in_progress: bool,
    progress_notice: Throttle,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            in_progress: false,
            progress_notice: Throttle::new(PROGRESS_NOTICE_INTERVAL),
        }
    }
}

impl MovementState {
    pub fn cancel(&mut self) {
        self.in_progress = false;
    }

    /// Advances this movement by one tick.
    ///
    /// Returns `Failure` when idle and not asked to move, `Running` while the
    /// move is underway, and `Success` on the tick the move ends.
    pub fn drive<N: Navigator + ?Sized>(
        &mut self,
        nav: &mut N,
        now: Instant,
        request: MoveRequest<'_>,
    ) -> Status {
        if !self.in_progress {
            if request.start && !request.stop && !nav.at_location(request.destination) {
                self.in_progress = true;
                return Status::Running;
            }
            return Status::Failure;
        }

        if nav.at_location(request.destination) || request.stop {
            self.in_progress = false;
            return Status::Success;
        }

        if self.progress_notice.ready(now) {
            info!("Moving to {}", request.label);
        }
        move_or_click(nav, request.destination);
        Status::Running
    }
}

/// Issues a navigator move, clicking straight at `destination` when no path
/// can be built.
pub fn move_or_click<N: Navigator + ?Sized>(nav: &mut N, destination: Vec3) -> MoveResult {
    let result = nav.move_to(destination);
    if result.needs_fallback() {
        debug!(%result, %destination, "pathing failed, moving in a straight line");
        nav.click_to_move(destination);
    }
    result
}
