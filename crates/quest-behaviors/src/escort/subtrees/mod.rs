//! Escort behavior tree, assembled from per-concern subtrees.
//!
//! The root is a guarded rule list evaluated from the top every tick:
//!
//! ```text
//! escort_tree()
//!     ├─ death_response()        ← dead or ghost: force CheckDone
//!     ├─ combat_response()       ← only while Escorting a viable group
//!     └─ state_machine()         ← one subtree per BehaviorState
//!         ├─ initial_state()
//!         ├─ searching_for_escort_units()
//!         ├─ interacting_to_start()
//!         ├─ identify_units_to_escort()
//!         ├─ escorting()
//!         ├─ check_done()
//!         └─ UnhandledState      ← default branch, fatal
//! ```
//!
//! The tree holds no state of its own and can be built once per behavior.

pub mod combat;
pub mod states;

use behavior_tree::{Behavior, builder::selector, builder::switch};
use bot_core::{Host, Vec3};

use super::blackboard::Blackboard;
use super::nodes::UnhandledState;
use super::state::BehaviorState;
use crate::selection::group_center;

/// Type alias for escort trees to reduce verbosity.
pub type EscortTree<H> = Box<dyn Behavior<Blackboard<H>>>;

/// The complete escort tree.
pub fn escort_tree<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        combat::death_response(),
        combat::combat_response(),
        state_machine(),
    ])
}

/// Dispatches to the subtree of the current [`BehaviorState`].
pub fn state_machine<H: Host + 'static>() -> EscortTree<H> {
    switch(
        |bb: &Blackboard<H>| bb.state,
        vec![
            (BehaviorState::InitialState, states::initial_state()),
            (
                BehaviorState::SearchingForEscortUnits,
                states::searching_for_escort_units(),
            ),
            (BehaviorState::InteractingToStart, states::interacting_to_start()),
            (
                BehaviorState::IdentifySpecificUnitsToEscort,
                states::identify_units_to_escort(),
            ),
            (BehaviorState::Escorting, states::escorting()),
            (BehaviorState::CheckDone, states::check_done()),
        ],
        Box::new(UnhandledState::new()),
    )
}

// ============================================================================
// Shared movement inputs
// ============================================================================

/// Every escorted unit is beyond fight distance of the agent.
pub(crate) fn group_out_of_reach<H: Host>(bb: &Blackboard<H>) -> bool {
    let me = bb.host.me().location;
    bb.members()
        .iter()
        .all(|unit| unit.distance_to(me) > bb.config.max_fight_distance)
}

/// Some escorted unit is within follow distance of the agent.
pub(crate) fn group_close_enough<H: Host>(bb: &Blackboard<H>) -> bool {
    let me = bb.host.me().location;
    bb.members()
        .iter()
        .any(|unit| unit.distance_to(me) < bb.config.max_follow_distance)
}

pub(crate) fn group_center_point<H: Host>(bb: &Blackboard<H>) -> Option<Vec3> {
    Some(group_center(&bb.members(), bb.host.me().location))
}
