//! Responses that pre-empt the state machine.
//!
//! Both run ahead of the per-state subtrees on every tick. The combat
//! response mostly steers the host's own combat handling and falls through,
//! so the state machine still gets its turn unless the agent has to move.

use behavior_tree::builder::{action, selector, sequence};
use behavior_tree::Status;
use bot_core::Host;

use super::{EscortTree, group_center_point, group_close_enough, group_out_of_reach};
use crate::escort::blackboard::Blackboard;
use crate::escort::nodes::{
    AgentDown, ChooseNextTarget, EscortUnderway, FocusSelectedTarget, MoveTo, MovementSlot,
    SwitchToPriorityTarget,
};
use crate::escort::state::BehaviorState;

/// Sends a dead agent to `CheckDone` so the escort is re-evaluated once it
/// is back on its feet.
pub fn death_response<H: Host + 'static>() -> EscortTree<H> {
    sequence(vec![
        Box::new(AgentDown),
        action(|bb: &mut Blackboard<H>| {
            bb.set_state(BehaviorState::CheckDone);
            Status::Success
        }),
    ])
}

/// Keeps the fight centred on the escorted group.
///
/// Priority order:
/// 1. Never drift beyond fight distance of every escorted unit
/// 2. Switch to the nearest priority target near the group
/// 3. Keep the bot's kill target on the selected mob, starting the fight if idle
/// 4. Pick a new target when the old one is gone and the group is attacked
pub fn combat_response<H: Host + 'static>() -> EscortTree<H> {
    sequence(vec![
        Box::new(EscortUnderway),
        selector(vec![
            Box::new(MoveTo::new(
                MovementSlot::Combat,
                group_out_of_reach,
                group_close_enough,
                group_center_point,
                "nearest escorted unit",
            )),
            Box::new(SwitchToPriorityTarget),
            Box::new(FocusSelectedTarget),
            Box::new(ChooseNextTarget),
        ]),
    ])
}
