//! One subtree per [`BehaviorState`].
//!
//! Each subtree is a selector of guarded rules; the first rule that handles
//! the tick wins. Every state change happens inside these subtrees, except
//! the forced `CheckDone` on death.

use behavior_tree::builder::{action, guard, selector, sequence};
use behavior_tree::Status;
use bot_core::Host;
use tracing::{info, warn};

use super::{EscortTree, group_center_point, group_close_enough, group_out_of_reach};
use crate::escort::blackboard::Blackboard;
use crate::escort::nodes::{EscortSettled, GossipToStart, MoveTo, MovementSlot, SpankMobTargetingUs};
use crate::escort::state::{BehaviorState, CheckDoneResolution, resolve_check_done};
use crate::oracle;
use crate::selection::position_to_escort;

/// Return to where the behavior started, then begin searching from the
/// nearest waypoint.
pub fn initial_state<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        Box::new(MoveTo::new(
            MovementSlot::Travel,
            |_| true,
            |_| false,
            |bb| Some(bb.start_location),
            "start location",
        )),
        action(|bb: &mut Blackboard<H>| {
            let here = bb.host.me().location;
            bb.search_path.rotate_to_nearest(here);
            bb.group.clear();
            bb.set_state(BehaviorState::SearchingForEscortUnits);
            Status::Success
        }),
    ])
}

/// Walk the search path until start or escort NPCs show up.
///
/// With start NPCs configured only those count; escort NPCs are looked for
/// once the conversation has happened.
pub fn searching_for_escort_units<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        action(|bb: &mut Blackboard<H>| {
            if bb.config.start_npc_ids.is_empty() || bb.find_start_npcs().is_empty() {
                return Status::Failure;
            }
            bb.set_state(BehaviorState::InteractingToStart);
            Status::Success
        }),
        action(|bb: &mut Blackboard<H>| {
            if !bb.config.start_npc_ids.is_empty() || bb.find_escort_npcs().is_empty() {
                return Status::Failure;
            }
            bb.set_state(BehaviorState::IdentifySpecificUnitsToEscort);
            Status::Success
        }),
        action(|bb: &mut Blackboard<H>| {
            if bb.host.me().mounted || !bb.host.can_mount() {
                return Status::Failure;
            }
            bb.host.mount();
            Status::Success
        }),
        action(|bb: &mut Blackboard<H>| {
            let reached = bb
                .search_path
                .front()
                .is_some_and(|waypoint| bb.host.at_location(waypoint));
            if reached && bb.search_path.len() > 1 {
                bb.search_path.rotate();
            }
            Status::Failure
        }),
        Box::new(MoveTo::new(
            MovementSlot::Travel,
            |_| true,
            |_| false,
            |bb| bb.search_path.front(),
            "next search waypoint",
        )),
        action(|bb: &mut Blackboard<H>| {
            if bb.search_path.len() > 1 {
                return Status::Failure;
            }
            let now = bb.now();
            if bb.waiting_notice.ready(now) {
                info!("Waiting for NPCs to arrive");
            }
            Status::Success
        }),
    ])
}

/// Talk to the start NPC, dealing with attackers first.
///
/// The start NPC is not required to still exist afterwards; some events
/// replace it with the escorted units as soon as the last option is picked.
pub fn interacting_to_start<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        Box::new(SpankMobTargetingUs),
        action(|bb: &mut Blackboard<H>| {
            if !bb.config.start_npc_ids.is_empty() {
                return Status::Failure;
            }
            bb.set_state(BehaviorState::IdentifySpecificUnitsToEscort);
            Status::Success
        }),
        Box::new(GossipToStart),
        action(|bb: &mut Blackboard<H>| {
            if bb.host.is_dialog_open() {
                bb.host.close_dialog();
            }
            bb.host.clear_target();
            bb.gossip.reset();
            bb.set_state(BehaviorState::IdentifySpecificUnitsToEscort);
            Status::Success
        }),
    ])
}

/// Find the group, walk up to it and lock in who is being escorted.
pub fn identify_units_to_escort<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        Box::new(SpankMobTargetingUs),
        action(|bb: &mut Blackboard<H>| {
            if bb.refresh_group() {
                return Status::Failure;
            }
            bb.lock_in_group();
            if !bb.refresh_group() {
                bb.set_state(BehaviorState::SearchingForEscortUnits);
            }
            Status::Success
        }),
        Box::new(MoveTo::new(
            MovementSlot::Travel,
            group_out_of_reach,
            group_close_enough,
            group_center_point,
            "nearest escorted unit",
        )),
        action(|bb: &mut Blackboard<H>| {
            bb.host.clear_target();
            let units = bb.lock_in_group();
            let me = bb.host.me().location;
            let roster = units
                .iter()
                .map(|unit| format!("{} (dist: {:.1})", unit.name, unit.distance_to(me)))
                .collect::<Vec<_>>()
                .join(", ");
            info!("Escorting {} units: {}", units.len(), roster);
            bb.restart_announced = false;
            bb.set_state(BehaviorState::Escorting);
            Status::Success
        }),
    ])
}

/// Follow the group in formation until the oracle settles the escort.
///
/// Formation movement starts when the group is walking and someone is not
/// facing the agent, and stops once everyone faces the agent from beyond
/// follow distance.
pub fn escorting<H: Host + 'static>() -> EscortTree<H> {
    selector(vec![
        sequence(vec![
            Box::new(EscortSettled),
            action(|bb: &mut Blackboard<H>| {
                bb.set_state(BehaviorState::CheckDone);
                Status::Success
            }),
        ]),
        guard(
            |bb: &Blackboard<H>| !bb.host.me().in_combat,
            Box::new(MoveTo::new(
                MovementSlot::Travel,
                formation_broken,
                formation_ahead,
                |bb| position_to_escort(&bb.host, &bb.members(), bb.config.max_follow_distance),
                "escort",
            )),
        ),
    ])
}

/// Decide between resuming, finishing and starting over.
pub fn check_done<H: Host + 'static>() -> EscortTree<H> {
    action(|bb: &mut Blackboard<H>| {
        let verdict = oracle::evaluate(&bb.config, &bb.host, &mut bb.group);
        let resolution = resolve_check_done(verdict, bb.config.complete_when);
        if resolution == CheckDoneResolution::Resume {
            bb.set_state(BehaviorState::Escorting);
            return Status::Success;
        }

        match resolution.next_state() {
            Some(next) => {
                if !bb.restart_announced {
                    if verdict.failed {
                        warn!("Looks like we've failed the escort.");
                    }
                    info!("Returning to start to re-do.");
                    bb.restart_announced = true;
                }
                bb.set_state(next);
            }
            None => {
                if verdict.failed {
                    warn!("Looks like we've failed the escort.");
                }
                let message = format!(
                    "Behavior complete (EscortCompleteWhen=\"{}\")",
                    bb.config.complete_when
                );
                info!("{message}");
                bb.finish(message);
            }
        }
        Status::Success
    })
}

fn formation_broken<H: Host>(bb: &Blackboard<H>) -> bool {
    let me = bb.host.me().location;
    let members = bb.members();
    members.iter().any(|unit| !unit.is_facing(me)) && members.iter().all(|unit| unit.moving)
}

fn formation_ahead<H: Host>(bb: &Blackboard<H>) -> bool {
    let me = bb.host.me().location;
    bb.members()
        .iter()
        .all(|unit| unit.is_facing(me) && unit.distance_to(me) > bb.config.max_follow_distance)
}
