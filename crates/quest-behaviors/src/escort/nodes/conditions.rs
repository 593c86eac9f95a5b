//! Condition nodes for the escort tree.
//!
//! Conditions report Success or Failure and issue no commands. Some prune the
//! escorted group on the way, which is bookkeeping, not action.

use behavior_tree::{Behavior, Status};
use bot_core::Host;

use crate::escort::blackboard::Blackboard;
use crate::escort::state::BehaviorState;

/// Succeeds while the escort is underway with someone left to protect.
///
/// Gates the combat response; outside `Escorting` the host's own combat
/// handling is left alone.
pub struct EscortUnderway;

impl<H: Host> Behavior<Blackboard<H>> for EscortUnderway {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        if ctx.state == BehaviorState::Escorting && ctx.refresh_group() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Succeeds when the agent is dead or a ghost and the state machine has not
/// been sent to `CheckDone` yet.
pub struct AgentDown;

impl<H: Host> Behavior<Blackboard<H>> for AgentDown {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        if ctx.host.me().is_dead_or_ghost() && ctx.state != BehaviorState::CheckDone {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Succeeds when the oracle reports the escort complete or failed.
pub struct EscortSettled;

impl<H: Host> Behavior<Blackboard<H>> for EscortSettled {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let verdict = crate::oracle::evaluate(&ctx.config, &ctx.host, &mut ctx.group);
        if verdict.complete || verdict.failed {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EscortConfig;
    use crate::gossip::GossipSession;
    use crate::group::EscortedGroup;
    use bot_core::sim::SimWorld;
    use bot_core::{NpcId, Unit, UnitId, Vec3};

    fn blackboard() -> Blackboard<SimWorld> {
        let mut world = SimWorld::new(Vec3::ZERO);
        world.spawn(Unit::npc(UnitId(20), NpcId(200), "Escort", Vec3::new(5.0, 0.0, 0.0)));
        let config = EscortConfig::new(vec![NpcId(200)]);
        Blackboard::new(world, config, GossipSession::seeded(1))
    }

    #[test]
    fn escort_underway_needs_state_and_group() {
        let mut bb = blackboard();
        bb.group = EscortedGroup::from_units(&bb.find_escort_npcs());
        assert_eq!(EscortUnderway.tick(&mut bb), Status::Failure);

        bb.state = BehaviorState::Escorting;
        assert_eq!(EscortUnderway.tick(&mut bb), Status::Success);

        bb.host.kill(UnitId(20));
        assert_eq!(EscortUnderway.tick(&mut bb), Status::Failure);
        assert!(bb.group.is_empty());
    }

    #[test]
    fn agent_down_fires_once_per_check_done() {
        let mut bb = blackboard();
        bb.state = BehaviorState::Escorting;
        assert_eq!(AgentDown.tick(&mut bb), Status::Failure);

        bb.host.agent_mut().dead = true;
        assert_eq!(AgentDown.tick(&mut bb), Status::Success);
        bb.state = BehaviorState::CheckDone;
        assert_eq!(AgentDown.tick(&mut bb), Status::Failure);
    }
}
