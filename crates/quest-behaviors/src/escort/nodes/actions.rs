//! Action nodes for the escort tree.
//!
//! Actions issue commands through the host and update the blackboard. Return
//! values follow one convention: `Success` means the tick was handled,
//! `Running` means a movement or conversation is underway, and `Failure`
//! lets the enclosing selector try its next branch.

use std::marker::PhantomData;

use behavior_tree::{Behavior, Status};
use bot_core::{Host, PointOfInterest, Unit, UnitId, Vec3};
use tracing::{error, info, warn};

use crate::error::EscortError;
use crate::escort::blackboard::Blackboard;
use crate::gossip::GossipOutcome;
use crate::movement::{MoveRequest, move_or_click};
use crate::selection::{
    any_member_targeted, choose_best_target, find_priority_targets,
    nearest_hostile_targeting_agent, units_out_of_range, viable_target,
};

/// Distance at which the agent can talk to an NPC.
const INTERACT_RANGE: f32 = 4.0;

/// Which debounce flag a [`MoveTo`] drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementSlot {
    /// Staying close to the group while it fights.
    Combat,
    /// Everything else.
    Travel,
}

type Predicate<H> = fn(&Blackboard<H>) -> bool;
type Destination<H> = fn(&Blackboard<H>) -> Option<Vec3>;

/// Debounced "move toward X until told to stop".
///
/// See [`crate::movement::MovementState::drive`] for the status contract. A
/// destination that cannot be computed cancels any move in progress.
pub struct MoveTo<H> {
    slot: MovementSlot,
    start: Predicate<H>,
    stop: Predicate<H>,
    destination: Destination<H>,
    label: &'static str,
}

impl<H> MoveTo<H> {
    pub fn new(
        slot: MovementSlot,
        start: Predicate<H>,
        stop: Predicate<H>,
        destination: Destination<H>,
        label: &'static str,
    ) -> Self {
        Self {
            slot,
            start,
            stop,
            destination,
            label,
        }
    }
}

impl<H: Host> Behavior<Blackboard<H>> for MoveTo<H> {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let now = ctx.now();
        let destination = (self.destination)(ctx);
        let request = destination.map(|destination| MoveRequest {
            start: (self.start)(ctx),
            stop: (self.stop)(ctx),
            destination,
            label: self.label,
        });

        let movement = match self.slot {
            MovementSlot::Combat => &mut ctx.combat_movement,
            MovementSlot::Travel => &mut ctx.travel_movement,
        };
        match request {
            Some(request) => movement.drive(&mut ctx.host, now, request),
            None => {
                movement.cancel();
                Status::Failure
            }
        }
    }
}

/// Engages `target` unconditionally.
///
/// Closes to engagement range, makes it the bot's kill target (dismounting
/// if needed), then runs the combat routine unless the target is already
/// busy with the agent or its pet.
pub(crate) fn spank_mob<H: Host>(ctx: &mut Blackboard<H>, target: Option<UnitId>) -> Status {
    let Some(mob) = viable_target(&ctx.host, target) else {
        return Status::Failure;
    };
    let me = ctx.host.me();

    if mob.distance_to(me.location) > ctx.config.combat_max_engagement_range {
        move_or_click(&mut ctx.host, mob.location);
        return Status::Success;
    }
    if me.current_target != Some(mob.id) {
        ctx.host.set_point_of_interest(PointOfInterest::Kill(mob.id));
        ctx.host.target(mob.id);
        if me.mounted {
            ctx.host.dismount();
        }
        return Status::Success;
    }
    if !me.is_targeted_by(&mob) {
        ctx.host.engage(mob.id);
        return Status::Success;
    }
    Status::Failure
}

/// Deals with whatever is attacking the agent before anything else happens.
///
/// The remembered attacker is kept until it stops being viable; only then is
/// the nearest hostile on the agent or its pet picked up.
pub struct SpankMobTargetingUs;

impl<H: Host> Behavior<Blackboard<H>> for SpankMobTargetingUs {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        if viable_target(&ctx.host, ctx.mob_targeting_us).is_none() {
            ctx.mob_targeting_us = nearest_hostile_targeting_agent(&ctx.host).map(|unit| unit.id);
        }
        match ctx.mob_targeting_us {
            Some(mob) => spank_mob(ctx, Some(mob)),
            None => Status::Failure,
        }
    }
}

/// Talks to the nearest start NPC until its conversation is done.
///
/// Fails when there is no start NPC in range or the nearest one is
/// blacklisted, which is what happens right after a finished conversation.
pub struct GossipToStart;

impl GossipToStart {
    fn pick<H: Host>(ctx: &Blackboard<H>) -> Option<Unit> {
        let nearest = ctx.find_start_npcs().into_iter().next()?;
        (!ctx.gossip_blacklist.contains(nearest.id, ctx.now())).then_some(nearest)
    }
}

impl<H: Host> Behavior<Blackboard<H>> for GossipToStart {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let Some(npc) = Self::pick(ctx) else {
            return Status::Failure;
        };
        let me = ctx.host.me();
        if me.current_target != Some(npc.id) && ctx.host.in_line_of_sight(npc.id) {
            ctx.host.target(npc.id);
        }

        let now = ctx.now();
        let far = npc.distance_to(me.location) > INTERACT_RANGE;
        let approach = MoveRequest {
            start: far,
            stop: !far,
            destination: npc.location,
            label: &npc.name,
        };
        match ctx.travel_movement.drive(&mut ctx.host, now, approach) {
            Status::Failure => {}
            status => return status,
        }

        if me.mounted {
            ctx.host.dismount();
            return Status::Success;
        }

        match ctx.gossip.step(
            &mut ctx.host,
            &npc,
            &ctx.config.start_gossip_options,
            &mut ctx.gossip_blacklist,
        ) {
            GossipOutcome::InProgress => Status::Running,
            GossipOutcome::Complete => Status::Success,
        }
    }
}

/// Retargets onto the nearest priority mob near the group.
///
/// Always fails so the rest of the combat response still runs this tick.
pub struct SwitchToPriorityTarget;

impl<H: Host> Behavior<Blackboard<H>> for SwitchToPriorityTarget {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let members = ctx.members();
        let priority = find_priority_targets(
            &ctx.host,
            &ctx.config.priority_target_ids,
            &members,
            ctx.config.max_fight_distance,
        );
        let Some(nearest) = priority.into_iter().next() else {
            return Status::Failure;
        };
        let keep = viable_target(&ctx.host, ctx.selected_target)
            .is_some_and(|current| ctx.config.priority_target_ids.contains(&current.entry));
        if !keep {
            info!("Switching to priority target {}", nearest.name);
            ctx.selected_target = Some(nearest.id);
            ctx.host.set_point_of_interest(PointOfInterest::Kill(nearest.id));
            ctx.host.target(nearest.id);
        }
        Status::Failure
    }
}

/// Keeps the bot pointed at the selected target and starts the fight if the
/// bot is idling next to the group.
pub struct FocusSelectedTarget;

impl<H: Host> Behavior<Blackboard<H>> for FocusSelectedTarget {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let Some(target) = viable_target(&ctx.host, ctx.selected_target) else {
            return Status::Failure;
        };
        let poi = PointOfInterest::Kill(target.id);
        if ctx.host.point_of_interest() != poi {
            ctx.host.set_point_of_interest(poi);
            ctx.host.target(target.id);
        }
        if !ctx.host.me().in_combat {
            return spank_mob(ctx, Some(target.id));
        }
        Status::Failure
    }
}

/// Picks the next target once the current one is gone and the group is
/// still under attack.
pub struct ChooseNextTarget;

impl<H: Host> Behavior<Blackboard<H>> for ChooseNextTarget {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        if viable_target(&ctx.host, ctx.selected_target).is_some() {
            return Status::Failure;
        }
        let members = ctx.members();
        if !any_member_targeted(&ctx.host, &members) {
            return Status::Failure;
        }

        if ctx.config.debug_report_units_out_of_range {
            let strays = units_out_of_range(&ctx.host, &members, ctx.config.max_fight_distance);
            if !strays.is_empty() && ctx.out_of_range_notice.ready(ctx.host.now()) {
                let listed = strays
                    .iter()
                    .map(|(unit, distance)| format!("{}({distance:.1})", unit.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    "Some units exceed the EscortMaxFightDistance range ({} yard): {}",
                    ctx.config.max_fight_distance, listed
                );
            }
        }

        ctx.selected_target = choose_best_target(&ctx.host, &members);
        Status::Failure
    }
}

/// Default branch of the state dispatch; halts the bot.
pub struct UnhandledState<H>(PhantomData<fn() -> H>);

impl<H> UnhandledState<H> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<H> Default for UnhandledState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Behavior<Blackboard<H>> for UnhandledState<H> {
    fn tick(&self, ctx: &mut Blackboard<H>) -> Status {
        let failure = EscortError::UnhandledState(ctx.state);
        error!(state = %ctx.state, "{failure}");
        ctx.host.request_stop(&failure.to_string());
        ctx.fail(failure);
        Status::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EscortConfig;
    use crate::escort::state::BehaviorState;
    use crate::gossip::GossipSession;
    use crate::group::EscortedGroup;
    use bot_core::sim::{Command, SIM_AGENT_ID, SimWorld};
    use bot_core::{Combat, NpcId};

    const ESCORT: NpcId = NpcId(200);
    const OGRE: NpcId = NpcId(300);

    fn blackboard(world: SimWorld, config: EscortConfig) -> Blackboard<SimWorld> {
        Blackboard::new(world, config, GossipSession::seeded(9))
    }

    fn escorted_world() -> SimWorld {
        let mut world = SimWorld::new(Vec3::ZERO);
        world.spawn(Unit::npc(UnitId(20), ESCORT, "Caravan Guard", Vec3::new(3.0, 0.0, 0.0)));
        world
    }

    #[test]
    fn spank_mob_closes_in_then_targets_then_engages() {
        let mut world = escorted_world();
        world.spawn(Unit::hostile(UnitId(40), NpcId(9), "Raider", Vec3::new(60.0, 0.0, 0.0)));
        let mut bb = blackboard(world, EscortConfig::new(vec![ESCORT]));

        assert_eq!(spank_mob(&mut bb, Some(UnitId(40))), Status::Success);
        assert!(matches!(bb.host.commands().last(), Some(Command::MoveTo(_))));

        bb.host.agent_mut().location = Vec3::new(50.0, 0.0, 0.0);
        bb.host.agent_mut().mounted = true;
        assert_eq!(spank_mob(&mut bb, Some(UnitId(40))), Status::Success);
        assert_eq!(bb.host.point_of_interest(), PointOfInterest::Kill(UnitId(40)));
        assert!(bb.host.commands().contains(&Command::Dismount));

        assert_eq!(spank_mob(&mut bb, Some(UnitId(40))), Status::Success);
        assert!(bb.host.commands().contains(&Command::Engage(UnitId(40))));
    }

    #[test]
    fn spank_mob_ignores_dead_and_friendly_units() {
        let mut world = escorted_world();
        world.spawn(Unit::hostile(UnitId(41), NpcId(9), "Raider", Vec3::ZERO).dead());
        let mut bb = blackboard(world, EscortConfig::new(vec![ESCORT]));
        assert_eq!(spank_mob(&mut bb, Some(UnitId(41))), Status::Failure);
        assert_eq!(spank_mob(&mut bb, Some(UnitId(20))), Status::Failure);
        assert_eq!(spank_mob(&mut bb, None), Status::Failure);
    }

    #[test]
    fn mob_targeting_us_is_remembered_until_gone() {
        let mut world = escorted_world();
        world.spawn(
            Unit::hostile(UnitId(42), NpcId(9), "Raider", Vec3::new(2.0, 0.0, 0.0)).with_target(SIM_AGENT_ID),
        );
        let mut bb = blackboard(world, EscortConfig::new(vec![ESCORT]));

        assert_eq!(SpankMobTargetingUs.tick(&mut bb), Status::Success);
        assert_eq!(bb.mob_targeting_us, Some(UnitId(42)));

        bb.host.kill(UnitId(42));
        assert_eq!(SpankMobTargetingUs.tick(&mut bb), Status::Failure);
        assert_eq!(bb.mob_targeting_us, None);
    }

    #[test]
    fn priority_target_replaces_ordinary_target() {
        let mut world = escorted_world();
        world.spawn(Unit::hostile(UnitId(50), NpcId(9), "Raider", Vec3::new(6.0, 0.0, 0.0)).with_target(UnitId(20)));
        world.spawn(Unit::hostile(UnitId(51), OGRE, "Ogre Mage", Vec3::new(9.0, 0.0, 0.0)));
        let mut config = EscortConfig::new(vec![ESCORT]);
        config.priority_target_ids = vec![OGRE];
        let mut bb = blackboard(world, config);
        bb.group = EscortedGroup::from_units(&bb.find_escort_npcs());
        bb.selected_target = Some(UnitId(50));

        assert_eq!(SwitchToPriorityTarget.tick(&mut bb), Status::Failure);
        assert_eq!(bb.selected_target, Some(UnitId(51)));
        assert_eq!(bb.host.point_of_interest(), PointOfInterest::Kill(UnitId(51)));

        // Already on a priority target: nothing changes.
        let before = bb.host.commands().len();
        assert_eq!(SwitchToPriorityTarget.tick(&mut bb), Status::Failure);
        assert_eq!(bb.host.commands().len(), before);
    }

    #[test]
    fn next_target_is_chosen_only_when_group_is_attacked() {
        let mut world = escorted_world();
        world.spawn(Unit::hostile(UnitId(60), NpcId(9), "Raider", Vec3::new(5.0, 0.0, 0.0)));
        let mut bb = blackboard(world, EscortConfig::new(vec![ESCORT]));
        bb.group = EscortedGroup::from_units(&bb.find_escort_npcs());

        assert_eq!(ChooseNextTarget.tick(&mut bb), Status::Failure);
        assert_eq!(bb.selected_target, None);

        if let Some(raider) = bb.host.unit_mut(UnitId(60)) {
            raider.current_target = Some(UnitId(20));
            raider.in_combat = true;
        }
        assert_eq!(ChooseNextTarget.tick(&mut bb), Status::Failure);
        assert_eq!(bb.selected_target, Some(UnitId(60)));
    }

    #[test]
    fn focus_replaces_a_stale_kill_point_of_interest() {
        let mut world = escorted_world();
        world.spawn(Unit::hostile(UnitId(41), NpcId(9), "Raider", Vec3::new(5.0, 0.0, 0.0)).with_target(UnitId(20)));
        world.set_point_of_interest(PointOfInterest::Kill(UnitId(99)));
        let mut bb = blackboard(world, EscortConfig::new(vec![ESCORT]));
        bb.group = EscortedGroup::from_units(&bb.find_escort_npcs());

        assert_eq!(ChooseNextTarget.tick(&mut bb), Status::Failure);
        assert_eq!(bb.selected_target, Some(UnitId(41)));
        FocusSelectedTarget.tick(&mut bb);

        assert_eq!(bb.host.point_of_interest(), PointOfInterest::Kill(UnitId(41)));
        assert_eq!(bb.host.agent().current_target, Some(UnitId(41)));
    }

    #[test]
    fn unhandled_state_stops_the_bot() {
        let mut bb = blackboard(escorted_world(), EscortConfig::new(vec![ESCORT]));
        bb.state = BehaviorState::InteractingToStart;

        assert_eq!(UnhandledState::new().tick(&mut bb), Status::Failure);
        assert_eq!(
            bb.host.stop_reason(),
            Some("maintenance problem: BehaviorState(InteractingToStart) is unhandled")
        );
        assert!(bb.is_done());
    }
}
