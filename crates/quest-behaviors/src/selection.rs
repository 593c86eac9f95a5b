//! Spatial queries over the visible units.
//!
//! Everything here is a read-only function of a [`WorldQuery`] snapshot and
//! returns owned [`Unit`] copies; callers hold on to ids, never to units.

use bot_core::{Agent, Navigator, NpcId, Unit, UnitId, Vec3, WorldQuery, mean_heading};

/// Alive, unfriendly, attackable and not given up on by the combat system.
pub fn is_viable_for_fighting<W: WorldQuery + ?Sized>(world: &W, unit: &Unit) -> bool {
    unit.alive && !unit.friendly && unit.attackable && !world.is_combat_blacklisted(unit.id)
}

/// Resolves `id` and checks it is still worth fighting.
pub fn viable_target<W: WorldQuery + ?Sized>(world: &W, id: Option<UnitId>) -> Option<Unit> {
    id.and_then(|id| world.unit(id))
        .filter(|unit| is_viable_for_fighting(world, unit))
}

/// Search radius and competition rules for escort (or start) NPC lookups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateSearch<'a> {
    pub ids: &'a [NpcId],
    pub radius: f32,
    pub count_max: usize,
    /// Candidates with another live player this close are left alone.
    pub non_compete_distance: f32,
}

/// Live NPCs from `search.ids` near the agent that nobody else is escorting,
/// nearest first.
pub fn find_escort_candidates<W: WorldQuery + ?Sized>(
    world: &W,
    search: CandidateSearch<'_>,
) -> Vec<Unit> {
    let me = world.me();
    let party = world.party_members();
    let radius_sqr = search.radius * search.radius;
    let players = world.find_units(&|unit| unit.player && unit.alive && unit.id != me.id);

    let mut candidates = world.find_units(&|unit| {
        !unit.player
            && unit.alive
            && search.ids.contains(&unit.entry)
            && me.location.distance_sqr(unit.location) < radius_sqr
    });
    candidates.retain(|unit| {
        let contested = players
            .iter()
            .any(|player| player.location.distance(unit.location) < search.non_compete_distance);
        let owned_elsewhere = unit
            .owner
            .is_some_and(|owner| owner != me.id && !party.contains(&owner));
        !contested && !owned_elsewhere
    });
    sort_by_distance(&mut candidates, me.location);
    candidates.truncate(search.count_max);
    candidates
}

/// Viable priority targets within `fight_distance` of any escorted member,
/// nearest to the agent first.
pub fn find_priority_targets<W: WorldQuery + ?Sized>(
    world: &W,
    ids: &[NpcId],
    members: &[Unit],
    fight_distance: f32,
) -> Vec<Unit> {
    if ids.is_empty() {
        return Vec::new();
    }
    let me = world.me();
    let mut targets = world.find_units(&|unit| {
        ids.contains(&unit.entry)
            && is_viable_for_fighting(world, unit)
            && members
                .iter()
                .any(|member| member.location.distance(unit.location) < fight_distance)
    });
    sort_by_distance(&mut targets, me.location);
    targets
}

/// True when `unit` is attacking an escorted member or a member's pet.
pub fn is_targeting_group_member(unit: &Unit, members: &[Unit]) -> bool {
    let Some(target) = unit.current_target else {
        return false;
    };
    members
        .iter()
        .any(|member| member.id == target || member.pet == Some(target))
}

/// Every live non-player enemy attacking the agent, its pet or the group.
pub fn find_all_targets<W: WorldQuery + ?Sized>(world: &W, members: &[Unit]) -> Vec<Unit> {
    let me = world.me();
    world.find_units(&|unit| {
        !unit.friendly
            && !unit.player
            && unit.alive
            && (me.is_targeted_by(unit) || is_targeting_group_member(unit, members))
            && !world.is_combat_blacklisted(unit.id)
    })
}

pub fn any_member_targeted<W: WorldQuery + ?Sized>(world: &W, members: &[Unit]) -> bool {
    world
        .units()
        .iter()
        .any(|unit| unit.alive && is_targeting_group_member(unit, members))
}

/// Nearest viable enemy attacking the agent or its pet.
pub fn nearest_hostile_targeting_agent<W: WorldQuery + ?Sized>(world: &W) -> Option<Unit> {
    let me = world.me();
    let mut hostiles =
        world.find_units(&|unit| is_viable_for_fighting(world, unit) && me.is_targeted_by(unit));
    sort_by_distance(&mut hostiles, me.location);
    hostiles.into_iter().next()
}

/// Enemies in the fight that are farther than `fight_distance` from every
/// escorted member, with that nearest distance.
pub fn units_out_of_range<W: WorldQuery + ?Sized>(
    world: &W,
    members: &[Unit],
    fight_distance: f32,
) -> Vec<(Unit, f32)> {
    find_all_targets(world, members)
        .into_iter()
        .filter_map(|unit| {
            let nearest = members
                .iter()
                .map(|member| member.location.distance(unit.location))
                .min_by(f32::total_cmp)?;
            (nearest > fight_distance).then_some((unit, nearest))
        })
        .collect()
}

/// Inputs of the best-target score for one attacker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThreatSample {
    pub attacker_health: f32,
    pub attacker_elite: bool,
    /// Attacker is on the agent or its pet rather than an escorted unit.
    pub attacker_targets_agent: bool,
    pub victim_health: f32,
    /// Attackers (this one included) on the same victim.
    pub victim_attackers: usize,
    pub distance_to_victim: f32,
}

impl ThreatSample {
    /// Lower is better. The elite term dominates everything else.
    pub fn score(&self) -> f32 {
        self.victim_health / (self.victim_attackers as f32 + 1.0)
            + self.attacker_health
            + self.distance_to_victim
            + if self.attacker_elite { 1000.0 } else { 1.0 }
            + if self.attacker_targets_agent { 100.0 } else { 1.0 }
    }
}

/// Builds the score inputs for every attacker whose victim can be located.
pub fn threat_samples(hostiles: &[Unit], members: &[Unit], me: &Agent) -> Vec<(UnitId, ThreatSample)> {
    hostiles
        .iter()
        .filter_map(|attacker| {
            let victim = attacker.current_target?;
            let (victim_health, victim_location) = if me.owns(victim) {
                (me.health_percent, me.location)
            } else {
                members
                    .iter()
                    .find(|member| member.id == victim || member.pet == Some(victim))
                    .map(|member| (member.health_percent, member.location))?
            };
            let victim_attackers = hostiles
                .iter()
                .filter(|other| other.current_target == Some(victim))
                .count();
            Some((
                attacker.id,
                ThreatSample {
                    attacker_health: attacker.health_percent,
                    attacker_elite: attacker.elite,
                    attacker_targets_agent: me.is_targeted_by(attacker),
                    victim_health,
                    victim_attackers,
                    distance_to_victim: attacker.location.distance(victim_location),
                },
            ))
        })
        .collect()
}

/// Lowest-scoring attacker; ties keep the earlier sample.
pub fn pick_best(samples: &[(UnitId, ThreatSample)]) -> Option<UnitId> {
    samples
        .iter()
        .min_by(|(_, a), (_, b)| a.score().total_cmp(&b.score()))
        .map(|(id, _)| *id)
}

/// The attacker the agent should deal with first.
pub fn choose_best_target<W: WorldQuery + ?Sized>(world: &W, members: &[Unit]) -> Option<UnitId> {
    if members.is_empty() {
        return None;
    }
    let me = world.me();
    let hostiles = find_all_targets(world, members);
    pick_best(&threat_samples(&hostiles, members, &me))
}

/// Centroid of the group, or `fallback` for an empty group.
pub fn group_center(members: &[Unit], fallback: Vec3) -> Vec3 {
    Vec3::centroid(members.iter().map(|member| member.location)).unwrap_or(fallback)
}

/// Formation spot ahead of the group.
///
/// Casts from the member nearest the group center along the group's mean
/// heading by `follow_distance`. An obstruction clips the ray; a spot with no
/// ground under it falls back to that member's position.
pub fn position_to_escort<N: Navigator + ?Sized>(
    nav: &N,
    members: &[Unit],
    follow_distance: f32,
) -> Option<Vec3> {
    let center = Vec3::centroid(members.iter().map(|member| member.location))?;
    let anchor = members
        .iter()
        .min_by(|a, b| {
            a.location
                .distance_sqr(center)
                .total_cmp(&b.location.distance_sqr(center))
        })?
        .location;
    let heading = mean_heading(members.iter().map(|member| member.heading))?;

    let mut spot = anchor.ray_cast(heading, follow_distance);
    if let Some(hit) = nav.trace_obstruction(anchor, spot) {
        spot = hit;
    }
    Some(nav.ground_height(spot).unwrap_or(anchor))
}

fn sort_by_distance(units: &mut [Unit], from: Vec3) {
    units.sort_by(|a, b| {
        a.location
            .distance_sqr(from)
            .total_cmp(&b.location.distance_sqr(from))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: UnitId = UnitId(1);

    fn agent() -> Agent {
        Agent::new(ME, Vec3::ZERO)
    }

    fn escort(id: u64, x: f32) -> Unit {
        Unit::npc(UnitId(id), NpcId(200), "Escort", Vec3::new(x, 0.0, 0.0))
    }

    fn sample(elite: bool) -> ThreatSample {
        ThreatSample {
            attacker_health: 80.0,
            attacker_elite: elite,
            attacker_targets_agent: false,
            victim_health: 50.0,
            victim_attackers: 1,
            distance_to_victim: 4.0,
        }
    }

    #[test]
    fn score_matches_weighting() {
        // 50 / 2 + 80 + 4 + 1 + 1
        assert_eq!(sample(false).score(), 111.0);
        let on_agent = ThreatSample {
            attacker_targets_agent: true,
            ..sample(false)
        };
        assert_eq!(on_agent.score(), 210.0);
    }

    #[test]
    fn non_elite_wins_over_identical_elite() {
        let samples = [(UnitId(10), sample(true)), (UnitId(11), sample(false))];
        assert_eq!(pick_best(&samples), Some(UnitId(11)));
        // Deterministic for identical inputs.
        assert_eq!(pick_best(&samples), pick_best(&samples));
    }

    #[test]
    fn shared_victims_count_every_attacker() {
        let members = vec![escort(2, 0.0).with_health(40.0)];
        let wolves = vec![
            Unit::hostile(UnitId(10), NpcId(9), "Wolf", Vec3::new(2.0, 0.0, 0.0)).with_target(UnitId(2)),
            Unit::hostile(UnitId(11), NpcId(9), "Wolf", Vec3::new(3.0, 0.0, 0.0)).with_target(UnitId(2)),
        ];
        let samples = threat_samples(&wolves, &members, &agent());
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|(_, s)| s.victim_attackers == 2));
        assert_eq!(pick_best(&samples), Some(UnitId(10)));
    }

    #[test]
    fn member_pets_count_as_group() {
        let mut hunter = escort(2, 0.0);
        hunter.pet = Some(UnitId(3));
        let biter = Unit::hostile(UnitId(10), NpcId(9), "Wolf", Vec3::ZERO).with_target(UnitId(3));
        assert!(is_targeting_group_member(&biter, &[hunter]));
    }

    #[test]
    fn group_center_falls_back_when_empty() {
        let fallback = Vec3::new(5.0, 5.0, 0.0);
        assert_eq!(group_center(&[], fallback), fallback);
        let members = [escort(2, 0.0), escort(3, 10.0)];
        assert_eq!(group_center(&members, fallback), Vec3::new(5.0, 0.0, 0.0));
    }
}
