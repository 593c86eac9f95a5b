//! In-memory host driven by a manual clock.
//!
//! `SimWorld` implements every service trait against plain collections so
//! behaviors can be exercised without a game client. Time only moves when
//! [`SimWorld::advance`] is called, which also walks the agent toward its
//! current destination and walks scripted units along their routes. Every
//! command a behavior issues is recorded in order for later inspection.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::geometry::Vec3;
use crate::ids::{QuestId, UnitId};
use crate::services::{
    Activities, BotControl, Clock, Combat, GossipFrame, MoveResult, Navigator, PointOfInterest,
    QuestLog, QuestRecord, WorldQuery,
};
use crate::unit::{Agent, Unit};

/// Identifier the simulation assigns to the agent.
pub const SIM_AGENT_ID: UnitId = UnitId(1);

const AUTO_ATTACK_RANGE: f32 = 25.0;

/// A command issued to the simulated host.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    MoveTo(Vec3),
    ClickToMove(Vec3),
    Interact(UnitId),
    SelectOption(usize),
    CloseDialog,
    Target(UnitId),
    ClearTarget,
    Engage(UnitId),
    Mount,
    Dismount,
    Stop(String),
}

#[derive(Debug)]
struct GossipScript {
    /// Selections after which the conversation ends.
    options: usize,
    /// Units that appear once the conversation ends.
    spawns: Vec<Unit>,
}

#[derive(Debug)]
struct OpenDialog {
    unit: UnitId,
    selections: usize,
}

#[derive(Debug)]
pub struct SimWorld {
    origin: Instant,
    elapsed: Duration,
    agent: Agent,
    units: Vec<Unit>,
    routes: HashMap<UnitId, VecDeque<Vec3>>,
    party: Vec<UnitId>,
    quests: BTreeMap<QuestId, QuestRecord>,
    gossip: HashMap<UnitId, GossipScript>,
    dialog: Option<OpenDialog>,
    destination: Option<Vec3>,
    poi: PointOfInterest,
    activities: Activities,
    combat_blacklist: Vec<UnitId>,
    commands: Vec<Command>,
    stop_reason: Option<String>,
    latency: Duration,
    run_speed: f32,
    unit_speed: f32,
    arrival_radius: f32,
    strike_damage: f32,
    attack_dps: f32,
    pathing_broken: bool,
    line_of_sight: bool,
    mountable: bool,
}

impl SimWorld {
    pub fn new(agent_location: Vec3) -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            agent: Agent::new(SIM_AGENT_ID, agent_location),
            units: Vec::new(),
            routes: HashMap::new(),
            party: Vec::new(),
            quests: BTreeMap::new(),
            gossip: HashMap::new(),
            dialog: None,
            destination: None,
            poi: PointOfInterest::None,
            activities: Activities::all(),
            combat_blacklist: Vec::new(),
            commands: Vec::new(),
            stop_reason: None,
            latency: Duration::from_millis(100),
            run_speed: 7.0,
            unit_speed: 2.5,
            arrival_radius: 3.0,
            strike_damage: 25.0,
            attack_dps: 10.0,
            pathing_broken: false,
            line_of_sight: true,
            mountable: false,
        }
    }

    // ========================================================================
    // Scripting
    // ========================================================================

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    /// Adds `unit`, replacing any unit with the same id. A route set for the
    /// id beforehand is kept, so scripted spawns can walk off immediately.
    pub fn spawn(&mut self, unit: Unit) {
        self.units.retain(|existing| existing.id != unit.id);
        self.units.push(unit);
    }

    pub fn despawn(&mut self, id: UnitId) {
        self.units.retain(|unit| unit.id != id);
        self.routes.remove(&id);
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn kill(&mut self, id: UnitId) {
        if let Some(unit) = self.unit_mut(id) {
            *unit = unit.clone().dead();
        }
        self.routes.remove(&id);
    }

    /// Walks `id` through `waypoints` at the simulated unit speed.
    pub fn set_route(&mut self, id: UnitId, waypoints: impl IntoIterator<Item = Vec3>) {
        self.routes.insert(id, waypoints.into_iter().collect());
    }

    pub fn add_party_member(&mut self, id: UnitId) {
        if !self.party.contains(&id) {
            self.party.push(id);
        }
    }

    pub fn insert_quest(&mut self, record: QuestRecord) {
        self.quests.insert(record.id, record);
    }

    pub fn remove_quest(&mut self, id: QuestId) {
        self.quests.remove(&id);
    }

    pub fn quest_mut(&mut self, id: QuestId) -> Option<&mut QuestRecord> {
        self.quests.get_mut(&id)
    }

    /// Gives `unit` a conversation that ends after `options` selections and
    /// then spawns `spawns`. With zero options the spawns appear on interact.
    pub fn script_gossip(&mut self, unit: UnitId, options: usize, spawns: Vec<Unit>) {
        self.gossip.insert(unit, GossipScript { options, spawns });
    }

    pub fn blacklist_for_combat(&mut self, id: UnitId) {
        self.combat_blacklist.push(id);
    }

    pub fn set_pathing_broken(&mut self, broken: bool) {
        self.pathing_broken = broken;
    }

    pub fn set_line_of_sight(&mut self, clear: bool) {
        self.line_of_sight = clear;
    }

    pub fn set_mountable(&mut self, mountable: bool) {
        self.mountable = mountable;
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = latency;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Zero-based options selected so far, in order.
    pub fn selected_options(&self) -> Vec<usize> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::SelectOption(index) => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Moves the clock forward by `dt` and steps every moving body.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        let seconds = dt.as_secs_f32();

        if let Some(destination) = self.destination {
            let speed = if self.agent.mounted {
                self.run_speed * 1.6
            } else {
                self.run_speed
            };
            self.agent.location = self.agent.location.step_toward(destination, speed * seconds);
            if self.agent.location.distance(destination) <= f32::EPSILON {
                self.destination = None;
            }
        }

        let step = self.unit_speed * seconds;
        let mut finished = Vec::new();
        for unit in &mut self.units {
            let Some(route) = self.routes.get_mut(&unit.id) else {
                continue;
            };
            if !unit.alive {
                finished.push(unit.id);
                continue;
            }
            let mut budget = step;
            while let Some(&next) = route.front() {
                let remaining = unit.location.distance(next);
                if remaining > f32::EPSILON {
                    unit.heading = unit.location.heading_to(next);
                }
                if remaining > budget {
                    unit.location = unit.location.step_toward(next, budget);
                    break;
                }
                budget -= remaining;
                unit.location = next;
                route.pop_front();
            }
            unit.moving = !route.is_empty();
            if route.is_empty() {
                finished.push(unit.id);
            }
        }
        for id in finished {
            self.routes.remove(&id);
        }

        self.auto_attack(seconds);

        let threatened = self
            .units
            .iter()
            .any(|unit| unit.alive && !unit.friendly && self.agent.is_targeted_by(unit));
        self.agent.in_combat = threatened;
        trace!(elapsed = ?self.elapsed, location = %self.agent.location, "sim advanced");
    }

    /// The bot's own combat routine: hits the current target while in range.
    fn auto_attack(&mut self, seconds: f32) {
        if self.agent.is_dead_or_ghost() {
            return;
        }
        let Some(target) = self.agent.current_target else {
            return;
        };
        let (agent_id, agent_location) = (self.agent.id, self.agent.location);
        let damage = self.attack_dps * seconds;
        let Some(unit) = self.unit_mut(target) else {
            return;
        };
        if !unit.alive || unit.friendly || unit.location.distance(agent_location) > AUTO_ATTACK_RANGE {
            return;
        }
        unit.in_combat = true;
        unit.current_target.get_or_insert(agent_id);
        unit.health_percent -= damage;
        if unit.health_percent <= 0.0 {
            debug!(unit = %target, "unit slain");
            self.kill(target);
        }
    }

    fn finish_conversation(&mut self, unit: UnitId) {
        self.dialog = None;
        if let Some(script) = self.gossip.remove(&unit) {
            debug!(npc = %unit, spawned = script.spawns.len(), "scripted conversation finished");
            for spawn in script.spawns {
                self.spawn(spawn);
            }
        }
    }
}

impl WorldQuery for SimWorld {
    fn me(&self) -> Agent {
        self.agent.clone()
    }

    fn units(&self) -> Vec<Unit> {
        self.units.clone()
    }

    fn unit(&self, id: UnitId) -> Option<Unit> {
        self.units.iter().find(|unit| unit.id == id).cloned()
    }

    fn party_members(&self) -> Vec<UnitId> {
        self.party.clone()
    }

    fn in_line_of_sight(&self, _id: UnitId) -> bool {
        self.line_of_sight
    }

    fn is_combat_blacklisted(&self, id: UnitId) -> bool {
        self.combat_blacklist.contains(&id)
    }
}

impl Navigator for SimWorld {
    fn move_to(&mut self, destination: Vec3) -> MoveResult {
        self.commands.push(Command::MoveTo(destination));
        if self.pathing_broken {
            return MoveResult::PathGenerationFailed;
        }
        if self.at_location(destination) {
            self.destination = None;
            return MoveResult::ReachedDestination;
        }
        self.destination = Some(destination);
        MoveResult::Moved
    }

    fn click_to_move(&mut self, destination: Vec3) {
        self.commands.push(Command::ClickToMove(destination));
        self.destination = Some(destination);
    }

    fn at_location(&self, destination: Vec3) -> bool {
        self.agent.location.distance(destination) <= self.arrival_radius
    }

    fn can_mount(&self) -> bool {
        self.mountable && !self.agent.mounted && !self.agent.in_combat
    }

    fn mount(&mut self) {
        self.commands.push(Command::Mount);
        self.agent.mounted = true;
    }

    fn dismount(&mut self) {
        self.commands.push(Command::Dismount);
        self.agent.mounted = false;
    }
}

impl QuestLog for SimWorld {
    fn quest(&self, id: QuestId) -> Option<QuestRecord> {
        self.quests.get(&id).cloned()
    }
}

impl GossipFrame for SimWorld {
    fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    fn interact(&mut self, unit: UnitId) {
        self.commands.push(Command::Interact(unit));
        match self.gossip.get(&unit).map(|script| script.options) {
            Some(0) => self.finish_conversation(unit),
            Some(_) => {
                self.dialog = Some(OpenDialog {
                    unit,
                    selections: 0,
                })
            }
            None => {}
        }
    }

    fn select_option(&mut self, index: usize) {
        self.commands.push(Command::SelectOption(index));
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        dialog.selections += 1;
        let (unit, selections) = (dialog.unit, dialog.selections);
        let needed = self.gossip.get(&unit).map_or(0, |script| script.options);
        if selections >= needed {
            self.finish_conversation(unit);
        }
    }

    fn close_dialog(&mut self) {
        self.commands.push(Command::CloseDialog);
        self.dialog = None;
    }
}

impl Combat for SimWorld {
    fn target(&mut self, unit: UnitId) {
        self.commands.push(Command::Target(unit));
        self.agent.current_target = Some(unit);
    }

    fn clear_target(&mut self) {
        self.commands.push(Command::ClearTarget);
        self.agent.current_target = None;
    }

    fn point_of_interest(&self) -> PointOfInterest {
        self.poi
    }

    fn set_point_of_interest(&mut self, poi: PointOfInterest) {
        self.poi = poi;
    }

    fn engage(&mut self, id: UnitId) {
        self.commands.push(Command::Engage(id));
        let agent_id = self.agent.id;
        let damage = self.strike_damage;
        let Some(unit) = self.unit_mut(id) else {
            return;
        };
        if !unit.alive {
            return;
        }
        unit.in_combat = true;
        unit.current_target = Some(agent_id);
        unit.health_percent -= damage;
        if unit.health_percent <= 0.0 {
            debug!(unit = %id, name = %unit.name, "unit slain");
            self.kill(id);
        }
        self.agent.in_combat = true;
    }
}

impl BotControl for SimWorld {
    fn activities(&self) -> Activities {
        self.activities
    }

    fn set_activities(&mut self, activities: Activities) {
        self.activities = activities;
    }

    fn latency(&self) -> Duration {
        self.latency
    }

    fn request_stop(&mut self, reason: &str) {
        self.commands.push(Command::Stop(reason.to_owned()));
        self.stop_reason = Some(reason.to_owned());
    }
}

impl Clock for SimWorld {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}
