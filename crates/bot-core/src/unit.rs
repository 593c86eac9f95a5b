//! Snapshots of units and of the controlled character.
//!
//! Snapshots are taken fresh every query; nothing here tracks identity across
//! ticks. Code that must follow a unit over time keeps its [`UnitId`] and
//! re-resolves it.

use std::f32::consts::PI;

use crate::geometry::{Vec3, heading_delta};
use crate::ids::{NpcId, UnitId};

/// Half-width of the cone in front of a unit that counts as "facing".
pub const FACING_HALF_ARC: f32 = PI * 75.0 / 180.0;

/// Observable state of a unit (NPC, player or pet) near the bot.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub entry: NpcId,
    pub name: String,
    pub location: Vec3,
    pub heading: f32,
    pub health_percent: f32,
    pub alive: bool,
    pub friendly: bool,
    pub attackable: bool,
    pub player: bool,
    pub elite: bool,
    pub in_combat: bool,
    pub moving: bool,
    pub current_target: Option<UnitId>,
    /// Character controlling this unit, for pets and summoned escorts.
    pub owner: Option<UnitId>,
    pub pet: Option<UnitId>,
}

impl Unit {
    /// Friendly, alive, full-health NPC with no target.
    pub fn npc(id: UnitId, entry: NpcId, name: impl Into<String>, location: Vec3) -> Self {
        Self {
            id,
            entry,
            name: name.into(),
            location,
            heading: 0.0,
            health_percent: 100.0,
            alive: true,
            friendly: true,
            attackable: false,
            player: false,
            elite: false,
            in_combat: false,
            moving: false,
            current_target: None,
            owner: None,
            pet: None,
        }
    }

    /// Attackable, unfriendly NPC.
    pub fn hostile(id: UnitId, entry: NpcId, name: impl Into<String>, location: Vec3) -> Self {
        Self {
            friendly: false,
            attackable: true,
            ..Self::npc(id, entry, name, location)
        }
    }

    /// Another player's character.
    pub fn other_player(id: UnitId, name: impl Into<String>, location: Vec3) -> Self {
        Self {
            player: true,
            ..Self::npc(id, NpcId(0), name, location)
        }
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_target(mut self, target: UnitId) -> Self {
        self.current_target = Some(target);
        self.in_combat = true;
        self
    }

    pub fn with_health(mut self, health_percent: f32) -> Self {
        self.health_percent = health_percent;
        self
    }

    pub fn with_owner(mut self, owner: UnitId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn elite(mut self) -> Self {
        self.elite = true;
        self
    }

    pub fn dead(mut self) -> Self {
        self.alive = false;
        self.in_combat = false;
        self.current_target = None;
        self.health_percent = 0.0;
        self
    }

    #[inline]
    pub fn is_targeting(&self, id: UnitId) -> bool {
        self.current_target == Some(id)
    }

    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.location.distance(point)
    }

    /// True when `point` lies within the unit's forward cone.
    pub fn is_facing(&self, point: Vec3) -> bool {
        if self.location.distance_sqr(point) <= f32::EPSILON {
            return true;
        }
        heading_delta(self.location.heading_to(point), self.heading) <= FACING_HALF_ARC
    }
}

/// The character the bot controls.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: UnitId,
    pub location: Vec3,
    pub health_percent: f32,
    pub dead: bool,
    pub ghost: bool,
    pub in_combat: bool,
    pub mounted: bool,
    pub current_target: Option<UnitId>,
    pub pet: Option<UnitId>,
}

impl Agent {
    pub fn new(id: UnitId, location: Vec3) -> Self {
        Self {
            id,
            location,
            health_percent: 100.0,
            dead: false,
            ghost: false,
            in_combat: false,
            mounted: false,
            current_target: None,
            pet: None,
        }
    }

    #[inline]
    pub fn is_dead_or_ghost(&self) -> bool {
        self.dead || self.ghost
    }

    /// True for the agent itself or its pet.
    #[inline]
    pub fn owns(&self, id: UnitId) -> bool {
        id == self.id || self.pet == Some(id)
    }

    /// True when `unit` is targeting the agent or the agent's pet.
    pub fn is_targeted_by(&self, unit: &Unit) -> bool {
        unit.current_target.is_some_and(|target| self.owns(target))
    }
}
