//! RON scenario files.
//!
//! A scenario describes the starting world (agent, quest, units, scripted
//! conversations), the behavior element under test and a timeline of
//! scripted events keyed by tick number.

use std::path::Path;

use anyhow::{Context, Result};
use bot_core::sim::SimWorld;
use bot_core::{NpcId, QuestId, QuestRecord, Unit, UnitId, Vec3};
use quest_behaviors::BehaviorElement;
use serde::Deserialize;

const DEFAULT_TICKS: usize = 600;
const DEFAULT_TICK_MS: u64 = 250;

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub behavior: BehaviorElement,
    #[serde(default)]
    pub agent: AgentSpec,
    #[serde(default)]
    pub quest: Option<QuestSpec>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub gossip: Vec<GossipSpec>,
    #[serde(default)]
    pub events: Vec<ScriptedEvent>,
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_ticks() -> usize {
    DEFAULT_TICKS
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub mountable: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuestSpec {
    pub id: QuestId,
    pub name: String,
    #[serde(default)]
    pub objectives: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UnitSpec {
    pub id: UnitId,
    pub entry: NpcId,
    pub name: String,
    pub location: Vec3,
    #[serde(default)]
    pub hostile: bool,
    #[serde(default)]
    pub elite: bool,
    #[serde(default)]
    pub heading: f32,
    #[serde(default)]
    pub target: Option<UnitId>,
    /// Waypoints the unit walks once it exists.
    #[serde(default)]
    pub route: Vec<Vec3>,
}

impl UnitSpec {
    fn to_unit(&self) -> Unit {
        let mut unit = if self.hostile {
            Unit::hostile(self.id, self.entry, self.name.clone(), self.location)
        } else {
            Unit::npc(self.id, self.entry, self.name.clone(), self.location)
        };
        unit = unit.with_heading(self.heading);
        if self.elite {
            unit = unit.elite();
        }
        if let Some(target) = self.target {
            unit = unit.with_target(target);
        }
        unit
    }

    fn place(&self, world: &mut SimWorld) {
        world.spawn(self.to_unit());
        if !self.route.is_empty() {
            world.set_route(self.id, self.route.iter().copied());
        }
    }
}

/// A conversation on `npc` that ends after `options` picks and spawns `spawns`.
#[derive(Clone, Debug, Deserialize)]
pub struct GossipSpec {
    pub npc: UnitId,
    pub options: usize,
    #[serde(default)]
    pub spawns: Vec<UnitSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScriptedEvent {
    pub at_tick: usize,
    pub action: EventAction,
}

#[derive(Clone, Debug, Deserialize)]
pub enum EventAction {
    CompleteQuest,
    FailQuest,
    /// One-based, like `QuestObjectiveIndex`.
    CompleteObjective(u8),
    Spawn(UnitSpec),
    Kill(UnitId),
    KillAgent,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Builds the starting world.
    pub fn world(&self) -> SimWorld {
        let mut world = SimWorld::new(self.agent.location);
        world.set_mountable(self.agent.mountable);
        if let Some(quest) = &self.quest {
            world.insert_quest(QuestRecord::new(quest.id, quest.name.clone(), quest.objectives));
        }
        for unit in &self.units {
            unit.place(&mut world);
        }
        for script in &self.gossip {
            for spawn in &script.spawns {
                if !spawn.route.is_empty() {
                    world.set_route(spawn.id, spawn.route.iter().copied());
                }
            }
            let spawns = script.spawns.iter().map(UnitSpec::to_unit).collect();
            world.script_gossip(script.npc, script.options, spawns);
        }
        world
    }

    /// Events scheduled for `tick`, in file order.
    pub fn events_at(&self, tick: usize) -> impl Iterator<Item = &EventAction> {
        self.events
            .iter()
            .filter(move |event| event.at_tick == tick)
            .map(|event| &event.action)
    }

    pub fn quest_id(&self) -> Option<QuestId> {
        self.quest.as_ref().map(|quest| quest.id)
    }
}

impl EventAction {
    pub fn apply(&self, world: &mut SimWorld, quest: Option<QuestId>) {
        match self {
            Self::CompleteQuest => {
                if let Some(record) = quest_record(world, quest) {
                    record.completed = true;
                }
            }
            Self::FailQuest => {
                if let Some(record) = quest_record(world, quest) {
                    record.failed = true;
                }
            }
            Self::CompleteObjective(index) => {
                let slot = usize::from(*index).checked_sub(1);
                let done = quest_record(world, quest)
                    .zip(slot)
                    .and_then(|(record, slot)| record.objectives.get_mut(slot));
                if let Some(done) = done {
                    *done = true;
                }
            }
            Self::Spawn(unit) => unit.place(world),
            Self::Kill(id) => world.kill(*id),
            Self::KillAgent => world.agent_mut().dead = true,
        }
    }
}

fn quest_record(world: &mut SimWorld, quest: Option<QuestId>) -> Option<&mut QuestRecord> {
    quest.and_then(|id| world.quest_mut(id))
}
