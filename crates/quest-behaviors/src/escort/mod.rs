//! The EscortGroup quest behavior.
//!
//! Finds a group of NPCs (optionally after talking to a start NPC), follows
//! them in formation and fights whatever attacks them, until the configured
//! completion criterion is met. A failed escort is retried from the start
//! unless the criterion accepts failure.
//!
//! # Architecture
//!
//! - [`EscortGroup`]: owns the host, the tree and the blackboard; the host
//!   calls [`EscortGroup::tick`] once per frame
//! - [`blackboard`]: everything that persists between ticks
//! - [`nodes`]: escort-specific condition and action nodes
//! - [`subtrees`]: per-state subtrees and the combat/death responses
//! - [`state`]: the state enum and the pure `CheckDone` resolution

pub mod blackboard;
pub mod nodes;
pub mod state;
pub mod subtrees;

use behavior_tree::Status;
use bot_core::{Activities, Host, Unit, UnitId};
use tracing::{info, info_span};

use crate::config::{BehaviorElement, EscortConfig};
use crate::error::{ConfigError, EscortError};
use crate::gossip::GossipSession;
use crate::path::SearchPath;

pub use blackboard::{Blackboard, Outcome};
pub use state::{BehaviorState, CheckDoneResolution, resolve_check_done};
pub use subtrees::EscortTree;

const GOAL_NOTE: &str = "Looting and Harvesting are disabled while Escort in progress";

/// A running escort.
pub struct EscortGroup<H: Host + 'static> {
    tree: EscortTree<H>,
    blackboard: Blackboard<H>,
    started: bool,
    /// Host activities as they were before the escort suppressed some.
    saved_activities: Option<Activities>,
}

impl<H: Host + 'static> EscortGroup<H> {
    /// Validates `config` and prepares the behavior; nothing happens until the
    /// first tick.
    pub fn new(host: H, config: EscortConfig) -> Result<Self, ConfigError> {
        Self::with_gossip(host, config, GossipSession::new())
    }

    /// Like [`new`](Self::new), with reproducible gossip pacing.
    pub fn seeded(host: H, config: EscortConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_gossip(host, config, GossipSession::seeded(seed))
    }

    /// Parses a behavior element and prepares the behavior.
    pub fn from_element(host: H, element: &BehaviorElement) -> Result<Self, EscortError> {
        let config = EscortConfig::from_element(element)?;
        Ok(Self::new(host, config)?)
    }

    fn with_gossip(host: H, config: EscortConfig, gossip: GossipSession) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tree: subtrees::escort_tree(),
            blackboard: Blackboard::new(host, config, gossip),
            started: false,
            saved_activities: None,
        })
    }

    /// Runs one pass of the behavior.
    ///
    /// Returns `Success` once the behavior has finished normally and
    /// `Failure` once it has stopped on a fatal error. Further ticks are
    /// no-ops.
    pub fn tick(&mut self) -> Status {
        let span = info_span!("escort_group", quest = ?self.blackboard.config.quest.quest_id);
        let _enter = span.enter();

        if let Some(outcome) = &self.blackboard.outcome {
            return outcome_status(outcome);
        }
        if !self.started {
            self.on_start();
        }
        if !self.blackboard.is_done() {
            let status = self.tree.tick(&mut self.blackboard);
            if !self.blackboard.is_done() {
                return status;
            }
        }
        self.on_finish();
        self.blackboard
            .outcome
            .as_ref()
            .map_or(Status::Success, outcome_status)
    }

    fn on_start(&mut self) {
        self.started = true;
        let bb = &mut self.blackboard;

        if !bb.config.quest.requirements_met(&bb.host) {
            info!("quest requirements not met, nothing to do");
            bb.finish("quest requirements not met");
            return;
        }

        let saved = bb.host.activities();
        let mut suppressed = Activities::VENDOR | Activities::FLIGHT_PATH | Activities::LOOT;
        if !bb.config.priority_target_ids.is_empty() {
            suppressed |= Activities::PULL;
        }
        bb.host.set_activities(saved.difference(suppressed));
        self.saved_activities = Some(saved);

        let here = bb.host.me().location;
        bb.search_path = if bb.config.search_path.is_empty() {
            SearchPath::single(here)
        } else {
            SearchPath::new(bb.config.search_path.iter().copied())
        };
        bb.start_location = here;
        bb.set_state(BehaviorState::InitialState);
        info!(goal = %self.goal_text(), "escort started");
    }

    fn on_finish(&mut self) {
        if let Some(saved) = self.saved_activities.take() {
            self.blackboard.host.set_activities(saved);
        }
        info!("Finished");
    }

    pub fn is_finished(&self) -> bool {
        self.blackboard.is_done()
    }

    /// How the behavior ended, once it has.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.blackboard.outcome.as_ref()
    }

    pub fn state(&self) -> BehaviorState {
        self.blackboard.state
    }

    /// `"<quest>: <state>"` followed by the suppressed-activities note.
    pub fn goal_text(&self) -> String {
        let bb = &self.blackboard;
        let quest = match bb.config.quest.quest_id {
            Some(id) => bb
                .host
                .quest(id)
                .map_or_else(|| id.to_string(), |quest| quest.name),
            None => "EscortGroup".to_owned(),
        };
        format!("{quest}: {}\n{GOAL_NOTE}", bb.state)
    }

    /// Units the host's target filter should consider hostile: anything in
    /// combat with one of the escort NPC types.
    pub fn include_targets(&self) -> Vec<Unit> {
        let world = &self.blackboard.host;
        let escort_ids = &self.blackboard.config.escort_npc_ids;
        world.find_units(&|unit| {
            unit.alive
                && unit.in_combat
                && unit
                    .current_target
                    .and_then(|target| world.unit(target))
                    .is_some_and(|target| escort_ids.contains(&target.entry))
        })
    }

    /// Ids of the units currently being escorted.
    pub fn escorted(&self) -> &[UnitId] {
        self.blackboard.group.ids()
    }

    pub fn config(&self) -> &EscortConfig {
        &self.blackboard.config
    }

    pub fn host(&self) -> &H {
        &self.blackboard.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.blackboard.host
    }
}

fn outcome_status(outcome: &Outcome) -> Status {
    match outcome {
        Outcome::Done(_) => Status::Success,
        Outcome::Fatal(_) => Status::Failure,
    }
}
