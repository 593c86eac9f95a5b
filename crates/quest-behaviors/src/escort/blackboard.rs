//! Mutable state shared by every node of the escort tree.
//!
//! The tree itself is stateless; everything that must survive from one tick
//! to the next lives here, next to the host the nodes act through.

use std::time::{Duration, Instant};

use bot_core::{Host, NpcId, Unit, UnitId, Vec3};
use tracing::debug;

use crate::blacklist::LocalBlacklist;
use crate::config::EscortConfig;
use crate::error::EscortError;
use crate::gossip::{GOSSIP_BLACKLIST_SWEEP, GossipSession};
use crate::group::EscortedGroup;
use crate::movement::MovementState;
use crate::path::SearchPath;
use crate::selection::{CandidateSearch, find_escort_candidates};
use crate::throttle::Throttle;

use super::state::BehaviorState;

const WAITING_NOTICE_INTERVAL: Duration = Duration::from_secs(60);
const OUT_OF_RANGE_NOTICE_INTERVAL: Duration = Duration::from_secs(5);

/// How a finished behavior ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Finished normally; carries the reason.
    Done(String),
    Fatal(EscortError),
}

pub struct Blackboard<H> {
    pub(crate) host: H,
    pub(crate) config: EscortConfig,
    pub(crate) state: BehaviorState,
    pub(crate) group: EscortedGroup,
    pub(crate) search_path: SearchPath,
    pub(crate) start_location: Vec3,
    /// Keeps the agent near the group during fights.
    pub(crate) combat_movement: MovementState,
    /// Every other movement: searching, approaching, formation.
    pub(crate) travel_movement: MovementState,
    pub(crate) gossip: GossipSession,
    pub(crate) gossip_blacklist: LocalBlacklist,
    pub(crate) selected_target: Option<UnitId>,
    pub(crate) mob_targeting_us: Option<UnitId>,
    pub(crate) waiting_notice: Throttle,
    pub(crate) out_of_range_notice: Throttle,
    /// Set once a restart has been logged; cleared when a new group is locked in.
    pub(crate) restart_announced: bool,
    pub(crate) outcome: Option<Outcome>,
}

impl<H: Host> Blackboard<H> {
    pub(crate) fn new(host: H, config: EscortConfig, gossip: GossipSession) -> Self {
        let start_location = host.me().location;
        Self {
            host,
            config,
            state: BehaviorState::CheckDone,
            group: EscortedGroup::new(),
            search_path: SearchPath::default(),
            start_location,
            combat_movement: MovementState::default(),
            travel_movement: MovementState::default(),
            gossip,
            gossip_blacklist: LocalBlacklist::new(GOSSIP_BLACKLIST_SWEEP),
            selected_target: None,
            mob_targeting_us: None,
            waiting_notice: Throttle::new(WAITING_NOTICE_INTERVAL),
            out_of_range_notice: Throttle::new(OUT_OF_RANGE_NOTICE_INTERVAL),
            restart_announced: false,
            outcome: None,
        }
    }

    pub(crate) fn now(&self) -> Instant {
        self.host.now()
    }

    pub(crate) fn set_state(&mut self, next: BehaviorState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "escort state change");
            self.state = next;
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    pub(crate) fn finish(&mut self, reason: impl Into<String>) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Done(reason.into()));
        }
    }

    pub(crate) fn fail(&mut self, error: EscortError) {
        self.outcome = Some(Outcome::Fatal(error));
    }

    /// Snapshots of the escorted members that still resolve.
    pub(crate) fn members(&self) -> Vec<Unit> {
        self.group.members(&self.host)
    }

    /// Prunes the group and reports whether anyone is left.
    pub(crate) fn refresh_group(&mut self) -> bool {
        self.group.is_viable(&self.host)
    }

    fn candidates(&self, ids: &[NpcId]) -> Vec<Unit> {
        find_escort_candidates(
            &self.host,
            CandidateSearch {
                ids,
                radius: self.config.search_radius,
                count_max: self.config.escort_count_max,
                non_compete_distance: self.config.non_compete_distance,
            },
        )
    }

    pub(crate) fn find_start_npcs(&self) -> Vec<Unit> {
        self.candidates(&self.config.start_npc_ids)
    }

    pub(crate) fn find_escort_npcs(&self) -> Vec<Unit> {
        self.candidates(&self.config.escort_npc_ids)
    }

    /// Replaces the group with the escort NPCs currently in reach.
    pub(crate) fn lock_in_group(&mut self) -> Vec<Unit> {
        let found = self.find_escort_npcs();
        self.group = EscortedGroup::from_units(&found);
        found
    }
}
