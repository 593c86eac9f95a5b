//! Drives an [`EscortGroup`] through a scenario on the simulated host.

use std::time::Duration;

use anyhow::{Context, Result};
use bot_core::sim::SimWorld;
use bot_core::{UnitId, Vec3};
use quest_behaviors::{BehaviorState, EscortConfig, EscortGroup, Outcome};
use tracing::{debug, info};

use crate::scenario::Scenario;

/// What happened during a run.
#[derive(Debug)]
pub struct Report {
    pub ticks: usize,
    pub elapsed: Duration,
    /// `(tick, state)` every time the state changed, starting with the first.
    pub transitions: Vec<(usize, BehaviorState)>,
    pub outcome: Option<Outcome>,
    pub escorted: Vec<UnitId>,
    pub agent_location: Vec3,
    pub goal: String,
    pub stop_reason: Option<String>,
}

/// Runs `scenario` until the behavior finishes or the tick budget runs out.
pub fn run(scenario: &Scenario, seed: u64) -> Result<Report> {
    let config =
        EscortConfig::from_element(&scenario.behavior).context("invalid behavior element")?;
    let mut escort =
        EscortGroup::seeded(scenario.world(), config, seed).context("invalid behavior element")?;
    let quest = scenario.quest_id();
    let step = Duration::from_millis(scenario.tick_ms);

    let mut transitions = Vec::new();
    let mut ticks = 0;
    for tick in 0..scenario.ticks {
        for event in scenario.events_at(tick) {
            debug!(tick, ?event, "scripted event");
            event.apply(escort.host_mut(), quest);
        }

        escort.tick();
        ticks = tick + 1;

        let state = escort.state();
        if transitions.last().is_none_or(|(_, last)| *last != state) {
            info!(tick, %state, "state");
            transitions.push((tick, state));
        }
        if escort.is_finished() {
            break;
        }
        escort.host_mut().advance(step);
    }

    let host: &SimWorld = escort.host();
    Ok(Report {
        ticks,
        elapsed: host.elapsed(),
        transitions,
        outcome: escort.outcome().cloned(),
        escorted: escort.escorted().to_vec(),
        agent_location: host.agent().location,
        goal: escort.goal_text(),
        stop_reason: host.stop_reason().map(str::to_owned),
    })
}
