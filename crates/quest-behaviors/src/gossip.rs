//! Paced conversation with the NPC that starts an escort.
//!
//! A [`GossipSession`] opens the NPC's dialog and picks the configured
//! options one per step, waiting a humanized delay before each choice. If the
//! dialog disappears mid-conversation the next step starts over with a fresh
//! interaction. Once every option has been picked, the NPC is blacklisted so
//! the search does not pick it up again right away.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use bot_core::{BotControl, Clock, Combat, GossipFrame, Unit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::blacklist::LocalBlacklist;

pub const GOSSIP_BLACKLIST_TTL: Duration = Duration::from_secs(120);
pub const GOSSIP_BLACKLIST_SWEEP: Duration = Duration::from_secs(30);
const CHOICE_DELAY_MS: RangeInclusive<u64> = 800..=1700;
const LAG_FLOOR: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GossipOutcome {
    InProgress,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingDialog { since: Instant },
    Choosing,
}

#[derive(Debug)]
pub struct GossipSession {
    phase: Phase,
    option_index: usize,
    next_choice_at: Option<Instant>,
    rng: StdRng,
}

impl GossipSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible pacing, for simulations.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: Phase::Idle,
            option_index: 0,
            next_choice_at: None,
            rng,
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.option_index = 0;
        self.next_choice_at = None;
    }

    fn choice_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(CHOICE_DELAY_MS))
    }

    /// Runs one step of the conversation with `npc`.
    ///
    /// `options` are zero-based; an empty list means interacting is enough.
    pub fn step<H>(
        &mut self,
        host: &mut H,
        npc: &Unit,
        options: &[usize],
        blacklist: &mut LocalBlacklist,
    ) -> GossipOutcome
    where
        H: GossipFrame + Combat + BotControl + Clock + ?Sized,
    {
        let now = host.now();
        let lag = host.latency() * 2 + LAG_FLOOR;

        if !host.is_dialog_open() {
            if let Phase::AwaitingDialog { since } = self.phase {
                if now < since + lag {
                    return GossipOutcome::InProgress;
                }
                if options.is_empty() {
                    return self.complete(npc, blacklist, now);
                }
                debug!(npc = %npc.id, "dialog did not open, interacting again");
            } else if self.phase == Phase::Choosing {
                debug!(npc = %npc.id, chosen = self.option_index, "dialog closed mid-conversation, starting over");
            }

            host.target(npc.id);
            info!("Interacting with \"{}\" to start event.", npc.name);
            host.interact(npc.id);
            self.phase = Phase::AwaitingDialog { since: now };
            self.option_index = 0;
            let delay = self.choice_delay();
            self.next_choice_at = Some(now + lag + delay);
            return GossipOutcome::InProgress;
        }

        if options.is_empty() {
            return self.complete(npc, blacklist, now);
        }

        if self.phase != Phase::Choosing {
            self.phase = Phase::Choosing;
            if self.next_choice_at.is_none() {
                let delay = self.choice_delay();
                self.next_choice_at = Some(now + delay);
            }
        }
        if self.next_choice_at.is_some_and(|at| now < at) {
            return GossipOutcome::InProgress;
        }

        let Some(&option) = options.get(self.option_index) else {
            return self.complete(npc, blacklist, now);
        };
        debug!(npc = %npc.id, option = option + 1, "selecting gossip option");
        host.select_option(option);
        self.option_index += 1;

        if self.option_index >= options.len() {
            return self.complete(npc, blacklist, now);
        }
        let delay = self.choice_delay();
        self.next_choice_at = Some(now + delay);
        GossipOutcome::InProgress
    }

    fn complete(&mut self, npc: &Unit, blacklist: &mut LocalBlacklist, now: Instant) -> GossipOutcome {
        blacklist.add(npc.id, GOSSIP_BLACKLIST_TTL, now);
        debug!(npc = %npc.id, ttl = ?GOSSIP_BLACKLIST_TTL, "start NPC blacklisted after conversation");
        self.reset();
        GossipOutcome::Complete
    }
}

impl Default for GossipSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::sim::{Command, SimWorld};
    use bot_core::{NpcId, UnitId, Vec3};

    fn setup(options: usize) -> (SimWorld, Unit) {
        let mut world = SimWorld::new(Vec3::ZERO);
        let npc = Unit::npc(UnitId(10), NpcId(100), "Watcher Kira", Vec3::new(1.0, 0.0, 0.0));
        world.spawn(npc.clone());
        world.script_gossip(npc.id, options, Vec::new());
        (world, npc)
    }

    fn run(
        session: &mut GossipSession,
        world: &mut SimWorld,
        npc: &Unit,
        options: &[usize],
        blacklist: &mut LocalBlacklist,
    ) -> usize {
        for step in 1..=20 {
            if session.step(world, npc, options, blacklist) == GossipOutcome::Complete {
                return step;
            }
            world.advance(Duration::from_millis(500));
        }
        panic!("conversation never completed");
    }

    #[test]
    fn picks_options_in_order_then_blacklists() {
        let (mut world, npc) = setup(2);
        let mut blacklist = LocalBlacklist::new(GOSSIP_BLACKLIST_SWEEP);
        let mut session = GossipSession::seeded(7);

        run(&mut session, &mut world, &npc, &[0, 1], &mut blacklist);

        assert_eq!(world.selected_options(), vec![0, 1]);
        assert!(blacklist.contains(npc.id, world.now()));
        assert!(world.commands().contains(&Command::Interact(npc.id)));
    }

    #[test]
    fn choices_wait_for_humanized_delay() {
        let (mut world, npc) = setup(1);
        let mut blacklist = LocalBlacklist::new(GOSSIP_BLACKLIST_SWEEP);
        let mut session = GossipSession::seeded(3);

        assert_eq!(session.step(&mut world, &npc, &[0], &mut blacklist), GossipOutcome::InProgress);
        assert!(world.is_dialog_open());
        // Lag (2 * 100ms + 150ms) plus at least 800ms must pass first.
        world.advance(Duration::from_millis(900));
        assert_eq!(session.step(&mut world, &npc, &[0], &mut blacklist), GossipOutcome::InProgress);
        assert!(world.selected_options().is_empty());

        world.advance(Duration::from_millis(1200));
        assert_eq!(session.step(&mut world, &npc, &[0], &mut blacklist), GossipOutcome::Complete);
        assert_eq!(world.selected_options(), vec![0]);
    }

    #[test]
    fn closed_dialog_restarts_conversation() {
        let (mut world, npc) = setup(3);
        let mut blacklist = LocalBlacklist::new(GOSSIP_BLACKLIST_SWEEP);
        let mut session = GossipSession::seeded(11);
        let options = [0, 1, 2];

        session.step(&mut world, &npc, &options, &mut blacklist);
        world.advance(Duration::from_secs(3));
        session.step(&mut world, &npc, &options, &mut blacklist);
        assert_eq!(world.selected_options(), vec![0]);

        world.close_dialog();
        world.advance(Duration::from_secs(3));
        session.step(&mut world, &npc, &options, &mut blacklist);
        let interactions = world
            .commands()
            .iter()
            .filter(|c| **c == Command::Interact(npc.id))
            .count();
        assert_eq!(interactions, 2);

        run(&mut session, &mut world, &npc, &options, &mut blacklist);
        assert_eq!(world.selected_options(), vec![0, 0, 1, 2]);
    }

    #[test]
    fn interact_only_completes_after_lag() {
        let (mut world, npc) = setup(0);
        let mut blacklist = LocalBlacklist::new(GOSSIP_BLACKLIST_SWEEP);
        let mut session = GossipSession::seeded(5);

        assert_eq!(session.step(&mut world, &npc, &[], &mut blacklist), GossipOutcome::InProgress);
        assert_eq!(session.step(&mut world, &npc, &[], &mut blacklist), GossipOutcome::InProgress);
        world.advance(Duration::from_millis(400));
        assert_eq!(session.step(&mut world, &npc, &[], &mut blacklist), GossipOutcome::Complete);
        assert!(world.selected_options().is_empty());
    }
}
