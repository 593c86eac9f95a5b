//! Tick-driven quest behaviors.
//!
//! Behaviors are generic over a [`bot_core::Host`] and are driven by calling
//! `tick` once per bot frame. Nothing blocks: waits are expressed as
//! [`behavior_tree::Status::Running`] and retried on the next tick, and every
//! timer compares against the host clock.
//!
//! # Modules
//!
//! - [`escort`]: the EscortGroup behavior and its state machine
//! - [`config`]: behavior element parsing and validation
//! - [`selection`], [`group`], [`oracle`]: world queries the escort decides on
//! - [`movement`], [`gossip`]: multi-tick sub-behaviors
//! - [`blacklist`], [`throttle`], [`path`]: small time and route helpers

pub mod blacklist;
pub mod config;
pub mod error;
pub mod escort;
pub mod gossip;
pub mod group;
pub mod movement;
pub mod oracle;
pub mod path;
pub mod selection;
pub mod throttle;

pub use config::{BehaviorElement, EscortCompleteWhen, EscortConfig, QuestBinding};
pub use error::{ConfigError, ConfigIssue, EscortError};
pub use escort::{BehaviorState, EscortGroup, Outcome};
