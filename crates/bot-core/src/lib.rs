//! Host-side vocabulary shared by quest behaviors.
//!
//! `bot-core` defines what a behavior can observe (units, the agent, quest
//! progress) and what it can ask the bot to do (move, talk, fight). The game
//! client side implements the service traits in [`services`]; behaviors stay
//! generic over [`Host`] and never touch the client directly.
//!
//! Enable the `sim` feature for [`sim::SimWorld`], an in-memory host with a
//! manual clock used by tests and the offline scenario runner.
pub mod geometry;
pub mod ids;
pub mod services;
pub mod unit;

#[cfg(feature = "sim")]
pub mod sim;

pub use geometry::{Vec3, heading_delta, mean_heading, normalize_heading};
pub use ids::{NpcId, QuestId, UnitId};
pub use services::{
    Activities, BotControl, Clock, Combat, GossipFrame, Host, MoveResult, Navigator,
    PointOfInterest, QuestLog, QuestRecord, WorldQuery,
};
pub use unit::{Agent, FACING_HALF_ARC, Unit};
