//! Service seams the bot host provides to behaviors.
//!
//! Each trait covers one game subsystem. [`Host`] bundles them so a behavior
//! can be generic over a single type parameter; anything implementing every
//! service is a host automatically.
mod combat;
mod control;
mod dialog;
mod navigation;
mod quests;
mod world;

pub use combat::{Combat, PointOfInterest};
pub use control::{Activities, BotControl, Clock};
pub use dialog::GossipFrame;
pub use navigation::{MoveResult, Navigator};
pub use quests::{QuestLog, QuestRecord};
pub use world::WorldQuery;

/// Everything a quest behavior may ask of the bot.
pub trait Host: WorldQuery + Navigator + QuestLog + GossipFrame + Combat + BotControl + Clock {}

impl<T> Host for T where
    T: WorldQuery + Navigator + QuestLog + GossipFrame + Combat + BotControl + Clock
{
}
