use std::time::{Duration, Instant};

use bitflags::bitflags;

bitflags! {
    /// Background activities the bot performs on its own between behaviors.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Activities: u8 {
        const VENDOR = 1 << 0;
        const FLIGHT_PATH = 1 << 1;
        /// Looting corpses and harvesting nodes.
        const LOOT = 1 << 2;
        /// Pulling mobs that are not already engaged.
        const PULL = 1 << 3;
    }
}

impl Default for Activities {
    fn default() -> Self {
        Self::all()
    }
}

/// Bot-level switches shared by every behavior.
pub trait BotControl {
    fn activities(&self) -> Activities;

    fn set_activities(&mut self, activities: Activities);

    /// Round-trip latency to the game server.
    fn latency(&self) -> Duration;

    /// Stops the bot entirely after an unrecoverable error.
    fn request_stop(&mut self, reason: &str);
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}
