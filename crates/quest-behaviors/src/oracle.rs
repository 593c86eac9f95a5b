//! Completion and failure checks for an escort.

use bot_core::{QuestLog, Vec3, WorldQuery};

use crate::config::{EscortCompleteWhen, EscortConfig};
use crate::group::EscortedGroup;

/// Outcome of one oracle consultation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    pub complete: bool,
    pub failed: bool,
}

/// Inclusive: standing exactly on the destination with zero tolerance counts.
pub fn destination_reached(location: Vec3, destination: Vec3, tolerance: f32) -> bool {
    location.distance(destination) <= tolerance
}

/// The escort failed when nobody is left to escort or the quest says so.
///
/// A quest that is no longer in the log is not a failure.
pub fn is_escort_failed<H>(config: &EscortConfig, host: &H, group: &mut EscortedGroup) -> bool
where
    H: WorldQuery + QuestLog + ?Sized,
{
    let group_lost = !group.is_viable(host);
    let quest_failed = config
        .quest
        .quest_id
        .and_then(|id| host.quest(id))
        .is_some_and(|quest| quest.failed);
    group_lost || quest_failed
}

pub fn is_escort_complete<H>(config: &EscortConfig, host: &H, group: &mut EscortedGroup) -> bool
where
    H: WorldQuery + QuestLog + ?Sized,
{
    let quest = config.quest.quest_id.and_then(|id| host.quest(id));
    match config.complete_when {
        EscortCompleteWhen::DestinationReached => destination_reached(
            host.me().location,
            config.complete_location,
            config.complete_max_range,
        ),
        EscortCompleteWhen::QuestComplete => quest.is_none_or(|quest| quest.completed),
        EscortCompleteWhen::QuestCompleteOrFails => {
            quest.is_none_or(|quest| quest.completed) || is_escort_failed(config, host, group)
        }
        EscortCompleteWhen::QuestObjectiveComplete => match (quest, config.quest.objective_index) {
            (Some(quest), Some(index)) => quest.is_objective_complete(index),
            _ => false,
        },
    }
}

/// Consults both checks; failure is evaluated first so the group is pruned
/// before completion looks at it.
pub fn evaluate<H>(config: &EscortConfig, host: &H, group: &mut EscortedGroup) -> Verdict
where
    H: WorldQuery + QuestLog + ?Sized,
{
    let failed = is_escort_failed(config, host, group);
    let complete = is_escort_complete(config, host, group);
    Verdict { complete, failed }
}
