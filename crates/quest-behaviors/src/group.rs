//! The set of NPCs being escorted.

use bot_core::{Unit, UnitId, WorldQuery};
use tracing::debug;

/// Ordered handles of the escorted NPCs.
///
/// Members are tracked by id and re-resolved every tick; a member that no
/// longer resolves, or resolves dead, is pruned on the next viability check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EscortedGroup {
    members: Vec<UnitId>,
}

impl EscortedGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: &[Unit]) -> Self {
        Self {
            members: units.iter().map(|unit| unit.id).collect(),
        }
    }

    pub fn ids(&self) -> &[UnitId] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Drops members that are gone or dead.
    pub fn prune<W: WorldQuery + ?Sized>(&mut self, world: &W) {
        let before = self.members.len();
        self.members
            .retain(|id| world.unit(*id).is_some_and(|unit| unit.alive));
        if self.members.len() != before {
            debug!(
                pruned = before - self.members.len(),
                remaining = self.members.len(),
                "escorted group pruned"
            );
        }
    }

    /// Prunes, then reports whether anyone is left to escort.
    pub fn is_viable<W: WorldQuery + ?Sized>(&mut self, world: &W) -> bool {
        self.prune(world);
        !self.members.is_empty()
    }

    /// Current snapshots of the members that still resolve.
    pub fn members<W: WorldQuery + ?Sized>(&self, world: &W) -> Vec<Unit> {
        self.members.iter().filter_map(|id| world.unit(*id)).collect()
    }
}
