use crate::ids::UnitId;
use crate::unit::{Agent, Unit};

/// Read-only view of the units around the bot.
///
/// [`WorldQuery::units`] reports every visible unit except the agent itself,
/// players included. Dead units stay visible until they despawn.
pub trait WorldQuery {
    fn me(&self) -> Agent;

    fn units(&self) -> Vec<Unit>;

    fn unit(&self, id: UnitId) -> Option<Unit> {
        self.units().into_iter().find(|unit| unit.id == id)
    }

    fn find_units(&self, predicate: &dyn Fn(&Unit) -> bool) -> Vec<Unit> {
        self.units().into_iter().filter(|unit| predicate(unit)).collect()
    }

    /// Characters grouped with the agent, excluding the agent.
    fn party_members(&self) -> Vec<UnitId> {
        Vec::new()
    }

    fn in_line_of_sight(&self, id: UnitId) -> bool;

    /// Units the combat system has given up on (evade bugged, unreachable).
    fn is_combat_blacklisted(&self, _id: UnitId) -> bool {
        false
    }
}
