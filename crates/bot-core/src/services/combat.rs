use crate::ids::UnitId;

/// What the bot's main loop is currently interested in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointOfInterest {
    #[default]
    None,
    Kill(UnitId),
}

pub trait Combat {
    fn target(&mut self, unit: UnitId);

    fn clear_target(&mut self);

    fn point_of_interest(&self) -> PointOfInterest;

    fn set_point_of_interest(&mut self, poi: PointOfInterest);

    /// Runs one pass of the combat routine (heal, buff, fight) against `unit`.
    fn engage(&mut self, unit: UnitId);
}
