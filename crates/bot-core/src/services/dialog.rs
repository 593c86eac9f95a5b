use crate::ids::UnitId;

/// NPC conversation ("gossip") window.
pub trait GossipFrame {
    fn is_dialog_open(&self) -> bool;

    /// Right-clicks `unit`, which opens its dialog when it has one.
    fn interact(&mut self, unit: UnitId);

    /// Picks a zero-based option from the open dialog.
    fn select_option(&mut self, index: usize);

    fn close_dialog(&mut self);
}
