use crate::ids::QuestId;

/// Progress of a quest currently in the quest log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestRecord {
    pub id: QuestId,
    pub name: String,
    pub completed: bool,
    pub failed: bool,
    /// Completion flag per objective, in log order.
    pub objectives: Vec<bool>,
}

impl QuestRecord {
    pub fn new(id: QuestId, name: impl Into<String>, objective_count: usize) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
            failed: false,
            objectives: vec![false; objective_count],
        }
    }

    /// Completion of the 1-based objective `index`.
    ///
    /// Unknown indices are reported incomplete.
    pub fn is_objective_complete(&self, index: u8) -> bool {
        usize::from(index)
            .checked_sub(1)
            .and_then(|slot| self.objectives.get(slot))
            .copied()
            .unwrap_or(false)
    }
}

pub trait QuestLog {
    /// Looks up a quest in the log; `None` when it is not there.
    fn quest(&self, id: QuestId) -> Option<QuestRecord>;
}
