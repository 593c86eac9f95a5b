use strum::{Display, EnumIter, IntoStaticStr};

use crate::config::EscortCompleteWhen;
use crate::oracle::Verdict;

/// Phase of an escort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum BehaviorState {
    InitialState,
    SearchingForEscortUnits,
    InteractingToStart,
    IdentifySpecificUnitsToEscort,
    Escorting,
    CheckDone,
}

/// What a `CheckDone` pass decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckDoneResolution {
    /// Nothing happened yet; keep escorting.
    Resume,
    /// The escort is over; the behavior finishes.
    Finish,
    /// The escort failed; start over from the beginning.
    Retry,
}

impl CheckDoneResolution {
    /// State to continue in, or `None` when the behavior is done.
    pub fn next_state(self) -> Option<BehaviorState> {
        match self {
            Self::Resume => Some(BehaviorState::Escorting),
            Self::Finish => None,
            Self::Retry => Some(BehaviorState::InitialState),
        }
    }
}

/// Decides what follows a `CheckDone` pass.
///
/// Completion wins over failure. `QuestCompleteOrFails` already folds failure
/// into completion, so a failed escort under that criterion finishes.
pub fn resolve_check_done(verdict: Verdict, complete_when: EscortCompleteWhen) -> CheckDoneResolution {
    if verdict.complete {
        return CheckDoneResolution::Finish;
    }
    if verdict.failed {
        return if complete_when == EscortCompleteWhen::QuestCompleteOrFails {
            CheckDoneResolution::Finish
        } else {
            CheckDoneResolution::Retry
        };
    }
    CheckDoneResolution::Resume
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn verdict(complete: bool, failed: bool) -> Verdict {
        Verdict { complete, failed }
    }

    #[test]
    fn quiet_escort_resumes() {
        for criterion in [
            EscortCompleteWhen::DestinationReached,
            EscortCompleteWhen::QuestComplete,
            EscortCompleteWhen::QuestCompleteOrFails,
            EscortCompleteWhen::QuestObjectiveComplete,
        ] {
            assert_eq!(
                resolve_check_done(verdict(false, false), criterion),
                CheckDoneResolution::Resume
            );
        }
    }

    #[test]
    fn failure_retries_unless_tolerated() {
        assert_eq!(
            resolve_check_done(verdict(false, true), EscortCompleteWhen::QuestComplete),
            CheckDoneResolution::Retry
        );
        assert_eq!(
            resolve_check_done(verdict(false, true), EscortCompleteWhen::QuestCompleteOrFails),
            CheckDoneResolution::Finish
        );
        assert_eq!(
            resolve_check_done(verdict(true, true), EscortCompleteWhen::QuestComplete),
            CheckDoneResolution::Finish
        );
    }

    #[test]
    fn retry_goes_back_to_the_start() {
        assert_eq!(
            CheckDoneResolution::Retry.next_state(),
            Some(BehaviorState::InitialState)
        );
        assert_eq!(CheckDoneResolution::Finish.next_state(), None);
    }

    #[test]
    fn state_names_are_stable() {
        let names: Vec<&'static str> = BehaviorState::iter().map(Into::into).collect();
        assert_eq!(names.first(), Some(&"InitialState"));
        assert_eq!(BehaviorState::CheckDone.to_string(), "CheckDone");
    }
}
