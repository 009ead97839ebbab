/// Why the queue panel is empty. Both are steady states with the same
/// control enablement; only the presentation differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    NothingDue,
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Empty(EmptyReason),
    Loading,
    ShowingQuestion,
    ShowingAnswer,
    /// A judgement is in flight. `revealed` remembers the visibility to
    /// restore if the server does not accept it.
    Submitting { correct: bool, revealed: bool },
    /// The server answered 401. Absorbing: nothing leaves this phase.
    Expired,
}

impl SessionPhase {
    pub fn judgement_enabled(self) -> bool {
        matches!(self, SessionPhase::ShowingQuestion | SessionPhase::ShowingAnswer)
    }

    pub fn answer_visible(self) -> bool {
        matches!(self, SessionPhase::ShowingAnswer)
    }

    /// A fetch-next or submit request is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, SessionPhase::Loading | SessionPhase::Submitting { .. })
    }

    pub fn is_empty(self) -> bool {
        matches!(self, SessionPhase::Empty(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Empty(EmptyReason::NothingDue) => "empty",
            SessionPhase::Empty(EmptyReason::Unavailable) => "unavailable",
            SessionPhase::Loading => "loading",
            SessionPhase::ShowingQuestion => "showing-question",
            SessionPhase::ShowingAnswer => "showing-answer",
            SessionPhase::Submitting { .. } => "submitting",
            SessionPhase::Expired => "expired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionPhase; 8] = [
        SessionPhase::Empty(EmptyReason::NothingDue),
        SessionPhase::Empty(EmptyReason::Unavailable),
        SessionPhase::Loading,
        SessionPhase::ShowingQuestion,
        SessionPhase::ShowingAnswer,
        SessionPhase::Submitting { correct: true, revealed: false },
        SessionPhase::Submitting { correct: false, revealed: true },
        SessionPhase::Expired,
    ];

    #[test]
    fn judgement_enabled_only_while_showing() {
        for phase in ALL {
            let showing = matches!(
                phase,
                SessionPhase::ShowingQuestion | SessionPhase::ShowingAnswer
            );
            assert_eq!(phase.judgement_enabled(), showing, "{phase:?}");
        }
    }

    #[test]
    fn busy_phases_never_accept_judgements() {
        for phase in ALL.into_iter().filter(|p| p.is_busy()) {
            assert!(!phase.judgement_enabled());
        }
    }
}
