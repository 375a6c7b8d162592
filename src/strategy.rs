//! Module defining the capability every competing strategy must implement

/// The per-round choice available to every participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Play nice this round.
    Cooperate,
    /// Betray the other two participants this round.
    Defect,
}

impl Action {
    /// The other action.
    #[must_use]
    pub fn opposite(self) -> Action {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Action::Cooperate => 0,
            Action::Defect => 1,
        }
    }
}

/// What a competing agent should implement.
///
/// One instance is created (from its pool factory) right before each match,
/// consulted once per round, and dropped when the match ends. Instances may
/// keep arbitrary private state between rounds of the same match; nothing
/// survives into the next match.
///
/// Histories are *seat-relative*: a participant always receives its own
/// history first, then the next seat's, then the next-next seat's, following
/// the table order A→B→C→A. `round` equals the length of every history slice.
///
/// Implementations must return an action for every valid input, including
/// `round == 0` with three empty histories. Panicking inside `decide` is a
/// contract violation and aborts the enclosing match (see
/// [`play_match`](crate::match_sim::play_match)).
///
/// Strategies that want randomness should own their generator (e.g. a
/// [`SmallRng`](rand::rngs::SmallRng) seeded at construction) instead of
/// reaching for a process-wide source, so concurrent matches never share a
/// stream.
pub trait Strategy {
    /// Chooses the action for the round about to be played.
    fn decide(
        &mut self,
        round: usize,
        own: &[Action],
        opp1: &[Action],
        opp2: &[Action],
    ) -> Action;
}

#[cfg(test)]
mod capability_tests {
    use super::*;

    struct Parrot {
        fallback: Action,
    }

    impl Strategy for Parrot {
        fn decide(
            &mut self,
            round: usize,
            _own: &[Action],
            opp1: &[Action],
            _opp2: &[Action],
        ) -> Action {
            if round == 0 {
                self.fallback
            } else {
                opp1[round - 1]
            }
        }
    }

    fn boxed_decide(strategy: &mut dyn Strategy, histories: [&[Action]; 3]) -> Action {
        strategy.decide(histories[0].len(), histories[0], histories[1], histories[2])
    }

    #[test]
    fn test_dyn_strategy() {
        let mut parrot = Parrot {
            fallback: Action::Cooperate,
        };
        assert_eq!(boxed_decide(&mut parrot, [&[], &[], &[]]), Action::Cooperate);
        assert_eq!(
            boxed_decide(
                &mut parrot,
                [&[Action::Cooperate], &[Action::Defect], &[Action::Cooperate]]
            ),
            Action::Defect
        );
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Action::Cooperate.opposite(), Action::Defect);
        assert_eq!(Action::Defect.opposite(), Action::Cooperate);
        assert_eq!(Action::Defect.opposite().opposite(), Action::Defect);
    }
}
