//! The four classics plus the two simplest mirror agents

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::strategy::{Action, Strategy};

/// Cooperates unconditionally.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysCooperate;

impl Strategy for AlwaysCooperate {
    fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
        Action::Cooperate
    }
}

/// Defects unconditionally.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDefect;

impl Strategy for AlwaysDefect {
    fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
        Action::Defect
    }
}

/// Flips a fair coin every round.
#[derive(Debug)]
pub struct CoinFlip {
    rng: SmallRng,
}

impl CoinFlip {
    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl Default for CoinFlip {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for CoinFlip {
    fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
        if self.rng.gen_bool(0.5) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Flips one coin at construction and never reconsiders.
#[derive(Clone, Copy, Debug)]
pub struct Resolute {
    action: Action,
}

impl Resolute {
    /// Commits to a random action for the whole match.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Commits using an injected stream.
    #[must_use]
    pub fn with_rng(mut rng: SmallRng) -> Self {
        let action = if rng.gen_bool(0.5) {
            Action::Cooperate
        } else {
            Action::Defect
        };
        Self { action }
    }
}

impl Default for Resolute {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Resolute {
    fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
        self.action
    }
}

/// Tit-for-tat against a randomly chosen opponent.
///
/// With two opponents there is no single "the other player" to mirror, so
/// each round this agent picks one of the two at random and copies that
/// opponent's previous move. Cooperates on the first round.
#[derive(Debug)]
pub struct TitForTat {
    rng: SmallRng,
}

impl TitForTat {
    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl Default for TitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for TitForTat {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if self.rng.gen_bool(0.5) {
            opp1[round - 1]
        } else {
            opp2[round - 1]
        }
    }
}

/// Does the opposite of a randomly chosen opponent's previous move.
#[derive(Debug)]
pub struct AntiTitForTat {
    rng: SmallRng,
}

impl AntiTitForTat {
    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl Default for AntiTitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for AntiTitForTat {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let mirrored = if self.rng.gen_bool(0.5) {
            opp1[round - 1]
        } else {
            opp2[round - 1]
        };
        mirrored.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Action::{Cooperate as C, Defect as D};

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn constants_never_waver() {
        let mut nice = AlwaysCooperate;
        let mut nasty = AlwaysDefect;
        for round in 0..20 {
            assert_eq!(nice.decide(round, &[], &[], &[]), C);
            assert_eq!(nasty.decide(round, &[], &[], &[]), D);
        }
    }

    #[test]
    fn resolute_commits_once() {
        let mut agent = Resolute::with_rng(rng(11));
        let first = agent.decide(0, &[], &[], &[]);
        for round in 1..50 {
            assert_eq!(agent.decide(round, &[], &[], &[]), first);
        }
    }

    #[test]
    fn coin_flip_uses_both_actions() {
        let mut agent = CoinFlip::with_rng(rng(3));
        let mut seen = std::collections::HashSet::new();
        for round in 0..64 {
            seen.insert(agent.decide(round, &[], &[], &[]));
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn tit_for_tat_cooperates_first_then_mirrors() {
        let mut agent = TitForTat::with_rng(rng(5));
        assert_eq!(agent.decide(0, &[], &[], &[]), C);
        // Both opponents defected, so whichever is mirrored yields a defect.
        assert_eq!(agent.decide(1, &[C], &[D], &[D]), D);
        assert_eq!(agent.decide(1, &[C], &[C], &[C]), C);
    }

    #[test]
    fn anti_tit_for_tat_inverts_the_mirror() {
        let mut agent = AntiTitForTat::with_rng(rng(7));
        assert_eq!(agent.decide(0, &[], &[], &[]), C);
        assert_eq!(agent.decide(1, &[C], &[D], &[D]), C);
        assert_eq!(agent.decide(1, &[C], &[C], &[C]), D);
    }
}
