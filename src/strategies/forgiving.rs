//! Mirroring agents that leave room for reconciliation

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::strategies::defections;
use crate::strategy::{Action, Strategy};

/// Tit-for-tat with a patience budget.
///
/// Each round one opponent is picked at random. Their last move is mirrored
/// until their total defection count reaches the forgiveness threshold; past
/// that the agent retaliates outright.
#[derive(Debug)]
pub struct ForgivingTitForTat {
    rng: SmallRng,
    threshold: usize,
}

impl ForgivingTitForTat {
    const DEFAULT_THRESHOLD: usize = 10;

    /// Entropy-seeded instance with the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Overrides how many defections are tolerated before retaliating.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for ForgivingTitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for ForgivingTitForTat {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let watched = if self.rng.gen_bool(0.5) { opp1 } else { opp2 };
        if defections(watched) >= self.threshold {
            Action::Defect
        } else {
            watched[round - 1]
        }
    }
}

/// Tit-for-tat that cooperates with a drifting probability.
///
/// The cooperation probability starts at 0.9 and moves by 0.1 after each
/// observed move of a randomly picked opponent — up on cooperation (capped at
/// 1.0), down on defection (floored at 0.5, so the agent never turns fully
/// hostile).
#[derive(Debug)]
pub struct GenerousTitForTat {
    rng: SmallRng,
    cooperation_prob: f64,
}

impl GenerousTitForTat {
    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            cooperation_prob: 0.9,
        }
    }
}

impl Default for GenerousTitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for GenerousTitForTat {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let watched = if self.rng.gen_bool(0.5) { opp1 } else { opp2 };
        self.cooperation_prob = match watched[round - 1] {
            Action::Cooperate => (self.cooperation_prob + 0.1).min(1.0),
            Action::Defect => (self.cooperation_prob - 0.1).max(0.5),
        };
        if self.rng.gen_bool(self.cooperation_prob) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// A mimic that reacts to betrayal probabilistically.
///
/// Watches one random opponent per round. Cooperation is mimicked; a
/// defection is forgiven with a small probability (in which case the agent
/// merely flips a biased coin), otherwise it is answered with a likely
/// defection.
#[derive(Debug)]
pub struct FickleMimic {
    rng: SmallRng,
}

impl FickleMimic {
    const FORGIVENESS_PROB: f64 = 0.2;
    const COOPERATION_PROB: f64 = 0.5;
    const DEFECTION_PROB: f64 = 0.8;

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

impl Default for FickleMimic {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for FickleMimic {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let watched = if self.rng.gen_bool(0.5) { opp1 } else { opp2 };
        match watched[round - 1] {
            Action::Cooperate => Action::Cooperate,
            Action::Defect => {
                if self.rng.gen_bool(Self::FORGIVENESS_PROB) {
                    if self.rng.gen_bool(Self::COOPERATION_PROB) {
                        Action::Cooperate
                    } else {
                        Action::Defect
                    }
                } else if self.rng.gen_bool(Self::DEFECTION_PROB) {
                    Action::Defect
                } else {
                    Action::Cooperate
                }
            }
        }
    }
}

/// Judges the table on the last two rounds, with a sliver of mercy.
///
/// A clean recent window keeps it cooperative unless either opponent's
/// lifetime defection rate has crept above the tolerance, in which case it
/// defects — except for a small forgiveness chance. Any defection in the last
/// two rounds means immediate defection.
#[derive(Debug)]
pub struct ShortMemory {
    rng: SmallRng,
}

impl ShortMemory {
    const DEFECT_TOLERANCE: f64 = 0.1;
    const FORGIVENESS_PROB: f64 = 0.1;

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

impl Default for ShortMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for ShortMemory {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if round == 1 {
            return if opp1[0] == Action::Cooperate && opp2[0] == Action::Cooperate {
                Action::Cooperate
            } else {
                Action::Defect
            };
        }

        let recent_clean = opp1[round - 2..round]
            .iter()
            .chain(&opp2[round - 2..round])
            .all(|&a| a == Action::Cooperate);
        if !recent_clean {
            return Action::Defect;
        }

        let rate1 = defections(opp1) as f64 / round as f64;
        let rate2 = defections(opp2) as f64 / round as f64;
        if rate1 > Self::DEFECT_TOLERANCE || rate2 > Self::DEFECT_TOLERANCE {
            if self.rng.gen_bool(Self::FORGIVENESS_PROB) {
                Action::Cooperate
            } else {
                Action::Defect
            }
        } else {
            Action::Cooperate
        }
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
    fn forgiving_tft_mirrors_below_the_threshold() {
        let mut agent = ForgivingTitForTat::with_rng(rng(1)).with_threshold(10);
        assert_eq!(agent.decide(0, &[], &[], &[]), C);
        // Both opponents cooperated last; nobody is near the threshold.
        assert_eq!(agent.decide(2, &[C, C], &[D, C], &[C, C]), C);
    }

    #[test]
    fn forgiving_tft_retaliates_past_the_threshold() {
        let mut agent = ForgivingTitForTat::with_rng(rng(2)).with_threshold(3);
        // Both opponents are far past a 3-defection budget; the random pick
        // does not matter.
        let hostile = [D, D, D, D, C];
        assert_eq!(agent.decide(5, &[C; 5], &hostile, &hostile), D);
    }

    #[test]
    fn generous_tft_saturates_against_constant_cooperation() {
        let mut agent = GenerousTitForTat::with_rng(rng(3));
        let mut history = Vec::new();
        for round in 1..=20 {
            history.push(C);
            agent.decide(round, &vec![C; round], &history, &history);
        }
        assert_eq!(agent.cooperation_prob, 1.0);
        // From now on it cooperates with certainty.
        for _ in 0..10 {
            assert_eq!(agent.decide(21, &[C; 21], &vec![C; 21], &vec![C; 21]), C);
        }
    }

    #[test]
    fn generous_tft_probability_never_drops_below_half() {
        let mut agent = GenerousTitForTat::with_rng(rng(4));
        let hostile = vec![D; 30];
        for round in 1..=30 {
            agent.decide(round, &vec![C; round], &hostile[..round], &hostile[..round]);
        }
        assert_eq!(agent.cooperation_prob, 0.5);
    }

    #[test]
    fn fickle_mimic_mimics_cooperation() {
        let mut agent = FickleMimic::with_rng(rng(5));
        for _ in 0..20 {
            assert_eq!(agent.decide(1, &[C], &[C], &[C]), C);
        }
    }

    #[test]
    fn short_memory_defects_on_recent_betrayal() {
        let mut agent = ShortMemory::with_rng(rng(6));
        assert_eq!(agent.decide(2, &[C, C], &[C, D], &[C, C]), D);
    }

    #[test]
    fn short_memory_rides_a_clean_table() {
        let mut agent = ShortMemory::with_rng(rng(7));
        assert_eq!(agent.decide(0, &[], &[], &[]), C);
        assert_eq!(agent.decide(1, &[C], &[C], &[C]), C);
        assert_eq!(agent.decide(4, &[C; 4], &[C; 4], &[C; 4]), C);
    }
}
