//! Agents that watch the scoreboard rather than individual moves
//!
//! These agents re-derive payoffs from the histories through the standard
//! reward table. Running a pool of them against a custom table also works —
//! their judgment is simply calibrated to the standard one.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::payoff::PayoffTensor;
use crate::strategy::{Action, Strategy};

/// Sums each seat's payoffs so far, from that seat's own rotation.
fn running_scores(
    tensor: &PayoffTensor,
    own: &[Action],
    opp1: &[Action],
    opp2: &[Action],
) -> [f64; 3] {
    let mut scores = [0.0; 3];
    for ((&mine, &theirs1), &theirs2) in own.iter().zip(opp1).zip(opp2) {
        scores[0] += tensor.reward(mine, theirs1, theirs2);
        scores[1] += tensor.reward(theirs1, theirs2, mine);
        scores[2] += tensor.reward(theirs2, mine, theirs1);
    }
    scores
}

/// Win-stay, lose-shift.
///
/// Repeats its previous action when the previous round paid at least the
/// mutual-cooperation reward; otherwise switches.
#[derive(Clone, Copy, Debug)]
pub struct Pavlov {
    tensor: PayoffTensor,
}

impl Pavlov {
    /// Instance judging payoffs by the standard table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: PayoffTensor::standard(),
        }
    }

    fn satisfaction(&self) -> f64 {
        use Action::Cooperate as C;
        self.tensor.reward(C, C, C)
    }
}

impl Default for Pavlov {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Pavlov {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let last = round - 1;
        let reward = self.tensor.reward(own[last], opp1[last], opp2[last]);
        if reward >= self.satisfaction() {
            own[last]
        } else {
            own[last].opposite()
        }
    }
}

/// Cooperates exactly as long as it is not losing.
///
/// Tracks all three running totals; the round after falling behind either
/// opponent it starts defecting, and relents once it is back in front.
#[derive(Clone, Copy, Debug)]
pub struct Frontrunner {
    tensor: PayoffTensor,
}

impl Frontrunner {
    /// Instance judging payoffs by the standard table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: PayoffTensor::standard(),
        }
    }
}

impl Default for Frontrunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Frontrunner {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let [mine, theirs1, theirs2] = running_scores(&self.tensor, own, opp1, opp2);
        if mine >= theirs1 && mine >= theirs2 {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Classifies its opponents before deciding how to treat them.
///
/// In order: tolerate a short opening, punish a table where both opponents
/// defected twice in a row, write off anyone who has never cooperated or
/// whose move distribution looks like a coin flip, defect while behind on
/// score, and otherwise fall back to randomized tit-for-tat.
#[derive(Debug)]
pub struct Profiler {
    tensor: PayoffTensor,
    rng: SmallRng,
}

impl Profiler {
    /// How close to 50/50 a move distribution must be to look random.
    const RANDOMNESS_MARGIN: f64 = 0.025;

    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            tensor: PayoffTensor::standard(),
            rng,
        }
    }

    fn never_cooperated(history: &[Action]) -> bool {
        !history.is_empty() && history.iter().all(|&a| a == Action::Defect)
    }

    fn looks_random(history: &[Action]) -> bool {
        let rate = super::defections(history) as f64 / history.len() as f64;
        (rate - 0.5).abs() < Self::RANDOMNESS_MARGIN
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Profiler {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round < 2 {
            return Action::Cooperate;
        }
        let last = round - 1;

        let both_defected_twice = opp1[last] == Action::Defect
            && opp1[last - 1] == Action::Defect
            && opp2[last] == Action::Defect
            && opp2[last - 1] == Action::Defect;
        if both_defected_twice {
            return Action::Defect;
        }

        if Self::never_cooperated(opp1) || Self::never_cooperated(opp2) {
            return Action::Defect;
        }
        if Self::looks_random(opp1) || Self::looks_random(opp2) {
            return Action::Defect;
        }

        let [mine, theirs1, theirs2] = running_scores(&self.tensor, own, opp1, opp2);
        if mine < theirs1 || mine < theirs2 {
            return Action::Defect;
        }

        if self.rng.gen_bool(0.5) {
            opp1[last]
        } else {
            opp2[last]
        }
    }
}

/// Defensive score-keeper that stays slightly unpredictable.
///
/// Cooperates in a demonstrably cooperative table and defects late in the
/// match against opponents that have been unfriendly; in all other spots it
/// cooperates only while leading. Every intended action is flipped with 1%
/// probability so the agent cannot be predicted exactly.
#[derive(Debug)]
pub struct Stalwart {
    tensor: PayoffTensor,
    rng: SmallRng,
}

impl Stalwart {
    const LENIENT_THRESHOLD: f64 = 0.705;
    const STRICT_THRESHOLD: f64 = 0.750;
    const ENDGAME_ROUND: usize = 90;
    const INTENT_PROB: f64 = 0.99;

    /// Entropy-seeded instance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Instance with an injected stream.
    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            tensor: PayoffTensor::standard(),
            rng,
        }
    }

    fn with_noise(&mut self, intended: Action) -> Action {
        if self.rng.gen_bool(Self::INTENT_PROB) {
            intended
        } else {
            intended.opposite()
        }
    }
}

impl Default for Stalwart {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Stalwart {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let last = round - 1;
        let coop1 = super::cooperation_ratio(opp1);
        let coop2 = super::cooperation_ratio(opp2);

        // Late game against an unfriendly table: protect the score.
        if round > Self::ENDGAME_ROUND
            && coop1 < Self::STRICT_THRESHOLD
            && coop2 < Self::STRICT_THRESHOLD
        {
            return self.with_noise(Action::Defect);
        }

        // A cooperative table is rewarded, noisily.
        if opp1[last] == Action::Cooperate
            && opp2[last] == Action::Cooperate
            && coop1 > Self::LENIENT_THRESHOLD
            && coop2 > Self::LENIENT_THRESHOLD
        {
            return self.with_noise(Action::Cooperate);
        }

        // Otherwise: cooperate from the front, drag everyone down from behind.
        let [mine, theirs1, theirs2] = running_scores(&self.tensor, own, opp1, opp2);
        if mine >= theirs1 && mine >= theirs2 {
            Action::Cooperate
        } else {
            Action::Defect
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
    fn pavlov_stays_after_a_good_round() {
        let mut agent = Pavlov::new();
        // Mutual cooperation pays 6: stay with cooperate.
        assert_eq!(agent.decide(1, &[C], &[C], &[C]), C);
        // Exploiting two cooperators pays 8: stay with defect.
        assert_eq!(agent.decide(1, &[D], &[C], &[C]), D);
    }

    #[test]
    fn pavlov_switches_after_a_bad_round() {
        let mut agent = Pavlov::new();
        // Being the lone cooperator pays 0: switch to defect.
        assert_eq!(agent.decide(1, &[C], &[D], &[D]), D);
        // Mutual defection pays 2: switch to cooperate.
        assert_eq!(agent.decide(1, &[D], &[D], &[D]), C);
    }

    #[test]
    fn frontrunner_cooperates_while_leading() {
        let mut agent = Frontrunner::new();
        assert_eq!(agent.decide(0, &[], &[], &[]), C);
        // It defected into two cooperators: 8 vs 3 and 3. Leading, so nice.
        assert_eq!(agent.decide(1, &[D], &[C], &[C]), C);
        // It was the lone cooperator: 0 vs 5 and 5. Behind, so defect.
        assert_eq!(agent.decide(1, &[C], &[D], &[D]), D);
    }

    #[test]
    fn profiler_writes_off_pure_defectors() {
        let mut agent = Profiler::with_rng(rng(1));
        assert_eq!(agent.decide(2, &[C, C], &[D, C], &[D, D]), D);
    }

    #[test]
    fn profiler_punishes_two_clean_sweeps() {
        let mut agent = Profiler::with_rng(rng(2));
        assert_eq!(agent.decide(3, &[C, C, C], &[C, D, D], &[C, D, D]), D);
    }

    #[test]
    fn profiler_writes_off_coin_flippers() {
        let mut agent = Profiler::with_rng(rng(6));
        // Opponent 1's history is a perfect 50/50 split.
        assert_eq!(agent.decide(2, &[C, C], &[C, D], &[C, C]), D);
    }

    #[test]
    fn profiler_mirrors_a_cooperative_table() {
        let mut agent = Profiler::with_rng(rng(3));
        // Everyone has been clean: all laws pass, tit-for-tat mirrors a C.
        assert_eq!(agent.decide(3, &[C, C, C], &[C, C, C], &[C, C, C]), C);
    }

    #[test]
    fn stalwart_defects_late_against_hostiles() {
        let mut agent = Stalwart::with_rng(rng(4));
        let own = vec![C; 95];
        let hostile = vec![D; 95];
        // 1% noise: across many draws the dominant action must be defect.
        let defects = (0..100)
            .filter(|_| agent.decide(95, &own, &hostile, &hostile) == D)
            .count();
        assert!(defects > 90, "defected only {defects}/100 times");
    }

    #[test]
    fn stalwart_rewards_a_cooperative_table() {
        let mut agent = Stalwart::with_rng(rng(5));
        let clean = vec![C; 10];
        let coops = (0..100)
            .filter(|_| agent.decide(10, &clean, &clean, &clean) == C)
            .count();
        assert!(coops > 90, "cooperated only {coops}/100 times");
    }
}
