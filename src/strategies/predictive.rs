//! Agents that model their opponents before answering them

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::payoff::PayoffTensor;
use crate::strategies::{cooperation_ratio, cooperations, defections};
use crate::strategy::{Action, Strategy};

/// Defects only once the table has been more hostile than friendly.
///
/// Counts every action both opponents have ever played and defects when the
/// defections outnumber the cooperations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tolerant;

impl Strategy for Tolerant {
    fn decide(&mut self, _: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        let coop = cooperations(opp1) + cooperations(opp2);
        let defect = defections(opp1) + defections(opp2);
        if defect > coop {
            Action::Defect
        } else {
            Action::Cooperate
        }
    }
}

/// Best-responds to each opponent's majority move.
///
/// Each opponent is predicted to repeat whatever they have played more than
/// half the time; the agent then plays whichever of its own actions the
/// reward table prefers against that prediction.
#[derive(Clone, Copy, Debug)]
pub struct MajorityPredictor {
    tensor: PayoffTensor,
}

impl MajorityPredictor {
    /// Instance best-responding under the standard table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: PayoffTensor::standard(),
        }
    }

    fn predict(round: usize, history: &[Action]) -> Action {
        if cooperations(history) > round / 2 {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

impl Default for MajorityPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for MajorityPredictor {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        let predicted1 = Self::predict(round, opp1);
        let predicted2 = Self::predict(round, opp2);
        let coop = self.tensor.reward(Action::Cooperate, predicted1, predicted2);
        let defect = self.tensor.reward(Action::Defect, predicted1, predicted2);
        if coop > defect {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Maximizes expected payoff against the empirical move distributions.
///
/// Treats each opponent's history as an independent distribution over the two
/// actions and plays whichever action has the higher expected reward. Ties go
/// to defection, as does the empty first round — in any table satisfying the
/// dilemma ordering, defection dominates pointwise, so no prior could favor
/// cooperation there.
#[derive(Clone, Copy, Debug)]
pub struct UtilityMaximizer {
    tensor: PayoffTensor,
}

impl UtilityMaximizer {
    /// Instance maximizing under the standard table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: PayoffTensor::standard(),
        }
    }

    fn expected_utility(&self, action: Action, coop1: f64, coop2: f64) -> f64 {
        use Action::{Cooperate as C, Defect as D};
        let mut utility = 0.0;
        for (theirs1, p1) in [(C, coop1), (D, 1.0 - coop1)] {
            for (theirs2, p2) in [(C, coop2), (D, 1.0 - coop2)] {
                utility += p1 * p2 * self.tensor.reward(action, theirs1, theirs2);
            }
        }
        utility
    }
}

impl Default for UtilityMaximizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for UtilityMaximizer {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Defect;
        }
        let coop1 = cooperation_ratio(opp1);
        let coop2 = cooperation_ratio(opp2);
        let coop = self.expected_utility(Action::Cooperate, coop1, coop2);
        let defect = self.expected_utility(Action::Defect, coop1, coop2);
        if coop > defect {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Average payoff per seat so far, each seat scored from its own rotation.
fn average_scores(
    tensor: &PayoffTensor,
    own: &[Action],
    opp1: &[Action],
    opp2: &[Action],
) -> [f64; 3] {
    let rounds = own.len();
    let mut scores = [0.0; 3];
    for ((&mine, &theirs1), &theirs2) in own.iter().zip(opp1).zip(opp2) {
        scores[0] += tensor.reward(mine, theirs1, theirs2);
        scores[1] += tensor.reward(theirs1, theirs2, mine);
        scores[2] += tensor.reward(theirs2, mine, theirs1);
    }
    scores.map(|score| score / rounds as f64)
}

/// Switches between its two component agents depending on the scoreboard.
///
/// While every opponent is doing at least as well as this agent, it trusts
/// the expected-utility model; as soon as someone falls behind it (a sign the
/// model is being gamed), it switches to majority best-response. A derived
/// behavior built by delegation over [`UtilityMaximizer`] and
/// [`MajorityPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveUtility {
    tensor: PayoffTensor,
    utility: UtilityMaximizer,
    majority: MajorityPredictor,
}

impl AdaptiveUtility {
    /// Instance with both component agents under the standard table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: PayoffTensor::standard(),
            utility: UtilityMaximizer::new(),
            majority: MajorityPredictor::new(),
        }
    }
}

impl Default for AdaptiveUtility {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for AdaptiveUtility {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return self.utility.decide(round, own, opp1, opp2);
        }
        let [mine, theirs1, theirs2] = average_scores(&self.tensor, own, opp1, opp2);
        if theirs1 < mine || theirs2 < mine {
            self.majority.decide(round, own, opp1, opp2)
        } else {
            self.utility.decide(round, own, opp1, opp2)
        }
    }
}

/// Cooperates with a mostly-nice table, defects against a mostly-nasty one,
/// and lets [`AdaptiveUtility`] arbitrate the mixed case.
#[derive(Clone, Copy, Debug)]
pub struct DefectRateGate {
    fallback: AdaptiveUtility,
}

impl DefectRateGate {
    /// Fresh instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback: AdaptiveUtility::new(),
        }
    }
}

impl Default for DefectRateGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for DefectRateGate {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let half = round / 2;
        let hostile1 = defections(opp1) > half;
        let hostile2 = defections(opp2) > half;
        match (hostile1, hostile2) {
            (false, false) => Action::Cooperate,
            (true, true) => Action::Defect,
            _ => self.fallback.decide(round, own, opp1, opp2),
        }
    }
}

/// Tracks long-run defection probabilities and guards accordingly.
///
/// Cooperates while both opponents look reliably friendly, defects once
/// either looks reliably hostile *and* just defected, and otherwise punishes
/// any defection seen in the last two rounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sentinel;

impl Sentinel {
    const FRIENDLY_THRESHOLD: f64 = 0.850;
    const DEFENSIVE_THRESHOLD: f64 = 0.750;

    /// Fresh instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Sentinel {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        let last = round - 1;
        let defect_prob1 = defections(opp1) as f64 / round as f64;
        let defect_prob2 = defections(opp2) as f64 / round as f64;
        let coop_prob1 = 1.0 - defect_prob1;
        let coop_prob2 = 1.0 - defect_prob2;

        if coop_prob1 >= Self::FRIENDLY_THRESHOLD
            && coop_prob2 >= Self::FRIENDLY_THRESHOLD
            && opp1[last] == Action::Cooperate
            && opp2[last] == Action::Cooperate
        {
            Action::Cooperate
        } else if (defect_prob1 >= Self::DEFENSIVE_THRESHOLD
            || defect_prob2 >= Self::DEFENSIVE_THRESHOLD)
            && (opp1[last] == Action::Defect || opp2[last] == Action::Defect)
        {
            Action::Defect
        } else if round >= 2 {
            let recent_defection = opp1[round - 2..round]
                .iter()
                .chain(&opp2[round - 2..round])
                .any(|&a| a == Action::Defect);
            if recent_defection {
                Action::Defect
            } else {
                Action::Cooperate
            }
        } else {
            Action::Cooperate
        }
    }
}

/// Mirrors an agreeing table, judges a split one, and defects at the death.
///
/// When both opponents played the same move last round there is a consensus
/// to echo. When they split, the agent falls back to a tolerance count over
/// the full histories. The last stretch of a standard-length match is always
/// defection.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsensusMirror;

/// First round of the final all-defect stretch.
const FINAL_STRETCH: usize = 99;

impl Strategy for ConsensusMirror {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if round >= FINAL_STRETCH {
            return Action::Defect;
        }
        if opp1[round - 1] == opp2[round - 1] {
            return opp1[round - 1];
        }
        let balance1 = cooperations(opp1) as i64 - defections(opp1) as i64;
        let balance2 = cooperations(opp2) as i64 - defections(opp2) as i64;
        if balance1 >= 0 && balance2 >= 0 {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Echoes consensus, otherwise stays the course.
///
/// Mirrors the opponents when they agreed last round and repeats its own last
/// move when they split.
#[derive(Clone, Copy, Debug, Default)]
pub struct Concordant;

impl Strategy for Concordant {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if opp1[round - 1] == opp2[round - 1] {
            opp1[round - 1]
        } else {
            own[round - 1]
        }
    }
}

/// Cooperates only with the consistently cooperative, and still stabs them at
/// the end.
///
/// While both opponents have cooperated more than 90% of the time, this agent
/// plays along — until a randomly drawn round in the 95..=100 window, after
/// which it defects to bank the difference. Any less cooperative table is
/// defected against outright.
#[derive(Debug)]
pub struct FairWeather {
    rng: SmallRng,
}

impl FairWeather {
    const FRIENDLY_RATIO: f64 = 0.9;
    const ENDGAME_BASE: usize = 90;

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

impl Default for FairWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for FairWeather {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if cooperation_ratio(opp1) > Self::FRIENDLY_RATIO
            && cooperation_ratio(opp2) > Self::FRIENDLY_RATIO
        {
            let cutoff = Self::ENDGAME_BASE + self.rng.gen_range(5..=10);
            if round > cutoff {
                Action::Defect
            } else {
                Action::Cooperate
            }
        } else {
            Action::Defect
        }
    }
}
