//! Agents whose cooperation ends (temporarily or not) when crossed

use crate::strategies::cooperations;
use crate::strategy::{Action, Strategy};

/// Grim trigger: one round in which *both* opponents defect flips this agent
/// into permanent defection.
#[derive(Clone, Copy, Debug, Default)]
pub struct GrimTrigger {
    triggered: bool,
}

impl GrimTrigger {
    /// Untriggered instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for GrimTrigger {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if opp1[round - 1] == Action::Defect && opp2[round - 1] == Action::Defect {
            self.triggered = true;
        }
        if self.triggered {
            Action::Defect
        } else {
            Action::Cooperate
        }
    }
}

/// Defects whenever *either* opponent defected in the previous round.
#[derive(Clone, Copy, Debug, Default)]
pub struct HairTrigger;

impl Strategy for HairTrigger {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if opp1[round - 1] == Action::Cooperate && opp2[round - 1] == Action::Cooperate {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }
}

/// Defects only when *both* opponents defected in the previous round.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairTrigger;

impl Strategy for PairTrigger {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if opp1[round - 1] == Action::Defect && opp2[round - 1] == Action::Defect {
            Action::Defect
        } else {
            Action::Cooperate
        }
    }
}

const GRUDGE_ROUNDS: usize = 3;
const MENDING_ROUNDS: usize = 1;

/// What [`GrudgeKeeper`] is currently doing.
///
/// Transitions:
/// - `Watching` → `Retaliating` on any observed defection (after the first,
///   observation-only round);
/// - `Retaliating { since }` holds for [`GRUDGE_ROUNDS`] rounds, then either
///   forgives (both opponents cooperated through most of the grudge window
///   *and* in the last round) into `Mending`, or restarts the grudge;
/// - `Mending` cooperates for [`MENDING_ROUNDS`] rounds to signal goodwill,
///   then returns to `Watching` with a clean slate.
#[derive(Clone, Copy, Debug)]
enum GrudgePhase {
    Watching,
    Retaliating { since: usize },
    Mending { remaining: usize },
}

/// Retaliates immediately, holds the grudge a few rounds, then probes whether
/// the opponents want to cooperate again.
#[derive(Clone, Copy, Debug)]
pub struct GrudgeKeeper {
    phase: GrudgePhase,
    defections_seen: usize,
}

impl GrudgeKeeper {
    /// Fresh instance with a clean slate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: GrudgePhase::Watching,
            defections_seen: 0,
        }
    }

    fn both_relented(round: usize, opp1: &[Action], opp2: &[Action]) -> bool {
        let window = round - GRUDGE_ROUNDS..round;
        let coop1 = cooperations(&opp1[window.clone()]);
        let coop2 = cooperations(&opp2[window]);
        coop1 > 1
            && coop2 > 1
            && opp1[round - 1] == Action::Cooperate
            && opp2[round - 1] == Action::Cooperate
    }
}

impl Default for GrudgeKeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for GrudgeKeeper {
    fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round > 0 {
            if opp1[round - 1] == Action::Defect {
                self.defections_seen += 1;
            }
            if opp2[round - 1] == Action::Defect {
                self.defections_seen += 1;
            }
        } else {
            // First round is observation only.
            return Action::Cooperate;
        }

        match self.phase {
            GrudgePhase::Mending { remaining } => {
                self.defections_seen = 0;
                self.phase = if remaining > 1 {
                    GrudgePhase::Mending {
                        remaining: remaining - 1,
                    }
                } else {
                    GrudgePhase::Watching
                };
                Action::Cooperate
            }
            GrudgePhase::Retaliating { since } if round == since + GRUDGE_ROUNDS + 1 => {
                if Self::both_relented(round, opp1, opp2) {
                    self.phase = GrudgePhase::Mending {
                        remaining: MENDING_ROUNDS,
                    };
                    self.defections_seen = 0;
                    Action::Cooperate
                } else {
                    self.phase = GrudgePhase::Retaliating { since: round };
                    Action::Defect
                }
            }
            GrudgePhase::Retaliating { .. } => Action::Defect,
            GrudgePhase::Watching => {
                if self.defections_seen > 0 {
                    self.phase = GrudgePhase::Retaliating { since: round };
                    Action::Defect
                } else {
                    Action::Cooperate
                }
            }
        }
    }
}

/// Cooperates while everyone behaves, defects forever after any betrayal, and
/// stops cooperating unconditionally near the end of a standard-length match.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndgameGrim;

/// Last round this agent is still willing to cooperate in.
const LAST_HONEST_ROUND: usize = 95;

impl Strategy for EndgameGrim {
    fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
        if round == 0 {
            return Action::Cooperate;
        }
        if round > LAST_HONEST_ROUND {
            return Action::Defect;
        }
        if own[round - 1] == Action::Cooperate
            && opp1[round - 1] == Action::Cooperate
            && opp2[round - 1] == Action::Cooperate
        {
            return Action::Cooperate;
        }
        if opp1.contains(&Action::Defect) || opp2.contains(&Action::Defect) {
            return Action::Defect;
        }
        Action::Cooperate
    }
}
