//! Ready-made strategy catalog
//!
//! Every agent here only implements [`Strategy`](crate::strategy::Strategy);
//! none of them owns any engine logic. They range from the four classics
//! (always-cooperate, always-defect, coin flip, tit-for-tat) to scoring-based
//! switchers that track the running payoffs of all three seats.
//!
//! Agents that need randomness own a [`SmallRng`](rand::rngs::SmallRng)
//! injected at construction (`with_rng`) or seeded from entropy (`new`), so
//! two instances never share a stream. Derived behaviors (e.g.
//! [`DefectRateGate`] falling back to [`AdaptiveUtility`]) hold the base
//! strategy as a field and delegate to it instead of inheriting from it.

mod basic;
mod forgiving;
mod predictive;
mod retaliatory;
mod scoring;

pub use basic::{AlwaysCooperate, AlwaysDefect, AntiTitForTat, CoinFlip, Resolute, TitForTat};
pub use forgiving::{FickleMimic, ForgivingTitForTat, GenerousTitForTat, ShortMemory};
pub use predictive::{
    AdaptiveUtility, Concordant, ConsensusMirror, DefectRateGate, FairWeather,
    MajorityPredictor, Sentinel, Tolerant, UtilityMaximizer,
};
pub use retaliatory::{EndgameGrim, GrimTrigger, GrudgeKeeper, HairTrigger, PairTrigger};
pub use scoring::{Frontrunner, Pavlov, Profiler, Stalwart};

use crate::pool::StrategyPool;
use crate::strategy::Action;

/// Registers the whole catalog, in its historical pool order.
#[must_use]
pub fn full_roster() -> StrategyPool {
    let mut pool = StrategyPool::new();
    pool.register("AlwaysCooperate", || Box::new(AlwaysCooperate));
    pool.register("AlwaysDefect", || Box::new(AlwaysDefect));
    pool.register("CoinFlip", || Box::new(CoinFlip::new()));
    pool.register("Resolute", || Box::new(Resolute::new()));
    pool.register("Tolerant", || Box::new(Tolerant));
    pool.register("TitForTat", || Box::new(TitForTat::new()));
    pool.register("AntiTitForTat", || Box::new(AntiTitForTat::new()));
    pool.register("Pavlov", || Box::new(Pavlov::new()));
    pool.register("GrimTrigger", || Box::new(GrimTrigger::new()));
    pool.register("HairTrigger", || Box::new(HairTrigger));
    pool.register("PairTrigger", || Box::new(PairTrigger));
    pool.register("ForgivingTitForTat", || Box::new(ForgivingTitForTat::new()));
    pool.register("GenerousTitForTat", || Box::new(GenerousTitForTat::new()));
    pool.register("FickleMimic", || Box::new(FickleMimic::new()));
    pool.register("ShortMemory", || Box::new(ShortMemory::new()));
    pool.register("GrudgeKeeper", || Box::new(GrudgeKeeper::new()));
    pool.register("EndgameGrim", || Box::new(EndgameGrim));
    pool.register("Sentinel", || Box::new(Sentinel::new()));
    pool.register("Frontrunner", || Box::new(Frontrunner::new()));
    pool.register("Profiler", || Box::new(Profiler::new()));
    pool.register("Stalwart", || Box::new(Stalwart::new()));
    pool.register("MajorityPredictor", || Box::new(MajorityPredictor::new()));
    pool.register("UtilityMaximizer", || Box::new(UtilityMaximizer::new()));
    pool.register("AdaptiveUtility", || Box::new(AdaptiveUtility::new()));
    pool.register("DefectRateGate", || Box::new(DefectRateGate::new()));
    pool.register("ConsensusMirror", || Box::new(ConsensusMirror));
    pool.register("Concordant", || Box::new(Concordant));
    pool.register("FairWeather", || Box::new(FairWeather::new()));
    pool
}

pub(crate) fn defections(history: &[Action]) -> usize {
    history.iter().filter(|&&a| a == Action::Defect).count()
}

pub(crate) fn cooperations(history: &[Action]) -> usize {
    history.len() - defections(history)
}

/// Fraction of cooperative moves; `0.0` for an empty history.
pub(crate) fn cooperation_ratio(history: &[Action]) -> f64 {
    if history.is_empty() {
        0.0
    } else {
        cooperations(history) as f64 / history.len() as f64
    }
}
