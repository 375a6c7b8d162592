//! # Dilemma Tournament
//!
//! A modular Rust crate for ranking decision-making strategies in a repeated
//! three-player Prisoner's Dilemma, via large round-robin tournaments
//! repeated over many independent trials.
//!
//! It provides:
//! - Match simulation for three simultaneous participants ([`match_sim`])
//! - Round-robin scheduling over every unordered strategy triple, duplicates
//!   included ([`scheduler`])
//! - Cross-trial rank aggregation into stable average rankings ([`ranking`])
//! - The [`Strategy`](strategy::Strategy) capability trait and a catalog of
//!   ready-made agents ([`strategies`])
//!
//! Each match seats exactly three freshly created strategy instances. Every
//! participant sees the game through its own seat: its history first, then
//! the next seat's, then the next-next seat's, in table order A→B→C→A. That
//! cyclic rotation is what keeps the three-player game symmetric.
//!
//! # Documentation Overview
//!
//! - For the end-to-end run lifecycle, see the [`evaluator`] module.
//! - For run parameters (trials, round-count range, verbosity, worker
//!   count), see [`Configuration`](crate::configuration::Configuration).
//! - For the reward table and its invariants, see [`payoff`].
//! - To write your own agent, implement
//!   [`Strategy`](crate::strategy::Strategy) and register it in a
//!   [`StrategyPool`](crate::pool::StrategyPool).
//!
//! # Usage Example
//!
//! Below is a minimal example ranking a hand-written agent against one from
//! the built-in catalog:
//!
//! ```
//! use dilemma_tournament::prelude::*;
//!
//! /// Cooperates until either opponent has defected twice in total.
//! struct Wary {
//!     seen_defections: usize,
//! }
//!
//! impl Strategy for Wary {
//!     fn decide(
//!         &mut self,
//!         round: usize,
//!         _own: &[Action],
//!         opp1: &[Action],
//!         opp2: &[Action],
//!     ) -> Action {
//!         if round > 0 {
//!             for history in [opp1, opp2] {
//!                 if history[round - 1] == Action::Defect {
//!                     self.seen_defections += 1;
//!                 }
//!             }
//!         }
//!         if self.seen_defections >= 2 {
//!             Action::Defect
//!         } else {
//!             Action::Cooperate
//!         }
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut pool = StrategyPool::new();
//!     pool.register("Wary", || Box::new(Wary { seen_defections: 0 }));
//!     pool.register("AlwaysDefect", || Box::new(strategies::AlwaysDefect));
//!
//!     let config = Configuration::new()
//!         .with_trials(3)
//!         .with_round_range(20, 30)
//!         .with_num_threads(1);
//!     let report = Evaluator::new(config).evaluate(&pool)?;
//!
//!     assert_eq!(report.standings.len(), 2);
//!     for standing in &report.standings {
//!         println!("{standing}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Determinism
//!
//! The engine itself is deterministic: triple enumeration is lexicographic
//! and ranking breaks exact score ties by lower pool index. Two things are
//! deliberately randomized — the per-match round count (so end-of-match
//! defection cannot be timed exactly) and whatever randomness individual
//! strategies use. Averaging ranks over many trials is what produces stable
//! output despite both.
#![warn(missing_docs)]

pub use anyhow;

pub mod configuration;
pub mod evaluator;
mod logger;
pub mod match_sim;
pub mod payoff;
pub mod pool;
pub mod ranking;
pub mod scheduler;
pub mod strategies;
pub mod strategy;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use dilemma_tournament::prelude::*;
/// ```
///
/// Includes:
/// - [`Configuration`](crate::configuration::Configuration)
/// - [`Evaluator`](crate::evaluator::Evaluator)
/// - [`StrategyPool`](crate::pool::StrategyPool)
/// - [`Action`](crate::strategy::Action) and
///   [`Strategy`](crate::strategy::Strategy)
/// - the [`strategies`](crate::strategies) catalog and
///   [`full_roster`](crate::strategies::full_roster)
pub mod prelude {
    pub use crate::configuration::Configuration;
    pub use crate::evaluator::Evaluator;
    pub use crate::payoff::PayoffTensor;
    pub use crate::pool::StrategyPool;
    pub use crate::ranking::TournamentReport;
    pub use crate::strategies::{self, full_roster};
    pub use crate::strategy::{Action, Strategy};
}
