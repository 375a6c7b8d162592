//! Core evaluation logic for running tournaments.
//!
//! This module defines the [`Evaluator`] type, which orchestrates a full run.
//! Its responsibilities include:
//!
//! - Validating the [`Configuration`] and the [`StrategyPool`] before any
//!   trial executes
//! - Dispatching independent trials onto worker threads
//! - Reducing per-trial rankings into the final [`TournamentReport`]
//!
//! # Behavior & Configuration
//!
//! Every trial re-runs the full round-robin from scratch: fresh strategy
//! instances, freshly drawn round counts, its own random stream. Trials only
//! meet again at the rank-sum accumulator, which lives on the calling thread;
//! worker threads hand their results over an mpsc channel instead of sharing
//! it. With `num_threads = 1` the run is fully sequential.
//!
//! # Example
//!
//! ```no_run
//! use dilemma_tournament::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let pool = full_roster();
//!     let config = Configuration::new().with_trials(100);
//!     let report = Evaluator::new(config).evaluate(&pool)?;
//!
//!     for standing in &report.standings {
//!         println!("{standing}");
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc;

use anyhow::{bail, Context};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, instrument, trace};

use crate::configuration::Configuration;
use crate::logger::init_logger;
use crate::payoff::PayoffTensor;
use crate::pool::StrategyPool;
use crate::ranking::{rank_order, RankAggregator, TournamentReport};
use crate::scheduler::{PassResult, RoundRobinScheduler};

/// The main type for ranking strategies against each other.
///
/// It validates the run parameters, plays every trial, and collects the
/// cross-trial average ranks.
pub struct Evaluator {
    config: Configuration,
    tensor: PayoffTensor,
}

impl Evaluator {
    /// Create an [`Evaluator`] with the given [`Configuration`] and the
    /// standard payoff table.
    #[instrument(skip_all)]
    pub fn new(config: Configuration) -> Evaluator {
        if config.log {
            init_logger();
        }
        trace!(?config);

        Evaluator {
            config,
            tensor: PayoffTensor::standard(),
        }
    }

    /// Replaces the payoff table, e.g. one built with
    /// [`PayoffTensor::checked`](crate::payoff::PayoffTensor::checked).
    #[must_use]
    pub fn with_payoff(mut self, tensor: PayoffTensor) -> Self {
        self.tensor = tensor;
        self
    }

    /// Runs all configured trials over `pool` and returns the report.
    ///
    /// # Errors
    ///
    /// Configuration errors (empty pool, zero trials, empty round range) are
    /// reported before any trial executes. A strategy contract violation
    /// aborts the run with the offending pool index, round and triple in the
    /// error chain; no partial report is returned.
    pub fn evaluate(&self, pool: &StrategyPool) -> anyhow::Result<TournamentReport> {
        self.config.validate()?;
        if pool.is_empty() {
            bail!("strategy pool is empty: register at least one strategy before evaluating");
        }

        let trials = self.config.trials;
        let workers = self.config.worker_count();
        let scheduler = RoundRobinScheduler::new(
            self.config.min_rounds,
            self.config.max_rounds,
            self.config.verbose,
        );
        info!(
            pool_size = pool.len(),
            trials,
            workers,
            matches_per_trial = RoundRobinScheduler::match_count(pool.len()),
            "starting run"
        );

        let mut aggregator = RankAggregator::new(pool.len());
        let mut trial_orders: Vec<Vec<usize>> = vec![Vec::new(); trials as usize];
        let mut matches = if self.config.verbose {
            vec![Vec::new(); trials as usize]
        } else {
            Vec::new()
        };

        // Shared run state must outlive the scope: spawned workers borrow it
        // until the implicit join.
        let (tx_result, rx_result) = mpsc::channel();
        let next_trial = AtomicU32::new(0);
        let abort = AtomicBool::new(false);
        let tensor = &self.tensor;

        std::thread::scope(|scope| -> anyhow::Result<()> {
            for worker in 0..workers {
                let tx_result = tx_result.clone();
                let next_trial = &next_trial;
                let abort = &abort;
                scope.spawn(move || {
                    // Each worker owns its stream; trials never share one.
                    let mut rng = SmallRng::from_entropy();
                    loop {
                        let trial = next_trial.fetch_add(1, Ordering::Relaxed);
                        if trial >= trials || abort.load(Ordering::Relaxed) {
                            break;
                        }
                        trace!(worker, trial, "trial start");
                        let result = scheduler
                            .run_pass(pool, tensor, &mut rng)
                            .with_context(|| format!("trial {trial} failed"));
                        let failed = result.is_err();
                        if tx_result.send((trial, result)).is_err() || failed {
                            break;
                        }
                    }
                });
            }
            drop(tx_result);

            // The rank sums are the only cross-trial state; reducing here
            // keeps them on a single thread.
            for _ in 0..trials {
                let (trial, result) = rx_result
                    .recv()
                    .expect("a worker disconnected without reporting a result");
                let pass: PassResult = match result {
                    Ok(pass) => pass,
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        return Err(e);
                    }
                };
                let order = rank_order(&pass.totals);
                aggregator.record_trial(&order);
                trial_orders[trial as usize] = order;
                if self.config.verbose {
                    matches[trial as usize] = pass.matches;
                }
            }
            Ok(())
        })?;

        let standings = aggregator.into_standings(&pool.names());
        info!(?standings, "run finished");
        Ok(TournamentReport {
            trials,
            trial_orders,
            standings,
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Action, Strategy};

    struct Fixed(Action);

    impl Strategy for Fixed {
        fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
            self.0
        }
    }

    struct Faulty;

    impl Strategy for Faulty {
        fn decide(&mut self, round: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
            assert!(round < 2, "no plan for round {round}");
            Action::Cooperate
        }
    }

    fn evaluator(trials: u32) -> Evaluator {
        Evaluator::new(
            Configuration::new()
                .with_trials(trials)
                .with_round_range(10, 10)
                .with_num_threads(1),
        )
    }

    #[test]
    fn empty_pool_is_a_configuration_error() {
        let err = evaluator(1).evaluate(&StrategyPool::new()).unwrap_err();
        assert!(err.to_string().contains("pool is empty"));
    }

    #[test]
    fn invalid_configuration_is_rejected_before_running() {
        let mut pool = StrategyPool::new();
        pool.register("AlwaysCooperate", || Box::new(Fixed(Action::Cooperate)));
        let evaluator = Evaluator::new(Configuration::new().with_trials(0));
        assert!(evaluator.evaluate(&pool).is_err());
    }

    #[test]
    fn deterministic_pool_ranks_identically_every_trial() {
        let mut pool = StrategyPool::new();
        pool.register("AlwaysCooperate", || Box::new(Fixed(Action::Cooperate)));
        pool.register("AlwaysDefect", || Box::new(Fixed(Action::Defect)));
        pool.register("AlsoCooperates", || Box::new(Fixed(Action::Cooperate)));

        let report = evaluator(8).evaluate(&pool).unwrap();
        assert_eq!(report.trials, 8);
        assert_eq!(report.trial_orders.len(), 8);
        for order in &report.trial_orders {
            assert_eq!(order, &report.trial_orders[0]);
        }
        for standing in &report.standings {
            assert!((1.0..=3.0).contains(&standing.average_rank));
            assert_eq!(standing.average_rank.fract(), 0.0);
        }
    }

    #[test]
    fn contract_violation_aborts_the_run() {
        let mut pool = StrategyPool::new();
        pool.register("AlwaysCooperate", || Box::new(Fixed(Action::Cooperate)));
        pool.register("Faulty", || Box::new(Faulty));
        let err = evaluator(3).evaluate(&pool).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("pool index 1"), "{chain}");
        assert!(chain.contains("round 2"), "{chain}");
    }

    #[test]
    fn verbose_runs_carry_match_records() {
        let mut pool = StrategyPool::new();
        pool.register("AlwaysCooperate", || Box::new(Fixed(Action::Cooperate)));
        pool.register("AlwaysDefect", || Box::new(Fixed(Action::Defect)));
        let config = Configuration::new()
            .with_trials(2)
            .with_round_range(10, 10)
            .with_num_threads(1)
            .with_verbose(true);
        let report = Evaluator::new(config).evaluate(&pool).unwrap();
        assert_eq!(report.matches.len(), 2);
        for trial in &report.matches {
            assert_eq!(trial.len(), RoundRobinScheduler::match_count(2));
        }
    }

    #[test]
    fn parallel_and_sequential_agree_on_deterministic_pools() {
        let mut pool = StrategyPool::new();
        pool.register("AlwaysCooperate", || Box::new(Fixed(Action::Cooperate)));
        pool.register("AlwaysDefect", || Box::new(Fixed(Action::Defect)));

        let sequential = evaluator(4).evaluate(&pool).unwrap();
        let config = Configuration::new()
            .with_trials(4)
            .with_round_range(10, 10)
            .with_num_threads(4);
        let parallel = Evaluator::new(config).evaluate(&pool).unwrap();
        assert_eq!(sequential.standings, parallel.standings);
    }
}
