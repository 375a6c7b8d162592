//! Turning raw totals into ranks, and ranks into cross-trial averages
//!
//! Within one pass, ranking is fully deterministic: indices are ordered by
//! descending total and exact ties go to the lower pool index, so ranks are
//! always the unique integers `1..=N` with no gaps. Randomness only enters
//! through the match scores themselves; averaging ranks over many trials is
//! what washes it out.

use std::sync::Arc;

use crate::scheduler::MatchRecord;

/// Pool indices ordered best-first: descending total, ties to lower index.
#[must_use]
pub fn rank_order(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]).then(a.cmp(&b)));
    order
}

/// Final line of the report for one pool entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Standing {
    /// Index the strategy was registered under.
    pub pool_index: usize,
    /// Display name given at registration.
    pub name: Arc<str>,
    /// Sum of this entry's ranks over all trials.
    pub rank_sum: u64,
    /// `rank_sum / trials`; lower is stronger.
    pub average_rank: f64,
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: average rank {:.2} (rank sum {})",
            self.pool_index, self.name, self.average_rank, self.rank_sum
        )
    }
}

/// Everything a completed run exposes to its caller.
///
/// The core computes and returns; consumers decide how (and whether) to
/// print it.
#[derive(Clone, Debug, Default)]
pub struct TournamentReport {
    /// Number of completed trials.
    pub trials: u32,
    /// Ranked order of pool indices for each trial, in trial order.
    pub trial_orders: Vec<Vec<usize>>,
    /// One entry per pool index, sorted ascending by average rank.
    pub standings: Vec<Standing>,
    /// Per-trial match diagnostics; populated only on verbose runs.
    pub matches: Vec<Vec<MatchRecord>>,
}

/// Accumulates per-trial ranks into average ranks.
///
/// Zeroed at run start, fed one rank order per trial, read once at run end.
/// This is the only state that survives a trial.
#[derive(Clone, Debug)]
pub struct RankAggregator {
    rank_sums: Vec<u64>,
    trials: u32,
}

impl RankAggregator {
    /// Creates a zeroed aggregator for a pool of `pool_size` entries.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        Self {
            rank_sums: vec![0; pool_size],
            trials: 0,
        }
    }

    /// Records one trial's rank order (as produced by [`rank_order`]).
    pub fn record_trial(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rank_sums.len());
        for (position, &index) in order.iter().enumerate() {
            self.rank_sums[index] += position as u64 + 1;
        }
        self.trials += 1;
    }

    /// Completed trials so far.
    #[must_use]
    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Average rank per pool index, in pool order.
    #[must_use]
    pub fn average_ranks(&self) -> Vec<f64> {
        self.rank_sums
            .iter()
            .map(|&sum| sum as f64 / self.trials as f64)
            .collect()
    }

    /// Consumes the aggregator into standings sorted ascending by average
    /// rank (ties to lower pool index).
    #[must_use]
    pub fn into_standings(self, names: &[Arc<str>]) -> Vec<Standing> {
        debug_assert_eq!(names.len(), self.rank_sums.len());
        let trials = self.trials;
        let mut standings: Vec<Standing> = self
            .rank_sums
            .into_iter()
            .enumerate()
            .map(|(pool_index, rank_sum)| Standing {
                pool_index,
                name: names[pool_index].clone(),
                rank_sum,
                average_rank: rank_sum as f64 / trials as f64,
            })
            .collect();
        standings.sort_by(|a, b| a.rank_sum.cmp(&b.rank_sum).then(a.pool_index.cmp(&b.pool_index)));
        standings
    }
}
