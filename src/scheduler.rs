//! Round-robin scheduling of every unordered strategy triple
//!
//! One tournament pass plays every combination-with-repetition `(i, j, k)`
//! with `0 ≤ i ≤ j ≤ k < N`, in lexicographic order. Duplicates are included
//! on purpose: two copies of a strategy meet every other strategy once, and
//! three copies of it meet once — a strategy that only thrives against
//! outsiders but collapses against itself pays for it here. Each seat is a
//! fresh instance, so self-play is genuine self-play rather than shared
//! state.

use anyhow::Context;
use rand::Rng;
use tracing::debug;

use crate::match_sim::play_match;
use crate::payoff::PayoffTensor;
use crate::pool::StrategyPool;

/// Diagnostics for one played match, kept when verbose reporting is on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchRecord {
    /// Pool indices in seat order (non-decreasing).
    pub seats: [usize; 3],
    /// Number of rounds this match was drawn to last.
    pub rounds: usize,
    /// Average payoff per seat, in seat order.
    pub scores: [f64; 3],
}

/// Outcome of one full round-robin pass.
#[derive(Clone, Debug, Default)]
pub struct PassResult {
    /// Total accumulated score per pool index.
    pub totals: Vec<f64>,
    /// Per-match diagnostics; empty unless recording was requested.
    pub matches: Vec<MatchRecord>,
}

/// Drives one full round-robin pass over a pool.
#[derive(Clone, Copy, Debug)]
pub struct RoundRobinScheduler {
    min_rounds: usize,
    max_rounds: usize,
    record_matches: bool,
}

impl RoundRobinScheduler {
    /// Creates a scheduler drawing each match's round count uniformly from
    /// `min_rounds..=max_rounds`.
    ///
    /// The evaluator validates the range before any pass runs; a scheduler is
    /// never built from an empty or zero range.
    #[must_use]
    pub fn new(min_rounds: usize, max_rounds: usize, record_matches: bool) -> Self {
        Self {
            min_rounds,
            max_rounds,
            record_matches,
        }
    }

    /// Number of matches a pass plays for a pool of `n`: C(n+2, 3).
    #[must_use]
    pub fn match_count(n: usize) -> usize {
        n * (n + 1) * (n + 2) / 6
    }

    /// Plays every triple once and returns the accumulated totals.
    ///
    /// The enumeration order is lexicographic on `(i, j, k)`; it shows in
    /// logs and match records but carries no semantic weight. `rng` is this
    /// pass's own stream — both the round-count draws and nothing else come
    /// from it, so concurrent passes never share a generator.
    ///
    /// # Errors
    ///
    /// Fails on the first strategy contract violation or unregistered pool
    /// index, with the offending triple attached as context.
    pub fn run_pass<R: Rng>(
        &self,
        pool: &StrategyPool,
        tensor: &PayoffTensor,
        rng: &mut R,
    ) -> anyhow::Result<PassResult> {
        let n = pool.len();
        let mut totals = vec![0.0f64; n];
        let mut matches = Vec::with_capacity(if self.record_matches {
            Self::match_count(n)
        } else {
            0
        });

        for (i, j, k) in index_triples(n) {
            let mut seats = [
                pool.instantiate(i)?,
                pool.instantiate(j)?,
                pool.instantiate(k)?,
            ];
            let rounds = rng.gen_range(self.min_rounds..=self.max_rounds);
            let scores = play_match(&mut seats, rounds, tensor)
                .with_context(|| format!("match ({i}, {j}, {k}) aborted"))?;

            // A repeated index receives one addition per seat it occupies.
            totals[i] += scores[0];
            totals[j] += scores[1];
            totals[k] += scores[2];
            debug!(i, j, k, rounds, ?scores, "match finished");

            if self.record_matches {
                matches.push(MatchRecord {
                    seats: [i, j, k],
                    rounds,
                    scores,
                });
            }
        }

        Ok(PassResult { totals, matches })
    }
}

/// All `(i, j, k)` with `i ≤ j ≤ k < n`, lexicographically.
fn index_triples(n: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..n).flat_map(move |i| (i..n).flat_map(move |j| (j..n).map(move |k| (i, j, k))))
}
