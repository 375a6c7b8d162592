//! Config for a tournament run
//!
//! This module provides configuration options controlling how a run is
//! simulated: how many trials to play, how long matches last, how much
//! diagnostic data to keep, and how many worker threads to use.
//!
//! Configuration can be created programmatically using
//! [`Configuration::new()`] or by reading environment variables using
//! [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration
//! values. All values are optional; flags are case-insensitive and enabled by
//! setting the value to `"true"`.
//!
//! - `EVAL_TRIALS` — Number of independent round-robin trials (default: `100`)
//! - `EVAL_MIN_ROUNDS` — Minimum rounds per match (default: `90`)
//! - `EVAL_MAX_ROUNDS` — Maximum rounds per match (default: `110`)
//! - `EVAL_VERBOSE` — Keep per-match score records in the report (default: `false`)
//! - `EVAL_LOG` — Enable logging to a file (default: `false`)
//! - `EVAL_NUM_THREADS` — Worker threads for trial dispatch; `0` = one per
//!   physical CPU (default: `0`)

use anyhow::bail;

/// Configuration for a tournament run.
///
/// The round-count range and trial count are tuning defaults inherited from
/// the reference tournament (about 100 rounds per match, 100 trials), not
/// engine invariants; override them freely.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) trials: u32,
    pub(crate) min_rounds: usize,
    pub(crate) max_rounds: usize,
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) num_threads: usize,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - 100 trials are played.
    /// - Each match lasts between 90 and 110 rounds inclusive.
    /// - Per-match records are not kept (`verbose = false`).
    /// - Logging to file is disabled.
    /// - Worker count is one per physical CPU.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trials: 100,
            min_rounds: 90,
            max_rounds: 110,
            verbose: false,
            log: false,
            num_threads: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables. Any other
    /// value (including unset) results in the default for that field.
    #[must_use]
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_number<T: std::str::FromStr>(var: &str, default: T) -> T {
            std::env::var(var)
                .ok()
                .and_then(|val| val.parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::new();
        Self {
            trials: get_env_number("EVAL_TRIALS", defaults.trials),
            min_rounds: get_env_number("EVAL_MIN_ROUNDS", defaults.min_rounds),
            max_rounds: get_env_number("EVAL_MAX_ROUNDS", defaults.max_rounds),
            verbose: get_env_flag("EVAL_VERBOSE", defaults.verbose),
            log: get_env_flag("EVAL_LOG", defaults.log),
            num_threads: get_env_number("EVAL_NUM_THREADS", defaults.num_threads),
        }
    }

    /// Sets the number of independent trials.
    #[must_use]
    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the inclusive range the per-match round count is drawn from.
    ///
    /// Use `min == max` for fixed-length matches (handy for reproducible
    /// tests).
    #[must_use]
    pub fn with_round_range(mut self, min_rounds: usize, max_rounds: usize) -> Self {
        self.min_rounds = min_rounds;
        self.max_rounds = max_rounds;
        self
    }

    /// Enable or disable per-match diagnostics in the report.
    #[must_use]
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    #[must_use]
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Sets the number of worker threads trials are dispatched onto.
    ///
    /// `0` selects one worker per physical CPU; `1` reproduces the fully
    /// sequential reference behavior.
    #[must_use]
    pub fn with_num_threads(mut self, value: usize) -> Self {
        self.num_threads = value;
        self
    }

    /// Rejects parameter combinations no trial could run under.
    ///
    /// # Errors
    ///
    /// Returns an error naming the invalid parameter when the trial count is
    /// zero or the round range is empty or starts at zero.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.trials == 0 {
            bail!("trial count must be positive (got 0)");
        }
        if self.min_rounds == 0 {
            bail!("matches need at least one round (got min_rounds = 0)");
        }
        if self.min_rounds > self.max_rounds {
            bail!(
                "empty round-count range: min_rounds ({}) > max_rounds ({})",
                self.min_rounds,
                self.max_rounds
            );
        }
        Ok(())
    }

    /// Effective worker count, bounded by the number of trials.
    pub(crate) fn worker_count(&self) -> usize {
        let requested = if self.num_threads == 0 {
            num_cpus::get_physical()
        } else {
            self.num_threads
        };
        requested.clamp(1, self.trials.max(1) as usize)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_tournament() {
        let config = Configuration::new();
        assert_eq!(config.trials, 100);
        assert_eq!((config.min_rounds, config.max_rounds), (90, 110));
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_chain() {
        let config = Configuration::new()
            .with_trials(7)
            .with_round_range(10, 10)
            .with_verbose(true)
            .with_num_threads(1);
        assert_eq!(config.trials, 7);
        assert_eq!((config.min_rounds, config.max_rounds), (10, 10));
        assert!(config.verbose);
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn zero_trials_is_rejected() {
        let err = Configuration::new().with_trials(0).validate().unwrap_err();
        assert!(err.to_string().contains("trial count"));
    }

    #[test]
    fn empty_round_range_is_rejected() {
        let err = Configuration::new()
            .with_round_range(110, 90)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("min_rounds (110)"));
    }

    #[test]
    fn zero_length_matches_are_rejected() {
        let err = Configuration::new()
            .with_round_range(0, 10)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("at least one round"));
    }

    #[test]
    fn worker_count_never_exceeds_trials() {
        let config = Configuration::new().with_trials(2).with_num_threads(16);
        assert_eq!(config.worker_count(), 2);
    }
}
