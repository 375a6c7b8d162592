//! Registration of the strategies under evaluation
//!
//! A [`StrategyPool`] maps each pool index `0..N` to a display name and a
//! zero-argument factory. The scheduler never reuses an instance: it asks the
//! pool for a fresh one per seat per match, so no strategy state can leak
//! between matches.

use std::sync::Arc;

use anyhow::bail;

use crate::strategy::Strategy;

/// Factory invoked once per seat per match.
pub type StrategyFactory = Box<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

struct PoolEntry {
    name: Arc<str>,
    factory: StrategyFactory,
}

impl std::fmt::Debug for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seat")
            .field("pool_index", &self.pool_index)
            .field("name", &self.name)
            .field("strategy", &"<dyn Strategy>")
            .finish()
    }
}

/// One freshly instantiated participant, bound to its pool identity.
pub struct Seat {
    /// Index of the entry this instance was built from.
    pub pool_index: usize,
    /// Display name given at registration.
    pub name: Arc<str>,
    /// The instance itself; exclusively owned by the running match.
    pub strategy: Box<dyn Strategy>,
}

/// The registered set of strategy factories under evaluation.
///
/// Names are explicit registration data (they are what reports display);
/// indices are assigned in registration order and are the identity used by
/// accumulators and rankings.
#[derive(Default)]
pub struct StrategyPool {
    entries: Vec<PoolEntry>,
}

impl StrategyPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy under `name`; returns its pool index.
    ///
    /// The factory may be called from any worker thread, hence the
    /// `Send + Sync` bound. The produced instances themselves never cross
    /// threads.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> usize
    where
        F: Fn() -> Box<dyn Strategy> + Send + Sync + 'static,
    {
        self.entries.push(PoolEntry {
            name: name.into().into(),
            factory: Box::new(factory),
        });
        self.entries.len() - 1
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name of the entry at `index`, if registered.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| &*entry.name)
    }

    /// All display names in pool order.
    #[must_use]
    pub fn names(&self) -> Vec<Arc<str>> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Builds a fresh instance for the entry at `index`.
    ///
    /// # Errors
    ///
    /// Requesting an unregistered index is a configuration error.
    pub fn instantiate(&self, index: usize) -> anyhow::Result<Seat> {
        let Some(entry) = self.entries.get(index) else {
            bail!(
                "no strategy registered at pool index {index} (pool size {})",
                self.entries.len()
            );
        };
        Ok(Seat {
            pool_index: index,
            name: entry.name.clone(),
            strategy: (entry.factory)(),
        })
    }
}

impl std::fmt::Debug for StrategyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Action;

    struct Fixed(Action);

    impl Strategy for Fixed {
        fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
            self.0
        }
    }

    fn two_entry_pool() -> StrategyPool {
        let mut pool = StrategyPool::new();
        pool.register("Friendly", || Box::new(Fixed(Action::Cooperate)));
        pool.register("Hostile", || Box::new(Fixed(Action::Defect)));
        pool
    }

    #[test]
    fn indices_follow_registration_order() {
        let mut pool = StrategyPool::new();
        let first = pool.register("Friendly", || Box::new(Fixed(Action::Cooperate)));
        let second = pool.register("Hostile", || Box::new(Fixed(Action::Defect)));
        assert_eq!((first, second), (0, 1));
        assert_eq!(pool.name(0), Some("Friendly"));
        assert_eq!(pool.name(1), Some("Hostile"));
        assert_eq!(pool.name(2), None);
    }

    #[test]
    fn instantiate_builds_fresh_instances() {
        let pool = two_entry_pool();
        let mut seat = pool.instantiate(1).unwrap();
        assert_eq!(seat.pool_index, 1);
        assert_eq!(&*seat.name, "Hostile");
        assert_eq!(seat.strategy.decide(0, &[], &[], &[]), Action::Defect);
    }

    #[test]
    fn instantiate_rejects_unknown_index() {
        let pool = two_entry_pool();
        let err = pool.instantiate(7).unwrap_err();
        assert!(err.to_string().contains("pool index 7"));
    }
}
