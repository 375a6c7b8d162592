//! The reward table shared by every match
//!
//! The three-player dilemma is built so that fixing one opponent's response
//! recovers the classic two-player game, and so that the two opponents are
//! interchangeable. Those two requirements pin down the unique ordering
//!
//! `U(D,C,C) > U(C,C,C) > U(D,D,C) > U(C,D,C) > U(D,D,D) > U(C,D,D)`
//!
//! which [`PayoffTensor::checked`] enforces on every custom table. The
//! [`standard`](PayoffTensor::standard) table satisfies it by construction.

use anyhow::bail;

use crate::strategy::Action;

/// Immutable 2×2×2 reward table, indexed `[own][opponent_a][opponent_b]`.
///
/// The table is read through [`reward`](Self::reward) with one [`Action`] per
/// participant; the caller is responsible for presenting the arguments in its
/// own seat rotation (see [`play_match`](crate::match_sim::play_match)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayoffTensor {
    cells: [[[f64; 2]; 2]; 2],
}

impl PayoffTensor {
    /// The reference table: `8 > 6 > 5 > 3 > 2 > 0`.
    #[must_use]
    pub const fn standard() -> Self {
        PayoffTensor {
            cells: [
                [
                    [6.0, 3.0], // own and first opponent cooperate
                    [3.0, 0.0], // own cooperates, first opponent defects
                ],
                [
                    [8.0, 5.0], // own defects, first opponent cooperates
                    [5.0, 2.0], // own and first opponent defect
                ],
            ],
        }
    }

    /// Builds a custom table, rejecting any that breaks the dilemma shape.
    ///
    /// # Errors
    ///
    /// Returns an error when the strict ordering above does not hold or when
    /// the table is not symmetric in the two opponent arguments.
    pub fn checked(cells: [[[f64; 2]; 2]; 2]) -> anyhow::Result<Self> {
        let tensor = PayoffTensor { cells };

        use Action::{Cooperate as C, Defect as D};
        for own in [C, D] {
            if tensor.reward(own, C, D) != tensor.reward(own, D, C) {
                bail!(
                    "payoff table is not symmetric in the opponents: U({own:?},C,D) = {} but U({own:?},D,C) = {}",
                    tensor.reward(own, C, D),
                    tensor.reward(own, D, C),
                );
            }
        }

        let ordered = [
            tensor.reward(D, C, C),
            tensor.reward(C, C, C),
            tensor.reward(D, D, C),
            tensor.reward(C, D, C),
            tensor.reward(D, D, D),
            tensor.reward(C, D, D),
        ];
        if !ordered.windows(2).all(|pair| pair[0] > pair[1]) {
            bail!(
                "payoff table breaks the dilemma ordering U(DCC) > U(CCC) > U(DDC) > U(CDC) > U(DDD) > U(CDD): got {ordered:?}"
            );
        }

        Ok(tensor)
    }

    /// Reward for `own` when the two opponents play `opp_a` and `opp_b`.
    ///
    /// Total over the whole 2×2×2 domain; never fails.
    #[must_use]
    pub fn reward(&self, own: Action, opp_a: Action, opp_b: Action) -> f64 {
        self.cells[own.index()][opp_a.index()][opp_b.index()]
    }
}

impl Default for PayoffTensor {
    fn default() -> Self {
        Self::standard()
    }
}
