//! Simulation of one repeated-game match between three seats
//!
//! The three participants act simultaneously each round. Histories and
//! rewards are presented in *cyclic rotation* (A→B→C→A): every seat sees its
//! own history first, then the next seat's, then the next-next seat's, and is
//! rewarded through the payoff table in the same order. The rotation is what
//! keeps the game symmetric — each participant's second argument is always
//! the same seat-relative opponent, so no seat is privileged.

use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::anyhow;
use tracing::trace;

use crate::payoff::PayoffTensor;
use crate::pool::Seat;
use crate::strategy::Action;

/// Plays `rounds` rounds between the three seats and returns each seat's
/// average payoff, in seat order.
///
/// Histories are append-only and grow by exactly one action per seat per
/// round; a strategy called for round `i` sees `i` prior actions in each of
/// its three slices.
///
/// # Panics
///
/// Panics when `rounds` is zero; the scheduler never produces such a match.
///
/// # Errors
///
/// A panic inside a strategy's `decide` is a contract violation: the match is
/// aborted and the error names the offending pool entry and round. No default
/// action is substituted — doing so would corrupt every score in the match.
pub fn play_match(
    seats: &mut [Seat; 3],
    rounds: usize,
    tensor: &PayoffTensor,
) -> anyhow::Result<[f64; 3]> {
    assert!(rounds > 0, "a match must have at least one round");

    let mut history_a: Vec<Action> = Vec::with_capacity(rounds);
    let mut history_b: Vec<Action> = Vec::with_capacity(rounds);
    let mut history_c: Vec<Action> = Vec::with_capacity(rounds);
    let mut sums = [0.0f64; 3];

    let [seat_a, seat_b, seat_c] = seats;
    for round in 0..rounds {
        let play_a = guarded_decide(seat_a, round, &history_a, &history_b, &history_c)?;
        let play_b = guarded_decide(seat_b, round, &history_b, &history_c, &history_a)?;
        let play_c = guarded_decide(seat_c, round, &history_c, &history_a, &history_b)?;

        sums[0] += tensor.reward(play_a, play_b, play_c);
        sums[1] += tensor.reward(play_b, play_c, play_a);
        sums[2] += tensor.reward(play_c, play_a, play_b);

        history_a.push(play_a);
        history_b.push(play_b);
        history_c.push(play_c);
        trace!(round, ?play_a, ?play_b, ?play_c);
    }

    Ok(sums.map(|sum| sum / rounds as f64))
}

/// Calls `decide` and turns a panicking strategy into a reportable error.
fn guarded_decide(
    seat: &mut Seat,
    round: usize,
    own: &[Action],
    opp1: &[Action],
    opp2: &[Action],
) -> anyhow::Result<Action> {
    let strategy = &mut seat.strategy;
    catch_unwind(AssertUnwindSafe(move || {
        strategy.decide(round, own, opp1, opp2)
    }))
    .map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        anyhow!(
            "strategy '{}' (pool index {}) violated the decide contract at round {round}: {detail}",
            seat.name,
            seat.pool_index,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use Action::{Cooperate as C, Defect as D};

    struct Fixed(Action);

    impl Strategy for Fixed {
        fn decide(&mut self, _: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
            self.0
        }
    }

    /// Copies the previous action of its first seat-relative opponent.
    struct CopyNext;

    impl Strategy for CopyNext {
        fn decide(&mut self, round: usize, _: &[Action], opp1: &[Action], _: &[Action]) -> Action {
            if round == 0 {
                C
            } else {
                opp1[round - 1]
            }
        }
    }

    struct ChecksHistoryLengths;

    impl Strategy for ChecksHistoryLengths {
        fn decide(&mut self, round: usize, own: &[Action], opp1: &[Action], opp2: &[Action]) -> Action {
            assert_eq!(own.len(), round);
            assert_eq!(opp1.len(), round);
            assert_eq!(opp2.len(), round);
            C
        }
    }

    struct PanicsAt(usize);

    impl Strategy for PanicsAt {
        fn decide(&mut self, round: usize, _: &[Action], _: &[Action], _: &[Action]) -> Action {
            if round == self.0 {
                panic!("unhandled case");
            }
            C
        }
    }

    fn seat(index: usize, strategy: impl Strategy + 'static) -> Seat {
        Seat {
            pool_index: index,
            name: format!("seat-{index}").into(),
            strategy: Box::new(strategy),
        }
    }

    #[test]
    fn all_cooperate_scores_the_ccc_cell_for_any_length() {
        let tensor = PayoffTensor::standard();
        for rounds in [1, 7, 100] {
            let mut seats = [seat(0, Fixed(C)), seat(1, Fixed(C)), seat(2, Fixed(C))];
            let scores = play_match(&mut seats, rounds, &tensor).unwrap();
            assert_eq!(scores, [6.0, 6.0, 6.0], "rounds = {rounds}");
        }
    }

    #[test]
    fn lone_defector_scores_match_hand_computation() {
        let tensor = PayoffTensor::standard();
        let mut seats = [seat(0, Fixed(D)), seat(1, Fixed(C)), seat(2, Fixed(C))];
        let scores = play_match(&mut seats, 10, &tensor).unwrap();
        // A: U(D,C,C) = 8 every round; B: U(C,C,D) = 3; C: U(C,D,C) = 3.
        assert_eq!(scores, [8.0, 3.0, 3.0]);
    }

    #[test]
    fn lone_cooperator_scores_the_lowest_cell() {
        let tensor = PayoffTensor::standard();
        let mut seats = [seat(0, Fixed(C)), seat(1, Fixed(D)), seat(2, Fixed(D))];
        let scores = play_match(&mut seats, 5, &tensor).unwrap();
        assert_eq!(scores, [0.0, 5.0, 5.0]);
    }

    #[test]
    fn rotation_presents_the_next_seat_as_first_opponent() {
        let tensor = PayoffTensor::standard();
        // Seat A copies its first opponent, which by rotation must be seat B.
        let mut seats = [seat(0, CopyNext), seat(1, Fixed(D)), seat(2, Fixed(C))];
        let scores = play_match(&mut seats, 2, &tensor).unwrap();
        // A plays [C, D]: U(C,D,C) + U(D,D,C) = 3 + 5. Were the rotation
        // wrong (first opponent = seat C), A would play [C, C] for 3 + 3.
        assert_eq!(scores[0], 4.0);
    }

    #[test]
    fn histories_have_exactly_round_entries() {
        let tensor = PayoffTensor::standard();
        let mut seats = [
            seat(0, ChecksHistoryLengths),
            seat(1, ChecksHistoryLengths),
            seat(2, ChecksHistoryLengths),
        ];
        play_match(&mut seats, 25, &tensor).unwrap();
    }

    #[test]
    fn panicking_strategy_is_reported_with_seat_and_round() {
        let tensor = PayoffTensor::standard();
        let mut seats = [seat(0, Fixed(C)), seat(4, PanicsAt(3)), seat(2, Fixed(C))];
        let err = play_match(&mut seats, 10, &tensor).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("pool index 4"), "{message}");
        assert!(message.contains("round 3"), "{message}");
        assert!(message.contains("unhandled case"), "{message}");
    }
}
