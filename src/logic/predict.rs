use std::cmp::Ordering;

use crate::game_state::{Battlesnake, GameState, Move};
use crate::logic::config::WeightProfile;
use crate::logic::evaluation;
use crate::logic::safe_move;
use crate::sim;

// Reported when the opponent has no safe move at all; the search treats the
// opponent as forced.
pub const FORCED_MOVE: Move = Move::Up;

// The opponent we fold into the shallow plies: closest head by Manhattan
// distance, ties resolved by board order so the pick is stable.
pub fn nearest_opponent<'a>(state: &'a GameState) -> Option<&'a Battlesnake> {
    let mut nearest: Option<(&Battlesnake, u32)> = None;
    for opponent in state.opponents() {
        let distance = state.you.head.manhattan_distance(&opponent.head);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((opponent, distance)),
        }
    }
    nearest.map(|(opponent, _)| opponent)
}

// Scores each of the opponent's safe moves at depth 0, viewed from the
// opponent's own perspective under the fixed predictor profile, and returns
// them best-first. The search walks this list to enumerate opponent branches;
// the ordering only helps pruning, every branch is still visited.
pub fn predict_moves(state: &GameState, opponent_id: &str) -> Vec<(Move, f64)> {
    let forced = vec![(FORCED_MOVE, f64::NEG_INFINITY)];

    let view = match state.from_perspective(opponent_id) {
        Some(view) => view,
        None => return forced,
    };

    let moves = safe_move::safe_moves(&view);
    if moves.is_empty() {
        return forced;
    }

    let profile = WeightProfile::opponent();
    let mut scored: Vec<(Move, f64)> = moves
        .into_iter()
        .map(|mv| {
            let next = sim::advance_our_move(&view, mv);
            (mv, evaluation::evaluate(&next, &profile))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::fixtures::*;

    #[test]
    fn nearest_opponent_by_manhattan() {
        let you = snake("you", &[(5, 5), (5, 4), (5, 3)], 100);
        let close = snake("close", &[(7, 5), (8, 5), (9, 5)], 100);
        let far = snake("far", &[(0, 10), (1, 10), (2, 10)], 100);
        let state = state(11, 11, &[], vec![you, far, close]);
        assert_eq!(nearest_opponent(&state).unwrap().id, "close");
    }

    #[test]
    fn nearest_opponent_tie_is_stable() {
        let you = snake("you", &[(5, 5), (5, 4), (5, 3)], 100);
        let left = snake("left", &[(3, 5), (2, 5), (1, 5)], 100);
        let right = snake("right", &[(7, 5), (8, 5), (9, 5)], 100);
        let state = state(11, 11, &[], vec![you, left, right]);
        // Both two steps away; board order wins.
        assert_eq!(nearest_opponent(&state).unwrap().id, "left");
    }

    #[test]
    fn no_opponents_means_none() {
        let you = snake("you", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![you]);
        assert!(nearest_opponent(&state).is_none());
    }

    #[test]
    fn boxed_opponent_is_forced() {
        let you = snake("you", &[(5, 5), (5, 4), (5, 3)], 100);
        // Opponent in the corner, fully sealed by its own body.
        let boxed = snake("boxed", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2), (1, 2)], 100);
        let state = state(11, 11, &[], vec![you, boxed]);
        let predicted = predict_moves(&state, "boxed");
        assert_eq!(predicted, vec![(FORCED_MOVE, f64::NEG_INFINITY)]);
    }

    #[test]
    fn unknown_id_is_forced() {
        let you = snake("you", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![you]);
        assert_eq!(predict_moves(&state, "ghost"), vec![(FORCED_MOVE, f64::NEG_INFINITY)]);
    }

    #[test]
    fn predictions_are_sorted_best_first() {
        let you = snake("you", &[(0, 10), (0, 9), (0, 8)], 100);
        let opponent = snake("opp", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![you, opponent]);
        let predicted = predict_moves(&state, "opp");
        assert!(!predicted.is_empty());
        for pair in predicted.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // Every predicted move comes from the opponent's safe set.
        let view = state.from_perspective("opp").unwrap();
        let safe = crate::logic::safe_move::safe_moves(&view);
        for (mv, _) in &predicted {
            assert!(safe.contains(mv));
        }
    }

    #[test]
    fn predictor_avoids_stepping_next_to_us() {
        // A longer us one cell to the opponent's right: walking into our
        // reach scores far below walking away.
        let you = snake("you", &[(7, 5), (7, 4), (7, 3), (7, 2), (7, 1)], 100);
        let opponent = snake("opp", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![you, opponent]);
        let predicted = predict_moves(&state, "opp");
        let towards = predicted.iter().find(|(m, _)| *m == crate::game_state::Move::Right);
        let away = predicted.iter().find(|(m, _)| *m == crate::game_state::Move::Left);
        let (towards, away) = (towards.unwrap().1, away.unwrap().1);
        assert!(away > towards);
    }
}
