use std::time::Instant;

use log::{debug, info, warn};

use crate::game_state::{GameState, Move};
use crate::logic::config::WeightProfile;
use crate::logic::evaluation;
use crate::logic::pathfind;
use crate::logic::predict;
use crate::logic::safe_move;
use crate::sim;

// Score reported when there is nothing left to choose between.
pub const SENTINEL_SCORE: f64 = -1.0e9;

// Two deep scores closer than this are considered converged; the depth-0
// pre-score decides between them instead.
const TIE_MARGIN: f64 = 50.0;

// Opponent branching is folded into at most this many of our plies.
const OPPONENT_SIM_PLIES: u8 = 3;

/// The chosen direction together with the score that justified it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDecision {
    pub direction: Move,
    pub score: f64,
}

/// Bounded-depth minimax over simulated states, preemptable by `deadline`.
///
/// `depth0_scores` are the caller's one-ply evaluator scores per candidate,
/// used only for tie-breaking once deep scores converge.
pub fn choose_move(
    state: &GameState,
    max_depth: u8,
    profile: &WeightProfile,
    depth0_scores: &[(Move, f64)],
    deadline: Instant,
) -> MoveDecision {
    let candidates = safe_move::safe_moves(state);
    if candidates.is_empty() {
        warn!(
            "Game {} Turn {}: no safe moves, defaulting to up",
            state.game.id, state.turn
        );
        return MoveDecision { direction: Move::Up, score: SENTINEL_SCORE };
    }
    if candidates.len() == 1 {
        let score = depth0_score(depth0_scores, candidates[0]).unwrap_or(0.0);
        return MoveDecision { direction: candidates[0], score };
    }

    // Space filter: drop moves whose resulting region cannot even hold our
    // body. If that rejects everything, moving beats freezing.
    let roomy: Vec<Move> = candidates
        .iter()
        .copied()
        .filter(|&mv| {
            let next = sim::advance_our_move(state, mv);
            pathfind::flood_fill(&next, &next.you.head) >= state.you.length as usize
        })
        .collect();
    let candidates = if roomy.is_empty() {
        debug!(
            "Game {} Turn {}: space filter rejected every move, keeping all",
            state.game.id, state.turn
        );
        candidates
    } else {
        roomy
    };

    let cheap = WeightProfile::cheap();
    let opponent_horizon = max_depth.min(OPPONENT_SIM_PLIES);

    let mut alpha = f64::NEG_INFINITY;
    let beta = f64::INFINITY;
    let mut scored: Vec<(Move, f64)> = Vec::new();

    for &mv in &candidates {
        let value = max_child_value(
            state,
            mv,
            max_depth,
            alpha,
            beta,
            profile,
            &cheap,
            opponent_horizon,
            deadline,
        );
        debug!(
            "Game {} Turn {}: candidate {:?} -> {:.1}",
            state.game.id, state.turn, mv, value
        );
        scored.push((mv, value));
        alpha = alpha.max(value);

        if Instant::now() >= deadline {
            warn!(
                "Game {} Turn {}: deadline reached after {} of {} candidates",
                state.game.id,
                state.turn,
                scored.len(),
                candidates.len()
            );
            break;
        }
    }

    select(state, scored, depth0_scores)
}

// Value of one of our moves at a maximizing node. Within the opponent
// horizon, the nearest opponent answers with each of its predicted moves and
// we take the worst case; past the horizon all opponents are frozen.
#[allow(clippy::too_many_arguments)]
fn max_child_value(
    state: &GameState,
    mv: Move,
    depth: u8,
    alpha: f64,
    beta: f64,
    profile: &WeightProfile,
    cheap: &WeightProfile,
    opponent_horizon: u8,
    deadline: Instant,
) -> f64 {
    if opponent_horizon > 0 {
        if let Some(opponent) = predict::nearest_opponent(state) {
            let opponent_id = opponent.id.clone();
            let mut worst = f64::INFINITY;
            for (opponent_move, _) in predict::predict_moves(state, &opponent_id) {
                let child = sim::advance_with_opponent(state, mv, &opponent_id, opponent_move);
                let value = minimax(
                    &child,
                    depth.saturating_sub(1),
                    false,
                    alpha,
                    beta,
                    profile,
                    cheap,
                    opponent_horizon - 1,
                    deadline,
                );
                worst = worst.min(value);
                if worst <= alpha {
                    break;
                }
            }
            return worst;
        }
    }

    let child = sim::advance_our_move(state, mv);
    minimax(&child, depth.saturating_sub(1), false, alpha, beta, profile, cheap, 0, deadline)
}

#[allow(clippy::too_many_arguments)]
fn minimax(
    state: &GameState,
    depth: u8,
    maximizing: bool,
    mut alpha: f64,
    mut beta: f64,
    profile: &WeightProfile,
    cheap: &WeightProfile,
    opponent_horizon: u8,
    deadline: Instant,
) -> f64 {
    // Soft preemption: past the deadline every node collapses to a cheap
    // evaluation, so the recursion unwinds in bounded time.
    if Instant::now() >= deadline {
        return evaluation::evaluate(state, cheap);
    }
    if depth == 0 {
        return evaluation::evaluate(state, profile);
    }

    let moves = safe_move::safe_moves(state);
    if moves.is_empty() {
        return evaluation::evaluate(state, profile);
    }

    if maximizing {
        let mut best = f64::NEG_INFINITY;
        for &mv in &moves {
            let value = max_child_value(
                state,
                mv,
                depth,
                alpha,
                beta,
                profile,
                cheap,
                opponent_horizon,
                deadline,
            );
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        best
    } else {
        // The minimizing ply is the turn alternation of alpha-beta, not an
        // opponent turn; opponent replies are folded in at maximizing nodes.
        let mut worst = f64::INFINITY;
        for &mv in &moves {
            let child = sim::advance_our_move(state, mv);
            let value = minimax(
                &child,
                depth - 1,
                true,
                alpha,
                beta,
                profile,
                cheap,
                opponent_horizon,
                deadline,
            );
            worst = worst.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                break;
            }
        }
        worst
    }
}

// Deep scores first; converged scores fall back to the depth-0 pre-score,
// and exact ties to a per-(snake, turn, move) bias so identical snakes in
// symmetric spots stop mirroring each other.
fn select(state: &GameState, mut scored: Vec<(Move, f64)>, depth0_scores: &[(Move, f64)]) -> MoveDecision {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    // The window is anchored to the best deep score; a chain of within-50
    // steps must not drag the pick far below the top.
    let top = scored[0].1;
    let mut best = scored[0];
    for &(mv, score) in scored.iter().skip(1) {
        if (top - score).abs() >= TIE_MARGIN {
            break;
        }
        let incumbent = depth0_score(depth0_scores, best.0).unwrap_or(f64::NEG_INFINITY);
        let challenger = depth0_score(depth0_scores, mv).unwrap_or(f64::NEG_INFINITY);
        if challenger > incumbent + 1e-9 {
            best = (mv, score);
        } else if (challenger - incumbent).abs() <= 1e-9
            && tie_bias(&state.you.id, state.turn, mv) > tie_bias(&state.you.id, state.turn, best.0)
        {
            best = (mv, score);
        }
    }

    info!(
        "Game {} Turn {}: selected {:?} (score {:.1})",
        state.game.id, state.turn, best.0, best.1
    );
    MoveDecision { direction: best.0, score: best.1 }
}

fn depth0_score(depth0_scores: &[(Move, f64)], mv: Move) -> Option<f64> {
    depth0_scores.iter().find(|(m, _)| *m == mv).map(|(_, s)| *s)
}

// Deterministic per-(snake, turn, move) jitter: the id maps to a bucket in
// [0, 100), which rotates the direction preference together with the turn.
// Identical inputs reproduce exactly; different ids favour different
// directions in otherwise symmetric spots.
fn tie_bias(snake_id: &str, turn: u32, mv: Move) -> f64 {
    let bucket = id_bucket(snake_id);
    let rotated = (mv.rank() + bucket + turn) % 4;
    bucket as f64 * 1e-4 + rotated as f64 * 1e-2
}

fn id_bucket(snake_id: &str) -> u32 {
    snake_id.bytes().fold(0u32, |acc, byte| acc.wrapping_add(byte as u32)) % 100
}
