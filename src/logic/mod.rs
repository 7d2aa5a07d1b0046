use std::env;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::seq::SliceRandom;

use crate::game_state::{GameState, Move};
use crate::sim;

pub mod config;
pub mod evaluation;
pub mod pathfind;
pub mod predict;
pub mod safe_move;
pub mod search;

use config::Phase;
use search::{MoveDecision, SENTINEL_SCORE};

// Depth guidelines per board situation; the deadline stays authoritative.
const DEPTH_SOLO: u8 = 10;
const DEPTH_DUEL: u8 = 8;
const DEPTH_CRAMPED: u8 = 5;
const DEPTH_DEFAULT: u8 = 6;

// Main entry: produce a decision within `budget_ms`. Never fails; every
// degenerate input degrades to some direction.
pub fn decide_move(state: &GameState, budget_ms: u64) -> MoveDecision {
    let start_time = Instant::now();
    let deadline = start_time + Duration::from_millis(budget_ms);
    let game_id = &state.game.id;
    let turn = state.turn;

    // The engine guarantees our id appears exactly once; anything else means
    // the envelope is inconsistent and not worth searching over.
    if state.board.snakes.iter().filter(|s| s.id == state.you.id).count() != 1 {
        warn!(
            "Game {} Turn {}: our id is not on the board exactly once, defaulting to up",
            game_id, turn
        );
        return MoveDecision { direction: Move::Up, score: SENTINEL_SCORE };
    }

    let safe_moves = safe_move::safe_moves(state);
    debug!(
        "Game {} Turn {}: safe moves {:?} [{:?}]",
        game_id,
        turn,
        safe_moves,
        start_time.elapsed()
    );

    if safe_moves.is_empty() {
        // Doomed either way; any direction is compliant, so pick one at
        // random rather than telegraphing a fixed reply.
        let direction = Move::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(Move::Up);
        warn!(
            "Game {} Turn {}: no safe moves! Going {} [{:?}]",
            game_id,
            turn,
            direction.as_str(),
            start_time.elapsed()
        );
        return MoveDecision { direction, score: SENTINEL_SCORE };
    }

    let phase = Phase::detect(state);
    let mut profile = phase.profile();
    if config::food_competition_detected(state) {
        info!(
            "Game {} Turn {}: food competition detected, rewriting the {:?} profile",
            game_id, turn, phase
        );
        profile.apply_food_competition();
    }

    // Teacher-style tuning hook: FOOD_THRESHOLD overrides the hunger cutoff.
    if let Some(threshold) = env::var("FOOD_THRESHOLD").ok().and_then(|v| v.parse().ok()) {
        profile.food_health_threshold = threshold;
    }

    if safe_moves.len() == 1 {
        let next = sim::advance_our_move(state, safe_moves[0]);
        let score = evaluation::evaluate(&next, &profile);
        info!(
            "Game {} Turn {}: only one safe move: {}. Choosing early. [{:?}]",
            game_id,
            turn,
            safe_moves[0].as_str(),
            start_time.elapsed()
        );
        return MoveDecision { direction: safe_moves[0], score };
    }

    // Depth-0 pre-scores: one-ply lookahead under the selected profile,
    // computed once and reused by the tie-breaker.
    let depth0_scores: Vec<(Move, f64)> = safe_moves
        .iter()
        .map(|&mv| {
            let next = sim::advance_our_move(state, mv);
            let breakdown = evaluation::evaluate_breakdown(&next, &profile);
            debug!(
                "Game {} Turn {}: depth0 {:?} -> {:.1} ({:?})",
                game_id,
                turn,
                mv,
                breakdown.total(),
                breakdown
            );
            (mv, breakdown.total())
        })
        .collect();

    let max_depth = dynamic_depth(state);
    info!(
        "Game {} Turn {}: phase {:?}, depth {}, budget {}ms [{:?}]",
        game_id,
        turn,
        phase,
        max_depth,
        budget_ms,
        start_time.elapsed()
    );

    let decision = search::choose_move(state, max_depth, &profile, &depth0_scores, deadline);
    info!(
        "Game {} Turn {}: chose {} (score {:.1}) [{:?}]",
        game_id,
        turn,
        decision.direction.as_str(),
        decision.score,
        start_time.elapsed()
    );
    decision
}

fn dynamic_depth(state: &GameState) -> u8 {
    let alive = state.board.snakes.len();
    if alive <= 1 {
        DEPTH_SOLO
    } else if alive == 2 {
        DEPTH_DUEL
    } else if state.board.density_percent() > 40 {
        DEPTH_CRAMPED
    } else {
        DEPTH_DEFAULT
    }
}
