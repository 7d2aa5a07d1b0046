use crate::game_state::{Coord, GameState};
use crate::logic::config::WeightProfile;
use crate::logic::pathfind;

/// Per-heuristic components of a state score, kept separate for diagnostics.
/// The decision layer logs these at debug level; the search only reads
/// `total()`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub wall: f64,
    pub self_collision: f64,
    pub head_to_head: f64,
    pub space: f64,
    pub adjacent_heads: f64,
    pub head_danger: f64,
    pub center: f64,
    pub food: f64,
    pub food_trap: f64,
    pub tail_chase: f64,
    pub voronoi: f64,
    pub length: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.wall
            + self.self_collision
            + self.head_to_head
            + self.space
            + self.adjacent_heads
            + self.head_danger
            + self.center
            + self.food
            + self.food_trap
            + self.tail_chase
            + self.voronoi
            + self.length
    }
}

// Weighted sum over the enabled heuristics. Pure: reads the state and the
// profile, touches nothing else, so it is safe at any search node.
pub fn evaluate(state: &GameState, profile: &WeightProfile) -> f64 {
    evaluate_breakdown(state, profile).total()
}

pub fn evaluate_breakdown(state: &GameState, profile: &WeightProfile) -> ScoreBreakdown {
    let you = &state.you;
    let head = you.head;
    let board = &state.board;
    let mut scores = ScoreBreakdown::default();

    // 1. Wall safety.
    if !board.in_bounds(&head) {
        scores.wall = profile.out_of_bounds_penalty;
    }

    // 2. Self collision. Simulated states have already dropped the tail, so
    // any overlap with the rest of the body is fatal.
    if you.body.iter().skip(1).any(|segment| *segment == head) {
        scores.self_collision = profile.self_collision_penalty;
    }

    // 3. Head-to-head on the same cell: survivable only when strictly longer.
    for opponent in state.opponents() {
        if opponent.head == head {
            scores.head_to_head += if you.length > opponent.length {
                profile.head_to_head_win_bonus
            } else {
                profile.head_to_head_loss_penalty
            };
        }
    }

    // The flood fill is the expensive part; run it once and share the count
    // across every heuristic that needs it.
    let needs_area =
        profile.flood_fill_enabled || profile.food_trap_enabled || profile.tail_chase_enabled;
    let area = if needs_area { pathfind::flood_fill(state, &head) } else { 0 };

    // 4. Reachable area.
    if profile.flood_fill_enabled {
        scores.space = area as f64 * profile.space_weight;
    }

    // 5. Adjacent-head caution.
    if profile.adjacent_head_enabled {
        for opponent in state.opponents() {
            if head.manhattan_distance(&opponent.head) == 1 {
                scores.adjacent_heads += if you.length > opponent.length {
                    profile.adjacent_head_win_bonus
                } else {
                    profile.adjacent_head_loss_penalty
                };
            }
        }
    }

    // 6. Predictive head-collision danger: opponents are frozen deeper in
    // the tree, so flag any cell an opponent could step onto next turn.
    if profile.head_danger_enabled {
        for opponent in state.opponents() {
            if opponent.head.neighbours().contains(&head) {
                scores.head_danger += if you.length > opponent.length {
                    profile.head_danger_win_bonus
                } else {
                    profile.head_danger_loss_penalty
                };
            }
        }
    }

    // 7. Center control early on, wall hugging penalised otherwise.
    if profile.center_control_enabled {
        let opponent_count = state.opponents().count();
        if state.turn <= profile.center_turn_cutoff
            && opponent_count >= 2
            && board.in_center_region(&head)
        {
            scores.center = profile.center_bonus;
        } else if board.on_edge(&head) {
            scores.center = profile.wall_touch_penalty;
        }
    }

    let nearest_food_distance = board
        .food
        .iter()
        .map(|food| head.manhattan_distance(food))
        .min();
    let hungry = you.health < profile.food_health_threshold;

    // 8 + 9. Food urgency when hungry, discounted when the food sits in a
    // pocket much smaller than our current space.
    if profile.food_enabled && hungry {
        if let Some(distance) = nearest_food_distance {
            scores.food = profile.food_weight / (1.0 + distance as f64);

            if profile.food_trap_enabled {
                if let Some(nearest) = nearest_food_coord(state, &head) {
                    let food_area = pathfind::flood_fill(state, &nearest);
                    if food_area * 2 < area {
                        scores.food_trap = profile.food_trap_penalty;
                    }
                }
            }
        }
    }

    // 10. Tail chase: when healthy but cramped, staying near our own tail
    // keeps an escape row open. Walked distance, not line-of-sight; an
    // unreachable tail (-1) earns nothing.
    if profile.tail_chase_enabled && !hungry && (area as u32) < you.length * 2 {
        if let Some(tail) = you.tail() {
            let distance = pathfind::bfs_distance(state, &head, tail);
            if distance >= 0 {
                scores.tail_chase = profile.tail_chase_weight / (1.0 + distance as f64);
            }
        }
    }

    // 11. Sampled Voronoi control.
    if profile.voronoi_enabled {
        let sample = pathfind::voronoi_sample(board.width, board.height);
        let (won, total) = pathfind::voronoi_won(state, &sample);
        if total > 0 {
            scores.voronoi = won as f64 / total as f64 * profile.voronoi_weight;
        }
    }

    // 12. Competitive length: chase food for growth while the race is still
    // on; once two ahead of the longest opponent, stop caring.
    if profile.length_enabled && !hungry {
        if let Some(distance) = nearest_food_distance {
            let longest_opponent = state.opponents().map(|o| o.length).max().unwrap_or(0);
            if you.length < longest_opponent + 2 {
                let weight = if you.length < longest_opponent {
                    profile.length_critical_weight
                } else {
                    profile.length_weight
                };
                scores.length = weight / (1.0 + distance as f64);
            }
        }
    }

    scores
}

fn nearest_food_coord(state: &GameState, head: &Coord) -> Option<Coord> {
    state
        .board
        .food
        .iter()
        .min_by_key(|food| head.manhattan_distance(food))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::fixtures::*;
    use crate::game_state::Coord;
    use crate::sim;
    use crate::game_state::Move;

    fn default_profile() -> WeightProfile {
        WeightProfile::early()
    }

    #[test]
    fn out_of_bounds_dominates_everything() {
        let mut a = snake("a", &[(5, 5), (5, 4), (5, 3)], 100);
        a.head = Coord { x: -1, y: 5 };
        a.body[0] = a.head;
        let mut state = state(11, 11, &[(5, 6)], vec![a]);
        state.you = state.board.snakes[0].clone();
        for profile in [WeightProfile::early(), WeightProfile::mid(), WeightProfile::late()] {
            assert!(evaluate(&state, &profile) <= -1000.0);
        }
    }

    #[test]
    fn self_collision_dominates_everything() {
        // Head overlapping the snake's own middle segment.
        let a = snake("a", &[(5, 4), (5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![a]);
        for profile in [WeightProfile::early(), WeightProfile::mid(), WeightProfile::late()] {
            assert!(evaluate(&state, &profile) <= -1000.0);
        }
    }

    #[test]
    fn losing_head_to_head_dominates_everything() {
        // Both heads on the same cell, equal length: we lose.
        let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 100);
        let b = snake("b", &[(5, 5), (6, 5), (7, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        for profile in [WeightProfile::early(), WeightProfile::mid(), WeightProfile::late()] {
            assert!(evaluate(&state, &profile) <= -1000.0);
        }
    }

    #[test]
    fn winning_head_to_head_scores_positive() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3), (5, 2)], 100);
        let b = snake("b", &[(5, 5), (6, 5), (7, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert!(scores.head_to_head > 0.0);
    }

    #[test]
    fn open_space_scores_positive() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![a]);
        assert!(evaluate(&state, &default_profile()) > 0.0);
    }

    #[test]
    fn flood_fill_feeds_the_space_score() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 100);
        let state = state(11, 11, &[], vec![a]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert_eq!(scores.space, 120.0 * default_profile().space_weight);

        let blind = evaluate_breakdown(&state, &WeightProfile::cheap());
        assert_eq!(blind.space, 0.0);
    }

    #[test]
    fn adjacent_longer_head_is_penalised() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 100);
        let b = snake("b", &[(6, 5), (7, 5), (8, 5), (9, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert!(scores.adjacent_heads < 0.0);
        assert!(scores.head_danger < 0.0);
    }

    #[test]
    fn adjacent_shorter_head_is_an_opportunity() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3), (5, 2), (5, 1)], 100);
        let b = snake("b", &[(6, 5), (7, 5), (8, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert!(scores.adjacent_heads > 0.0);
        assert!(scores.head_danger > 0.0);
    }

    #[test]
    fn head_danger_covers_the_opponents_reach() {
        // Our head two steps away horizontally: not in reach, no term.
        let a = snake("a", &[(4, 5), (4, 4), (4, 3)], 100);
        let b = snake("b", &[(6, 5), (7, 5), (8, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert_eq!(scores.head_danger, 0.0);
    }

    #[test]
    fn hungry_snake_values_closer_food() {
        let profile = default_profile();
        let near = {
            let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 20);
            state(11, 11, &[(6, 5)], vec![a])
        };
        let far = {
            let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 20);
            state(11, 11, &[(10, 10)], vec![a])
        };
        let near_scores = evaluate_breakdown(&near, &profile);
        let far_scores = evaluate_breakdown(&far, &profile);
        assert!(near_scores.food > far_scores.food);
        assert!(far_scores.food > 0.0);
    }

    #[test]
    fn sated_snake_ignores_food_urgency() {
        let a = snake("a", &[(5, 5), (5, 4), (5, 3)], 90);
        let state = state(11, 11, &[(6, 5)], vec![a]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert_eq!(scores.food, 0.0);
    }

    #[test]
    fn food_in_a_tiny_pocket_is_discounted() {
        // Wall sealing off the right edge column except a pocket of 11 cells;
        // the only food sits inside the pocket.
        let body: Vec<(i32, i32)> = (0..11).map(|y| (9, y)).chain([(8, 10), (7, 10)]).collect();
        let wall = snake("wall", &body, 100);
        let a = snake("a", &[(4, 5), (4, 4), (4, 3)], 20);
        let state = state(11, 11, &[(10, 5)], vec![a, wall]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert!(scores.food_trap < 0.0);
    }

    #[test]
    fn tail_chase_fires_only_when_cramped() {
        // Healthy, sealed into a 15-cell pocket with our tail still
        // reachable: the chase term kicks in.
        let wall_body: Vec<(i32, i32)> = (1..11)
            .map(|x| (x, 6))
            .chain((0..6).rev().map(|y| (10, y)))
            .chain((6..10).rev().map(|x| (x, 0)))
            .chain((1..6).map(|y| (6, y)))
            .chain([(5, 5)])
            .collect();
        let wall = snake("wall", &wall_body, 100);
        let a = snake(
            "a",
            &[(7, 5), (7, 4), (7, 3), (7, 2), (7, 1), (8, 1), (9, 1), (9, 2)],
            90,
        );
        let cramped = state(11, 11, &[], vec![a, wall]);
        let scores = evaluate_breakdown(&cramped, &default_profile());
        assert!(scores.tail_chase > 0.0);

        // Same health in the open: no tail chasing.
        let b = snake("a", &[(5, 5), (5, 4), (5, 3)], 90);
        let open = state(11, 11, &[], vec![b]);
        assert_eq!(evaluate_breakdown(&open, &default_profile()).tail_chase, 0.0);
    }

    #[test]
    fn unreachable_tail_earns_nothing() {
        // Sealed into the corner by our own coil: cramped, but the walk to
        // the tail is cut off, so the chase term stays zero.
        let a = snake("a", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)], 90);
        let state = state(11, 11, &[], vec![a]);
        let scores = evaluate_breakdown(&state, &default_profile());
        assert_eq!(scores.tail_chase, 0.0);
    }

    #[test]
    fn voronoi_share_scales_the_weight() {
        let a = snake("a", &[(2, 5), (2, 4), (2, 3)], 100);
        let b = snake("b", &[(8, 5), (8, 4), (8, 3)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let scores = evaluate_breakdown(&state, &WeightProfile::mid());
        let profile = WeightProfile::mid();
        assert!(scores.voronoi > 0.0);
        assert!(scores.voronoi < profile.voronoi_weight);
    }

    #[test]
    fn length_race_stops_when_two_ahead() {
        let profile = default_profile();
        // Five long against three long: already two ahead, no length term.
        let a = snake("a", &[(5, 5), (5, 4), (5, 3), (5, 2), (5, 1)], 90);
        let b = snake("b", &[(9, 9), (9, 8), (9, 7)], 90);
        let ahead = state(11, 11, &[(0, 0)], vec![a, b]);
        assert_eq!(evaluate_breakdown(&ahead, &profile).length, 0.0);

        // Behind: the critical weight applies and beats the even-race weight.
        let c = snake("a", &[(5, 5), (5, 4), (5, 3)], 90);
        let d = snake("b", &[(9, 9), (9, 8), (9, 7), (9, 6), (9, 5)], 90);
        let behind = state(11, 11, &[(0, 0)], vec![c, d]);
        let behind_scores = evaluate_breakdown(&behind, &profile);
        assert!(behind_scores.length > 0.0);

        let e = snake("a", &[(5, 5), (5, 4), (5, 3)], 90);
        let f = snake("b", &[(9, 9), (9, 8), (9, 7)], 90);
        let even = state(11, 11, &[(0, 0)], vec![e, f]);
        let even_scores = evaluate_breakdown(&even, &profile);
        assert!(behind_scores.length > even_scores.length);
    }

    #[test]
    fn aggressive_collision_turns_positive_when_longer() {
        // Stepping right next to a shorter head flips the danger term into
        // a bonus: the trade would go our way.
        let a = snake("a", &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], 100);
        let b = snake("b", &[(7, 5), (8, 5), (9, 5)], 100);
        let state = state(11, 11, &[], vec![a, b]);
        let next = sim::advance_our_move(&state, Move::Right);
        let scores = evaluate_breakdown(&next, &default_profile());
        assert!(scores.head_danger > 0.0);
    }
}
