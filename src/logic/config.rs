use crate::game_state::GameState;

// Game phase, selected once per decision from turn, opponent count, and
// board occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Early,
    Mid,
    Late,
}

const EARLY_TURN_LIMIT: u32 = 75;
const CRAMPED_DENSITY_PERCENT: u32 = 40;

impl Phase {
    pub fn detect(state: &GameState) -> Phase {
        let opponents = state.board.snakes.len().saturating_sub(1);
        let density = state.board.density_percent();

        if opponents <= 2 || density > CRAMPED_DENSITY_PERCENT {
            Phase::Late
        } else if state.turn <= EARLY_TURN_LIMIT {
            Phase::Early
        } else {
            Phase::Mid
        }
    }

    pub fn profile(&self) -> WeightProfile {
        match self {
            Phase::Early => WeightProfile::early(),
            Phase::Mid => WeightProfile::mid(),
            Phase::Late => WeightProfile::late(),
        }
    }
}

/// Per-heuristic enable flags, weights, and thresholds. Immutable within a
/// single decision; the phase selector (and the food-competition rewrite)
/// picks the values before the search starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    // Hard safety terms are always active.
    pub out_of_bounds_penalty: f64,
    pub self_collision_penalty: f64,
    pub head_to_head_win_bonus: f64,
    pub head_to_head_loss_penalty: f64,

    pub flood_fill_enabled: bool,
    pub space_weight: f64,

    pub adjacent_head_enabled: bool,
    pub adjacent_head_win_bonus: f64,
    pub adjacent_head_loss_penalty: f64,

    pub head_danger_enabled: bool,
    pub head_danger_win_bonus: f64,
    pub head_danger_loss_penalty: f64,

    pub center_control_enabled: bool,
    pub center_bonus: f64,
    pub wall_touch_penalty: f64,
    pub center_turn_cutoff: u32,

    pub food_enabled: bool,
    pub food_weight: f64,
    pub food_health_threshold: i32,

    pub food_trap_enabled: bool,
    pub food_trap_penalty: f64,

    pub tail_chase_enabled: bool,
    pub tail_chase_weight: f64,

    pub voronoi_enabled: bool,
    pub voronoi_weight: f64,

    pub length_enabled: bool,
    pub length_weight: f64,
    pub length_critical_weight: f64,
}

impl WeightProfile {
    fn base() -> WeightProfile {
        WeightProfile {
            out_of_bounds_penalty: -2500.0,
            self_collision_penalty: -2500.0,
            head_to_head_win_bonus: 400.0,
            head_to_head_loss_penalty: -2000.0,

            flood_fill_enabled: true,
            space_weight: 1.5,

            adjacent_head_enabled: true,
            adjacent_head_win_bonus: 40.0,
            adjacent_head_loss_penalty: -150.0,

            head_danger_enabled: true,
            head_danger_win_bonus: 75.0,
            head_danger_loss_penalty: -800.0,

            center_control_enabled: true,
            center_bonus: 15.0,
            wall_touch_penalty: -8.0,
            center_turn_cutoff: EARLY_TURN_LIMIT,

            food_enabled: true,
            food_weight: 150.0,
            food_health_threshold: 40,

            food_trap_enabled: true,
            food_trap_penalty: -80.0,

            tail_chase_enabled: true,
            tail_chase_weight: 25.0,

            voronoi_enabled: false,
            voronoi_weight: 100.0,

            length_enabled: true,
            length_weight: 60.0,
            length_critical_weight: 110.0,
        }
    }

    // Food and growth emphasised; Voronoi control off.
    pub fn early() -> WeightProfile {
        WeightProfile::base()
    }

    // Positioning and territory emphasised; food pursued only when hungry.
    pub fn mid() -> WeightProfile {
        WeightProfile {
            space_weight: 2.0,
            food_weight: 100.0,
            voronoi_enabled: true,
            voronoi_weight: 120.0,
            length_weight: 50.0,
            length_critical_weight: 100.0,
            ..WeightProfile::base()
        }
    }

    // Survival: space and tail chasing dominate, growth racing is off.
    pub fn late() -> WeightProfile {
        WeightProfile {
            space_weight: 3.0,
            tail_chase_weight: 60.0,
            food_health_threshold: 50,
            center_control_enabled: false,
            voronoi_enabled: false,
            length_enabled: false,
            ..WeightProfile::base()
        }
    }

    // Deadline escape: everything that walks the board is off, so a single
    // evaluation costs microseconds.
    pub fn cheap() -> WeightProfile {
        WeightProfile {
            flood_fill_enabled: false,
            voronoi_enabled: false,
            tail_chase_enabled: false,
            food_trap_enabled: false,
            ..WeightProfile::base()
        }
    }

    // Fixed profile the opponent predictor scores with: safeties and space
    // on, hungrier food threshold, a strong refusal to trade heads, and all
    // strategic terms off.
    pub fn opponent() -> WeightProfile {
        WeightProfile {
            space_weight: 1.0,
            food_health_threshold: 50,
            head_danger_win_bonus: 50.0,
            head_danger_loss_penalty: -1200.0,
            adjacent_head_win_bonus: 20.0,
            adjacent_head_loss_penalty: -200.0,
            center_control_enabled: false,
            food_trap_enabled: false,
            tail_chase_enabled: false,
            voronoi_enabled: false,
            length_enabled: false,
            ..WeightProfile::base()
        }
    }

    // Contested-food rewrite: stop fighting for territory, race for food.
    pub fn apply_food_competition(&mut self) {
        self.voronoi_enabled = false;
        self.center_control_enabled = false;
        self.food_weight *= 1.5;
        self.length_weight *= 1.5;
        self.length_critical_weight *= 1.4;
        self.food_health_threshold = (self.food_health_threshold + 25).min(100);
    }
}

// Detects food scarcity with opponents better placed than us: fewer than 1.5
// food per snake, and more than half of the opponents strictly closer to
// their nearest food than we are to ours.
pub fn food_competition_detected(state: &GameState) -> bool {
    let snakes = state.board.snakes.len();
    if snakes == 0 || state.board.food.is_empty() {
        return false;
    }
    if (state.board.food.len() as f64) / (snakes as f64) >= 1.5 {
        return false;
    }

    let nearest_food = |head: &crate::game_state::Coord| {
        state
            .board
            .food
            .iter()
            .map(|food| head.manhattan_distance(food))
            .min()
    };

    let ours = match nearest_food(&state.you.head) {
        Some(distance) => distance,
        None => return false,
    };

    let opponents: Vec<u32> = state
        .opponents()
        .filter_map(|opponent| nearest_food(&opponent.head))
        .collect();
    if opponents.is_empty() {
        return false;
    }

    let closer = opponents.iter().filter(|&&distance| distance < ours).count();
    closer * 2 > opponents.len()
}
