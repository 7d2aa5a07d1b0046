use crate::game_state::{GameState, Move};

// Safe moves for our snake, in the fixed Up/Down/Left/Right order.
pub fn safe_moves(state: &GameState) -> Vec<Move> {
    safe_moves_for(state, &state.you.id)
}

// Safe moves for any snake on the board: the target cell must stay in bounds
// and off every snake's non-tail body cells. Tail tips vacate next turn, so
// moving onto one is allowed. An empty result means the snake is boxed in.
pub fn safe_moves_for(state: &GameState, snake_id: &str) -> Vec<Move> {
    let snake = match state.snake_by_id(snake_id) {
        Some(snake) => snake,
        None => return Vec::new(),
    };

    let mut moves = Vec::new();
    for direction in Move::ALL {
        let target = snake.head.apply_move(direction);
        if !state.board.in_bounds(&target) {
            continue;
        }
        if state.board.is_blocked(&target) {
            continue;
        }
        moves.push(direction);
    }
    moves
}
