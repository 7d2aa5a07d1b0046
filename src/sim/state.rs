use crate::game_state::{Battlesnake, GameState, Move};

/// Advances one turn with only our snake moving: the head advances one cell,
/// the tail drops, health goes down by one. Every other snake keeps its
/// position and loses one health.
///
/// Food consumption is deliberately not modelled: length never changes inside
/// the tree, and health is never restored or clamped. The evaluator's food
/// and head-collision heuristics carry that weight instead.
pub fn advance_our_move(state: &GameState, our_move: Move) -> GameState {
    advance(state, our_move, None)
}

/// Variant of [`advance_our_move`] that additionally moves one opponent by
/// the same rules. Used while opponent prediction is active in the shallow
/// plies of the search.
pub fn advance_with_opponent(
    state: &GameState,
    our_move: Move,
    opponent_id: &str,
    opponent_move: Move,
) -> GameState {
    advance(state, our_move, Some((opponent_id, opponent_move)))
}

fn advance(state: &GameState, our_move: Move, opponent: Option<(&str, Move)>) -> GameState {
    let mut next = state.clone();
    next.turn = state.turn + 1;

    for snake in &mut next.board.snakes {
        if snake.id == state.you.id {
            step_snake(snake, our_move);
        } else if let Some((opponent_id, opponent_move)) = opponent {
            if snake.id == opponent_id {
                step_snake(snake, opponent_move);
            } else {
                snake.health -= 1;
            }
        } else {
            snake.health -= 1;
        }
    }

    // Keep the `you` copy in sync with its board entry.
    if let Some(updated) = next.board.snakes.iter().find(|s| s.id == next.you.id) {
        next.you = updated.clone();
    } else {
        step_snake(&mut next.you, our_move);
    }

    next
}

// New head prepended, tail dropped; length stays constant.
fn step_snake(snake: &mut Battlesnake, direction: Move) {
    let new_head = snake.head.apply_move(direction);
    let mut body = Vec::with_capacity(snake.body.len());
    body.push(new_head);
    body.extend(snake.body.iter().take(snake.body.len().saturating_sub(1)));
    snake.body = body;
    snake.head = new_head;
    snake.health -= 1;
}
