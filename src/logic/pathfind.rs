use std::collections::{HashSet, VecDeque};

use crate::game_state::{Coord, GameState};

// Builds the blocked set once per query: every snake's non-tail body cells.
fn blocked_cells(state: &GameState) -> HashSet<Coord> {
    state
        .board
        .snakes
        .iter()
        .flat_map(|snake| snake.non_tail_segments())
        .copied()
        .collect()
}

// Counts cells reachable from `start` over 4-connected passable cells. The
// start cell itself is exempt from the occupancy check (it is usually a snake
// head, which occupies its own cell); out-of-bounds starts count zero.
//
// Callers evaluating a state must run this at most once and reuse the count.
pub fn flood_fill(state: &GameState, start: &Coord) -> usize {
    if !state.board.in_bounds(start) {
        return 0;
    }

    let blocked = blocked_cells(state);
    let mut visited: HashSet<Coord> = HashSet::new();
    let mut queue: VecDeque<Coord> = VecDeque::new();

    visited.insert(*start);
    queue.push_back(*start);

    while let Some(cell) = queue.pop_front() {
        for neighbour in cell.neighbours() {
            if !state.board.in_bounds(&neighbour) {
                continue;
            }
            if visited.contains(&neighbour) {
                continue;
            }
            if blocked.contains(&neighbour) {
                continue;
            }
            visited.insert(neighbour);
            queue.push_back(neighbour);
        }
    }

    visited.len()
}

// Shortest move count from `from` to `to` under the same passability rule as
// `flood_fill`. Returns -1 when unreachable.
pub fn bfs_distance(state: &GameState, from: &Coord, to: &Coord) -> i32 {
    if !state.board.in_bounds(from) || !state.board.in_bounds(to) {
        return -1;
    }
    if from == to {
        return 0;
    }

    let blocked = blocked_cells(state);
    let mut visited: HashSet<Coord> = HashSet::new();
    let mut queue: VecDeque<(Coord, i32)> = VecDeque::new();

    visited.insert(*from);
    queue.push_back((*from, 0));

    while let Some((cell, distance)) = queue.pop_front() {
        for neighbour in cell.neighbours() {
            if neighbour == *to {
                return distance + 1;
            }
            if !state.board.in_bounds(&neighbour) {
                continue;
            }
            if visited.contains(&neighbour) {
                continue;
            }
            if blocked.contains(&neighbour) {
                continue;
            }
            visited.insert(neighbour);
            queue.push_back((neighbour, distance + 1));
        }
    }

    -1
}

// A fixed sample of strategic tiles, derived only from the board dimensions:
// the center cross plus an even-stride grid, all filtered to in-bounds. On a
// standard 11x11 board this lands at 25 tiles.
pub fn voronoi_sample(width: i32, height: i32) -> Vec<Coord> {
    let cx = width / 2;
    let cy = height / 2;

    let mut tiles: Vec<Coord> = Vec::new();
    let mut push = |tile: Coord| {
        let in_bounds = tile.x >= 0 && tile.x < width && tile.y >= 0 && tile.y < height;
        if in_bounds && !tiles.contains(&tile) {
            tiles.push(tile);
        }
    };

    // Center cross.
    push(Coord { x: cx, y: cy });
    push(Coord { x: cx, y: cy + 2 });
    push(Coord { x: cx, y: cy - 2 });
    push(Coord { x: cx - 2, y: cy });
    push(Coord { x: cx + 2, y: cy });

    // Even-stride grid, strided per axis so rectangular boards stay small.
    let stride_x = (width / 4).max(2);
    let stride_y = (height / 4).max(2);
    let mut y = stride_y / 2;
    while y < height {
        let mut x = stride_x / 2;
        while x < width {
            push(Coord { x, y });
            x += stride_x;
        }
        y += stride_y;
    }

    tiles
}

// Counts sampled tiles strictly closer (by Manhattan distance) to our head
// than to every opponent head. Distances ignore passability; that
// overestimate is accepted for speed.
pub fn voronoi_won(state: &GameState, sample: &[Coord]) -> (usize, usize) {
    let our_head = state.you.head;
    let won = sample
        .iter()
        .filter(|tile| {
            let ours = our_head.manhattan_distance(tile);
            state
                .opponents()
                .all(|opponent| ours < opponent.head.manhattan_distance(tile))
        })
        .count();
    (won, sample.len())
}
