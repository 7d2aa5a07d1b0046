use serde::{Deserialize, Serialize};

// Represents the primary directions a Battlesnake can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    // Fixed generation order; safe-move generation and tie-breaking rely on it.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    // Convert Move enum to the string expected by the Battlesnake API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }

    // Position of this direction inside `ALL`.
    pub fn rank(&self) -> u32 {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    // Returns the 4 neighbouring coordinates, in `Move::ALL` order.
    pub fn neighbours(&self) -> [Coord; 4] {
        [
            Coord { x: self.x, y: self.y + 1 },
            Coord { x: self.x, y: self.y - 1 },
            Coord { x: self.x - 1, y: self.y },
            Coord { x: self.x + 1, y: self.y },
        ]
    }

    // Calculates the coordinate resulting from applying a move.
    pub fn apply_move(&self, direction: Move) -> Coord {
        match direction {
            Move::Up => Coord { x: self.x, y: self.y + 1 },
            Move::Down => Coord { x: self.x, y: self.y - 1 },
            Move::Left => Coord { x: self.x - 1, y: self.y },
            Move::Right => Coord { x: self.x + 1, y: self.y },
        }
    }

    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub ruleset: Ruleset,
    // Per-move response window in milliseconds, reported by the engine.
    pub timeout: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Ruleset {
    pub name: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    // i32 rather than the wire's 0..=100: the search decrements health
    // without clamping while walking the tree.
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: u32,
}

impl Battlesnake {
    pub fn tail(&self) -> Option<&Coord> {
        self.body.last()
    }

    // Body cells that still block movement next turn. The tail tip vacates
    // when the snake advances, so it is excluded.
    pub fn non_tail_segments(&self) -> impl Iterator<Item = &Coord> {
        let len = self.body.len();
        self.body.iter().take(len.saturating_sub(1))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub hazards: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
}

impl Board {
    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    // True when `coord` is covered by any snake's non-tail body cells.
    pub fn is_blocked(&self, coord: &Coord) -> bool {
        self.snakes
            .iter()
            .any(|snake| snake.non_tail_segments().any(|segment| segment == coord))
    }

    pub fn center(&self) -> Coord {
        Coord { x: self.width / 2, y: self.height / 2 }
    }

    // The central 5x5 region used by the center-control heuristic.
    pub fn in_center_region(&self, coord: &Coord) -> bool {
        let center = self.center();
        (coord.x - center.x).abs() <= 2 && (coord.y - center.y).abs() <= 2
    }

    pub fn on_edge(&self, coord: &Coord) -> bool {
        coord.x == 0 || coord.y == 0 || coord.x == self.width - 1 || coord.y == self.height - 1
    }

    // Occupancy as a percentage of board cells: sum of lengths * 100 / (w*h).
    pub fn density_percent(&self) -> u32 {
        let cells = (self.width * self.height) as u32;
        if cells == 0 {
            return 0;
        }
        let occupied: u32 = self.snakes.iter().map(|s| s.length).sum();
        occupied * 100 / cells
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    pub turn: u32,
    pub board: Board,
    pub you: Battlesnake,
}

impl GameState {
    pub fn opponents(&self) -> impl Iterator<Item = &Battlesnake> {
        self.board.snakes.iter().filter(move |s| s.id != self.you.id)
    }

    pub fn snake_by_id(&self, id: &str) -> Option<&Battlesnake> {
        self.board.snakes.iter().find(|s| s.id == id)
    }

    // Re-views the same board from another snake's perspective. Returns None
    // if the id is not on the board.
    pub fn from_perspective(&self, snake_id: &str) -> Option<GameState> {
        let you = self.snake_by_id(snake_id)?.clone();
        let mut state = self.clone();
        state.you = you;
        Some(state)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn snake(id: &str, body: &[(i32, i32)], health: i32) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            head: body[0],
            length: body.len() as u32,
            body,
        }
    }

    // Builds a GameState where `you` is the first snake in `snakes`.
    pub fn state(
        width: i32,
        height: i32,
        food: &[(i32, i32)],
        snakes: Vec<Battlesnake>,
    ) -> GameState {
        GameState {
            game: Game {
                id: "game-1".to_string(),
                ruleset: Ruleset {
                    name: "standard".to_string(),
                    version: "v1".to_string(),
                },
                timeout: 500,
            },
            turn: 0,
            board: Board {
                width,
                height,
                food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
                hazards: Vec::new(),
                snakes: snakes.clone(),
            },
            you: snakes[0].clone(),
        }
    }
}
