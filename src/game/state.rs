use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::mini_snake::MiniSnake;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The player snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
}

impl Snake {
    /// Create a one-segment snake
    pub fn new(head: Cell) -> Self {
        Self { body: vec![head] }
    }

    /// Create a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Cell>) -> Self {
        debug_assert!(!body.is_empty());
        Self { body }
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Cell] {
        &self.body[1..]
    }

    /// Check if a cell collides with the body (excluding head)
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.body_segments().contains(&cell)
    }

    /// Check if any segment, head included, is on a cell
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Prepend a new head, dropping the tail unless growing
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Boundary rule for the player snake
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Leaving the grid ends the session
    #[default]
    Classic,
    /// Leaving the grid re-enters from the opposite edge
    Portal,
}

impl GameMode {
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Portal => "Portal",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            GameMode::Classic => GameMode::Portal,
            GameMode::Portal => GameMode::Classic,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A timed hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bomb {
    pub cell: Cell,
    /// Creation time in clock milliseconds
    pub created_at: u64,
}

impl Bomb {
    pub fn new(cell: Cell, created_at: u64) -> Self {
        Self { cell, created_at }
    }

    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    pub fn is_expired(&self, now: u64, lifetime_ms: u64) -> bool {
        self.age(now) >= lifetime_ms
    }
}

/// What ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// Snake left the grid in classic mode
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake ran into a bomb
    Bomb,
    /// Snake ran into the mini-snake
    MiniSnake,
}

impl TerminationCause {
    pub fn describe(&self) -> &'static str {
        match self {
            TerminationCause::Wall => "hit the wall",
            TerminationCause::SelfCollision => "bit itself",
            TerminationCause::Bomb => "stepped on a bomb",
            TerminationCause::MiniSnake => "ran into the mini-snake",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated(TerminationCause),
}

/// Complete session state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction of travel; `None` until the first key press
    pub heading: Option<Direction>,
    pub food: Cell,
    pub bombs: Vec<Bomb>,
    pub mini_snake: Option<MiniSnake>,
    pub grid_count: i32,
    pub mode: GameMode,
    pub score: u32,
    pub steps: u32,
    pub status: Status,
}

impl GameState {
    /// Create a fresh running state with no hazards
    pub fn new(snake: Snake, food: Cell, grid_count: i32, mode: GameMode) -> Self {
        Self {
            snake,
            heading: None,
            food,
            bombs: Vec::new(),
            mini_snake: None,
            grid_count,
            mode,
            score: 0,
            steps: 0,
            status: Status::Running,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Running
    }

    /// Check if a cell is within the grid bounds
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        (0..self.grid_count).contains(&cell.x) && (0..self.grid_count).contains(&cell.y)
    }

    pub fn has_bomb_at(&self, cell: Cell) -> bool {
        self.bombs.iter().any(|b| b.cell == cell)
    }

    pub fn has_mini_snake_at(&self, cell: Cell) -> bool {
        self.mini_snake.as_ref().is_some_and(|m| m.occupies(cell))
    }

    /// Check if a cell is taken by the snake, a bomb or the mini-snake
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.occupies(cell) || self.has_bomb_at(cell) || self.has_mini_snake_at(cell)
    }

    /// Request a new heading; a direct reversal of the current heading is ignored
    pub fn steer(&mut self, direction: Direction) {
        self.heading = super::movement::steer(self.heading, direction);
    }
}
