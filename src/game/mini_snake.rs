//! The roaming mini-snake obstacle
//!
//! It ignores the player and the game mode: it always wraps at the grid
//! edges and only moves every few ticks.

use rand::Rng;

use super::action::Direction;
use super::state::Cell;

/// Display tag of a mini-snake segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTag {
    Red,
    Blue,
    Green,
}

impl SegmentTag {
    const ALL: [SegmentTag; 3] = [SegmentTag::Red, SegmentTag::Blue, SegmentTag::Green];

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiniSnake {
    /// Segments, head first
    pub body: Vec<Cell>,
    /// One tag per segment
    pub tags: Vec<SegmentTag>,
    pub direction: Direction,
    /// Ticks since the last move
    pub move_counter: u32,
}

impl MiniSnake {
    /// Spawn with every segment stacked on one cell, heading left or right
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, cell: Cell, length: usize) -> Self {
        let tags = (0..length).map(|_| SegmentTag::random(rng)).collect();
        let direction = if rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        };

        Self {
            body: vec![cell; length],
            tags,
            direction,
            move_counter: 0,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Count one tick and move if it is this snake's turn
    ///
    /// Returns true when the mini-snake moved.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid_count: i32,
        move_every: u32,
        turn_chance: f64,
    ) -> bool {
        self.move_counter += 1;
        if self.move_counter < move_every {
            return false;
        }
        self.move_counter = 0;

        if rng.gen_bool(turn_chance) {
            self.direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        }

        let (dx, dy) = self.direction.delta();
        let head = self.head();
        let new_head = Cell::new(
            (head.x + dx).rem_euclid(grid_count),
            (head.y + dy).rem_euclid(grid_count),
        );
        self.body.insert(0, new_head);
        self.body.pop();
        true
    }
}
