//! Placement of food, bombs and the mini-snake

use rand::Rng;
use tracing::warn;

use super::config::{BombConfig, MiniSnakeConfig};
use super::mini_snake::MiniSnake;
use super::state::{Bomb, Cell, GameState};

/// Uniform random cell on the grid
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, grid_count: i32) -> Cell {
    Cell::new(rng.gen_range(0..grid_count), rng.gen_range(0..grid_count))
}

/// Pick a food cell clear of the snake, bombs and mini-snake
///
/// Samples up to `max_attempts` random cells, then scans the grid row by
/// row. Returns `None` only when every cell is taken.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    state: &GameState,
    max_attempts: usize,
) -> Option<Cell> {
    for _ in 0..max_attempts {
        let cell = random_cell(rng, state.grid_count);
        if !state.is_occupied(cell) {
            return Some(cell);
        }
    }

    let found = (0..state.grid_count)
        .flat_map(|y| (0..state.grid_count).map(move |x| Cell::new(x, y)))
        .find(|&cell| !state.is_occupied(cell));
    if found.is_none() {
        warn!("No free cell left for food");
    }
    found
}

/// Try to add one bomb this tick
///
/// A single candidate is drawn; if it lands on the snake or the food it is
/// discarded rather than redrawn.
pub fn try_spawn_bomb<R: Rng + ?Sized>(
    rng: &mut R,
    state: &GameState,
    config: &BombConfig,
    now: u64,
) -> Option<Bomb> {
    if state.bombs.len() >= config.limit {
        return None;
    }

    let cell = random_cell(rng, state.grid_count);
    if state.snake.occupies(cell) || cell == state.food {
        return None;
    }
    Some(Bomb::new(cell, now))
}

/// Drop bombs that reached their lifetime; returns how many were removed
pub fn expire_bombs(bombs: &mut Vec<Bomb>, now: u64, lifetime_ms: u64) -> usize {
    let before = bombs.len();
    bombs.retain(|b| !b.is_expired(now, lifetime_ms));
    before - bombs.len()
}

/// Spawn the mini-snake at a random cell, ignoring what is already there
pub fn spawn_mini_snake<R: Rng + ?Sized>(
    rng: &mut R,
    grid_count: i32,
    config: &MiniSnakeConfig,
) -> MiniSnake {
    let cell = random_cell(rng, grid_count);
    MiniSnake::spawn(rng, cell, config.length)
}
