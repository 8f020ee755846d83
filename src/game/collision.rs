//! Terminal condition checks
//!
//! All checks are pure predicates over the state; the engine decides when
//! to run them and applies the resulting status.

use super::state::{GameMode, GameState, TerminationCause};

/// Classic mode only: the head left the grid
pub fn check_boundary(state: &GameState) -> Option<TerminationCause> {
    if state.mode == GameMode::Classic && !state.is_in_bounds(state.snake.head()) {
        return Some(TerminationCause::Wall);
    }
    None
}

/// The head landed on another segment of the snake
pub fn check_self(state: &GameState) -> Option<TerminationCause> {
    let snake = &state.snake;
    if snake.collides_with_body(snake.head()) {
        return Some(TerminationCause::SelfCollision);
    }
    None
}

/// The head landed on a bomb or on the mini-snake
pub fn check_hazards(state: &GameState) -> Option<TerminationCause> {
    let head = state.snake.head();
    if state.has_bomb_at(head) {
        return Some(TerminationCause::Bomb);
    }
    if state.has_mini_snake_at(head) {
        return Some(TerminationCause::MiniSnake);
    }
    None
}

/// Checks that run right after the snake moves
pub fn check_movement(state: &GameState) -> Option<TerminationCause> {
    check_boundary(state).or_else(|| check_self(state))
}
