//! Head advance and the per-mode boundary rule

use super::action::{heading_delta, Direction};
use super::state::{Cell, GameMode, Snake};

/// Portal wrap for one axis: stepping off one edge lands on the opposite one
pub fn wrap_coordinate(coord: i32, grid_count: i32) -> i32 {
    if coord < 0 {
        grid_count - 1
    } else if coord >= grid_count {
        0
    } else {
        coord
    }
}

/// Apply the boundary rule of a mode to a freshly advanced head
///
/// Classic mode leaves out-of-range cells untouched; the collision check
/// is what ends the session.
pub fn apply_boundary(cell: Cell, mode: GameMode, grid_count: i32) -> Cell {
    match mode {
        GameMode::Portal => Cell::new(
            wrap_coordinate(cell.x, grid_count),
            wrap_coordinate(cell.y, grid_count),
        ),
        GameMode::Classic => cell,
    }
}

/// Where the head of the snake will be after one tick
pub fn next_head(
    snake: &Snake,
    heading: Option<Direction>,
    mode: GameMode,
    grid_count: i32,
) -> Cell {
    let (dx, dy) = heading_delta(heading);
    apply_boundary(snake.head().moved_by(dx, dy), mode, grid_count)
}

/// Resolve a requested turn against the current heading
pub fn steer(current: Option<Direction>, requested: Direction) -> Option<Direction> {
    match current {
        Some(heading) if heading.is_opposite(requested) => current,
        _ => Some(requested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_wrap_stays_in_grid() {
        let n = 20;
        for coord in -n..2 * n {
            let wrapped = wrap_coordinate(coord, n);
            assert!((0..n).contains(&wrapped), "{coord} wrapped to {wrapped}");
        }
        assert_eq!(wrap_coordinate(-1, n), 19);
        assert_eq!(wrap_coordinate(20, n), 0);
        assert_eq!(wrap_coordinate(7, n), 7);
    }

    #[test]
    fn test_classic_passes_through() {
        let cell = Cell::new(20, -1);
        assert_eq!(apply_boundary(cell, GameMode::Classic, 20), cell);
        assert_eq!(
            apply_boundary(cell, GameMode::Portal, 20),
            Cell::new(0, 19)
        );
    }

    #[test]
    fn test_next_head() {
        let snake = Snake::new(Cell::new(19, 10));
        assert_eq!(
            next_head(&snake, Some(Direction::Right), GameMode::Classic, 20),
            Cell::new(20, 10)
        );
        assert_eq!(
            next_head(&snake, Some(Direction::Right), GameMode::Portal, 20),
            Cell::new(0, 10)
        );
        assert_eq!(
            next_head(&snake, None, GameMode::Classic, 20),
            Cell::new(19, 10)
        );
    }

    #[test]
    fn test_prevent_reversal() {
        assert_eq!(
            steer(Some(Direction::Right), Direction::Left),
            Some(Direction::Right)
        );
        assert_eq!(
            steer(Some(Direction::Up), Direction::Down),
            Some(Direction::Up)
        );
        assert_eq!(
            steer(Some(Direction::Right), Direction::Down),
            Some(Direction::Down)
        );
        // A stationary snake accepts any direction
        assert_eq!(steer(None, Direction::Left), Some(Direction::Left));
    }

    #[test]
    fn test_latest_turn_wins() {
        // Two quick turns before a tick chain against the latest heading
        let heading = steer(Some(Direction::Right), Direction::Up);
        let heading = steer(heading, Direction::Left);
        assert_eq!(heading, Some(Direction::Left));
    }
}
