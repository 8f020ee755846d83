//! Core game logic module
//!
//! This module contains all the simulation rules without any I/O or
//! rendering dependencies: movement, boundary handling, collisions and
//! hazard spawning over one explicit `GameState`.

pub mod action;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod mini_snake;
pub mod movement;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BombConfig, GameConfig, MiniSnakeConfig, SpeedConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use geometry::Geometry;
pub use mini_snake::{MiniSnake, SegmentTag};
pub use state::{Bomb, Cell, GameMode, GameState, Snake, Status, TerminationCause};
