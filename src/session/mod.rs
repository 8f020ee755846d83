//! Session control: the tick timer and the controller that owns a game

pub mod controller;
pub mod scheduler;

pub use controller::{GameOver, SessionController};
pub use scheduler::TickScheduler;
