//! Rabbit Snake - a terminal snake game with classic and portal modes
//!
//! This library provides:
//! - Core game logic: movement, collisions, hazards (game module)
//! - Tick scheduling and session control (session module)
//! - Bounded, persisted session history (history module)
//! - TUI rendering and keyboard input (render and input modules)
//! - The interactive terminal runtime (modes module)

pub mod error;
pub mod game;
pub mod history;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
