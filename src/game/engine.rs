use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    clock::{Clock, SystemClock},
    collision,
    config::GameConfig,
    movement,
    spawn,
    state::{GameMode, GameState, Snake, Status, TerminationCause},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// What ended the session, if this step ended it
    pub collision: Option<TerminationCause>,
    /// Whether a bomb appeared this step
    pub bomb_spawned: bool,
    /// Whether the mini-snake appeared this step
    pub mini_snake_spawned: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session is over after this step
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Randomness and time are owned by the engine so that a seeded RNG and a
/// manual clock make every step reproducible.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    clock: Arc<dyn Clock>,
}

impl GameEngine {
    /// Create a new game engine with entropy-seeded randomness and the system clock
    pub fn new(config: GameConfig) -> Self {
        Self::with_parts(config, StdRng::from_entropy(), Arc::new(SystemClock::new()))
    }

    /// Create an engine with an explicit RNG and clock
    pub fn with_parts(config: GameConfig, rng: StdRng, clock: Arc<dyn Clock>) -> Self {
        Self { config, rng, clock }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh session in the given mode
    pub fn reset(&mut self, mode: GameMode) -> GameState {
        let snake = Snake::new(self.config.start);
        let mut state = GameState::new(snake, self.config.start, self.config.grid_count, mode);

        match spawn::place_food(&mut self.rng, &state, self.config.spawn_attempts) {
            Some(food) => state.food = food,
            None => warn!("Grid has no room for food at session start"),
        }

        info!(mode = %mode, food = ?state.food, "New session");
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive() {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let mut info = StepInfo::default();

        let new_head =
            movement::next_head(&state.snake, state.heading, state.mode, state.grid_count);
        info.ate_food = new_head == state.food;
        state.snake.advance(new_head, info.ate_food);
        state.steps += 1;

        if info.ate_food {
            state.score += self.config.score_per_food;
            debug!(score = state.score, "Food eaten");
            if let Some(food) =
                spawn::place_food(&mut self.rng, state, self.config.spawn_attempts)
            {
                state.food = food;
            }
        }

        if let Some(cause) = collision::check_movement(state) {
            return self.terminate(state, cause, info);
        }

        self.update_hazards(state, &mut info);

        if let Some(cause) = collision::check_hazards(state) {
            return self.terminate(state, cause, info);
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    /// Expire and spawn bombs, then spawn and move the mini-snake
    fn update_hazards(&mut self, state: &mut GameState, info: &mut StepInfo) {
        let now = self.clock.now_ms();
        let bombs = &self.config.bombs;

        let expired = spawn::expire_bombs(&mut state.bombs, now, bombs.lifetime_ms);
        if expired > 0 {
            debug!(expired, "Bombs expired");
        }

        if state.score >= bombs.score_threshold && self.rng.gen_bool(bombs.spawn_chance) {
            if let Some(bomb) = spawn::try_spawn_bomb(&mut self.rng, state, bombs, now) {
                debug!(cell = ?bomb.cell, "Bomb placed");
                state.bombs.push(bomb);
                info.bomb_spawned = true;
            }
        }

        let mini = &self.config.mini_snake;
        if state.score >= mini.score_threshold && state.mini_snake.is_none() {
            let spawned = spawn::spawn_mini_snake(&mut self.rng, state.grid_count, mini);
            info!(cell = ?spawned.head(), "Mini-snake appeared");
            state.mini_snake = Some(spawned);
            info.mini_snake_spawned = true;
        }

        if let Some(roamer) = state.mini_snake.as_mut() {
            roamer.advance(
                &mut self.rng,
                state.grid_count,
                mini.move_every,
                mini.turn_chance,
            );
        }
    }

    fn terminate(
        &mut self,
        state: &mut GameState,
        cause: TerminationCause,
        mut info: StepInfo,
    ) -> StepResult {
        state.status = Status::Terminated(cause);
        info.collision = Some(cause);
        info!(score = state.score, cause = ?cause, "Session over");

        StepResult {
            terminated: true,
            info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use crate::game::clock::ManualClock;
    use crate::game::mini_snake::{MiniSnake, SegmentTag};
    use crate::game::state::{Bomb, Cell};

    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.bombs.spawn_chance = 0.0;
        config.mini_snake.turn_chance = 0.0;
        config
    }

    fn engine_with(config: GameConfig, seed: u64) -> (GameEngine, ManualClock) {
        let clock = ManualClock::new();
        let engine =
            GameEngine::with_parts(config, StdRng::seed_from_u64(seed), Arc::new(clock.clone()));
        (engine, clock)
    }

    fn running_state(head: Cell, heading: Direction, food: Cell, mode: GameMode) -> GameState {
        let mut state = GameState::new(Snake::new(head), food, 20, mode);
        state.heading = Some(heading);
        state
    }

    #[test]
    fn test_reset() {
        let (mut engine, _) = engine_with(GameConfig::default(), 1);
        let state = engine.reset(GameMode::Portal);

        assert!(state.is_alive());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(state.heading, None);
        assert_eq!(state.mode, GameMode::Portal);
        assert!(state.bombs.is_empty());
        assert!(state.mini_snake.is_none());
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_stationary_snake_stays_put() {
        let (mut engine, _) = engine_with(quiet_config(), 2);
        let mut state = engine.reset(GameMode::Classic);

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state.snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_food_consumption() {
        let (mut engine, _) = engine_with(quiet_config(), 3);
        let mut state = running_state(
            Cell::new(10, 10),
            Direction::Right,
            Cell::new(11, 10),
            GameMode::Classic,
        );

        let result = engine.step(&mut state);

        assert!(result.info.ate_food);
        assert!(!result.terminated);
        assert_eq!(state.snake.body, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(state.score, 10);
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn test_length_preserved_without_food() {
        let (mut engine, _) = engine_with(quiet_config(), 4);
        let mut state = running_state(
            Cell::new(5, 5),
            Direction::Down,
            Cell::new(0, 0),
            GameMode::Portal,
        );
        state.snake = Snake::from_segments(vec![Cell::new(5, 5), Cell::new(5, 4), Cell::new(5, 3)]);

        for _ in 0..10 {
            engine.step(&mut state);
            assert_eq!(state.snake.len(), 3);
        }
        assert!(state.is_alive());
    }

    #[test]
    fn test_classic_wall_terminates() {
        let (mut engine, _) = engine_with(quiet_config(), 5);
        let mut state = running_state(
            Cell::new(19, 10),
            Direction::Right,
            Cell::new(0, 0),
            GameMode::Classic,
        );

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(TerminationCause::Wall));
        assert_eq!(state.status, Status::Terminated(TerminationCause::Wall));
    }

    #[test]
    fn test_portal_wraps() {
        let (mut engine, _) = engine_with(quiet_config(), 6);
        let mut state = running_state(
            Cell::new(19, 10),
            Direction::Right,
            Cell::new(0, 0),
            GameMode::Portal,
        );

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state.snake.head(), Cell::new(0, 10));
        assert!(state.is_alive());
    }

    #[test]
    fn test_self_collision() {
        let (mut engine, _) = engine_with(quiet_config(), 7);
        let mut state = running_state(
            Cell::new(5, 5),
            Direction::Down,
            Cell::new(0, 0),
            GameMode::Portal,
        );
        // Head moves down onto (5, 6), which stays part of the body
        state.snake = Snake::from_segments(vec![
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
            Cell::new(6, 6),
        ]);

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(TerminationCause::SelfCollision));
    }

    #[test]
    fn test_bomb_collision() {
        let (mut engine, _) = engine_with(quiet_config(), 8);
        let mut state = running_state(
            Cell::new(10, 10),
            Direction::Right,
            Cell::new(0, 0),
            GameMode::Classic,
        );
        state.bombs.push(Bomb::new(Cell::new(11, 10), 0));

        let result = engine.step(&mut state);

        assert_eq!(result.info.collision, Some(TerminationCause::Bomb));
        assert!(!state.is_alive());
    }

    #[test]
    fn test_mini_snake_collision() {
        let (mut engine, _) = engine_with(quiet_config(), 9);
        let mut state = running_state(
            Cell::new(10, 10),
            Direction::Right,
            Cell::new(0, 0),
            GameMode::Classic,
        );
        state.mini_snake = Some(MiniSnake {
            body: vec![Cell::new(11, 10); 3],
            tags: vec![SegmentTag::Green; 3],
            direction: Direction::Up,
            move_counter: 0,
        });

        let result = engine.step(&mut state);

        assert_eq!(result.info.collision, Some(TerminationCause::MiniSnake));
    }

    #[test]
    fn test_bombs_expire() {
        let (mut engine, clock) = engine_with(quiet_config(), 10);
        let mut state = engine.reset(GameMode::Classic);
        state.bombs.push(Bomb::new(Cell::new(0, 0), 0));
        state.bombs.push(Bomb::new(Cell::new(1, 0), 2_000));

        clock.set(4_999);
        engine.step(&mut state);
        assert_eq!(state.bombs.len(), 2);

        clock.set(5_000);
        engine.step(&mut state);
        assert_eq!(state.bombs, vec![Bomb::new(Cell::new(1, 0), 2_000)]);

        clock.set(7_000);
        engine.step(&mut state);
        assert!(state.bombs.is_empty());
    }

    #[test]
    fn test_bomb_spawn_capped() {
        let mut config = quiet_config();
        config.bombs.spawn_chance = 1.0;
        let (mut engine, _) = engine_with(config, 11);
        let mut state = engine.reset(GameMode::Classic);
        state.score = 50;

        let mut spawned = 0;
        for _ in 0..50 {
            let before = state.bombs.len();
            let result = engine.step(&mut state);
            assert!(!result.terminated);
            assert!(state.bombs.len() <= 3);
            assert_eq!(result.info.bomb_spawned, state.bombs.len() > before);
            if result.info.bomb_spawned {
                spawned += 1;
            }
        }
        assert_eq!(state.bombs.len(), 3);
        assert_eq!(spawned, 3);
    }

    #[test]
    fn test_no_bombs_below_threshold() {
        let mut config = quiet_config();
        config.bombs.spawn_chance = 1.0;
        let (mut engine, _) = engine_with(config, 12);
        let mut state = engine.reset(GameMode::Classic);
        state.score = 40;

        for _ in 0..20 {
            engine.step(&mut state);
        }
        assert!(state.bombs.is_empty());
    }

    #[test]
    fn test_mini_snake_spawns_at_hundred() {
        let (mut engine, _) = engine_with(quiet_config(), 13);
        let mut state = running_state(
            Cell::new(3, 3),
            Direction::Right,
            Cell::new(4, 3),
            GameMode::Classic,
        );
        state.score = 90;

        let result = engine.step(&mut state);

        assert_eq!(state.score, 100);
        assert!(result.info.mini_snake_spawned);
        let mini = state.mini_snake.as_ref().unwrap();
        assert_eq!(mini.body.len(), 3);
        assert!(mini.body.iter().all(|&c| c == mini.head()));
        assert_eq!(mini.move_counter, 1);
    }

    #[test]
    fn test_mini_snake_spawns_once() {
        let (mut engine, _) = engine_with(quiet_config(), 14);
        let mut state = engine.reset(GameMode::Portal);
        state.score = 100;

        engine.step(&mut state);
        let first = state.mini_snake.clone();
        assert!(first.is_some());

        let result = engine.step(&mut state);
        assert!(!result.info.mini_snake_spawned);
        assert_eq!(state.mini_snake.as_ref().map(|m| m.tags.clone()), first.map(|m| m.tags));
    }

    #[test]
    fn test_mini_snake_wraps_in_classic() {
        let (mut engine, _) = engine_with(quiet_config(), 15);
        let mut state = engine.reset(GameMode::Classic);
        state.mini_snake = Some(MiniSnake {
            body: vec![Cell::new(0, 5), Cell::new(1, 5), Cell::new(2, 5)],
            tags: vec![SegmentTag::Red, SegmentTag::Blue, SegmentTag::Green],
            direction: Direction::Left,
            move_counter: 4,
        });

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(state.is_alive());
        let mini = state.mini_snake.as_ref().unwrap();
        assert_eq!(mini.body, vec![Cell::new(19, 5), Cell::new(0, 5), Cell::new(1, 5)]);
        assert_eq!(mini.move_counter, 0);
    }

    #[test]
    fn test_food_never_overlaps_after_growth() {
        let (mut engine, _) = engine_with(quiet_config(), 15);
        let mut state = running_state(
            Cell::new(0, 0),
            Direction::Right,
            Cell::new(1, 0),
            GameMode::Portal,
        );

        // Feed the snake by moving food in front of it each tick
        for i in 0..15 {
            let head = state.snake.head();
            state.food = Cell::new(head.x + 1, head.y);
            let result = engine.step(&mut state);
            assert!(result.info.ate_food);
            assert_eq!(state.snake.len(), i + 2);
            assert!(!state.is_occupied(state.food));
        }
    }

    #[test]
    fn test_terminated_game_no_update() {
        let (mut engine, _) = engine_with(quiet_config(), 16);
        let mut state = engine.reset(GameMode::Classic);
        state.status = Status::Terminated(TerminationCause::Bomb);
        let steps_before = state.steps;

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(result.info.collision, None);
        assert_eq!(state.steps, steps_before);
    }
}
