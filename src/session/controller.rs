use tracing::info;

use super::scheduler::TickScheduler;
use crate::game::{Direction, GameEngine, GameMode, GameState, TerminationCause};
use crate::history::{SessionHistory, SessionRecord};

/// Notification produced when a session ends
#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub cause: TerminationCause,
    pub record: SessionRecord,
}

/// Owns one game session and everything that drives it
///
/// Commands from the player (steer, restart, mode, speed) and timer ticks
/// all go through here. The scheduler is stopped on termination and
/// restarted only by a new session.
pub struct SessionController {
    engine: GameEngine,
    state: GameState,
    history: SessionHistory,
    scheduler: TickScheduler,
    speed: u8,
    game_over: Option<GameOver>,
}

impl SessionController {
    /// Prepare a session; ticking begins with [`SessionController::start`]
    pub fn new(mut engine: GameEngine, mode: GameMode, speed: u8, history: SessionHistory) -> Self {
        let speed_config = &engine.config().speed;
        let speed = speed_config.clamp(speed);
        let period = speed_config.interval_for(speed);
        let state = engine.reset(mode);

        Self {
            engine,
            state,
            history,
            scheduler: TickScheduler::new(period),
            speed,
            game_over: None,
        }
    }

    /// Start the tick timer for the current session
    pub fn start(&mut self) {
        info!(period = ?self.scheduler.period(), "Tick timer started");
        self.scheduler.start();
    }

    /// Throw away the current session and start a fresh one in the same mode
    pub fn restart(&mut self) {
        self.restart_in(self.state.mode);
    }

    /// Switch mode; this always starts a fresh session
    pub fn set_mode(&mut self, mode: GameMode) {
        info!(mode = %mode, "Mode changed");
        self.restart_in(mode);
    }

    fn restart_in(&mut self, mode: GameMode) {
        self.scheduler.stop();
        self.state = self.engine.reset(mode);
        self.game_over = None;
        self.scheduler.start();
    }

    /// Change the speed setting; a running timer picks up the new interval at once
    pub fn set_speed(&mut self, speed: u8) {
        let speed_config = &self.engine.config().speed;
        self.speed = speed_config.clamp(speed);
        let period = speed_config.interval_for(self.speed);
        info!(speed = self.speed, period = ?period, "Speed changed");
        self.scheduler.set_period(period);
    }

    /// Forward a direction key to the running session
    pub fn steer(&mut self, direction: Direction) {
        if self.state.is_alive() {
            self.state.steer(direction);
        }
    }

    /// Wait for the scheduler; never resolves while the session is over
    pub async fn next_tick(&mut self) {
        self.scheduler.tick().await;
    }

    /// Run one simulation step; returns the notification if the session just ended
    pub fn tick(&mut self) -> Option<GameOver> {
        let result = self.engine.step(&mut self.state);
        let cause = result.info.collision?;

        self.scheduler.stop();
        let record = SessionRecord::now(self.state.score, self.state.mode);
        self.history.record(record.clone());

        let game_over = GameOver { cause, record };
        self.game_over = Some(game_over.clone());
        Some(game_over)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn tick_period(&self) -> std::time::Duration {
        self.scheduler.period()
    }
}
