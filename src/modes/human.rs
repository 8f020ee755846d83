use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::{RenderView, Renderer};
use crate::session::SessionController;

pub struct HumanMode {
    controller: SessionController,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(controller: SessionController, renderer: Renderer) -> Self {
        let metrics = SessionMetrics::new(controller.history().best_score());

        Self {
            controller,
            metrics,
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame), independent of the tick rate
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        self.controller.start();
        self.metrics.on_session_start();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = self.controller.next_tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let view = RenderView {
                        state: self.controller.state(),
                        history: self.controller.history().records(),
                        speed: self.controller.speed(),
                        metrics: &self.metrics,
                        game_over: self.controller.game_over(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.dispatch(action);
        }
    }

    fn dispatch(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => self.controller.steer(direction),
            KeyAction::SelectMode(mode) => {
                self.controller.set_mode(mode);
                self.metrics.on_session_start();
            }
            KeyAction::ToggleMode => {
                let mode = self.controller.mode().toggled();
                self.controller.set_mode(mode);
                self.metrics.on_session_start();
            }
            KeyAction::SpeedUp => {
                let speed = self.controller.speed().saturating_add(1);
                self.controller.set_speed(speed);
            }
            KeyAction::SpeedDown => {
                let speed = self.controller.speed().saturating_sub(1);
                self.controller.set_speed(speed);
            }
            KeyAction::Restart => {
                self.controller.restart();
                self.metrics.on_session_start();
            }
            KeyAction::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        if let Some(game_over) = self.controller.tick() {
            self.metrics.on_session_over(game_over.record.score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
