use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, GameState, Geometry, SegmentTag};
use crate::history::SessionRecord;
use crate::metrics::SessionMetrics;
use crate::session::GameOver;

const RABBIT: &str = "🐰";
const CARROT: &str = "🥕";
const BOMB: &str = "💣";
const MINI_HEAD: &str = "🐍";
const EMPTY: &str = "· ";

const HISTORY_WIDTH: u16 = 38;

fn tag_glyph(tag: SegmentTag) -> &'static str {
    match tag {
        SegmentTag::Red => "🔴",
        SegmentTag::Blue => "🔵",
        SegmentTag::Green => "🟢",
    }
}

/// Everything the renderer reads for one frame
pub struct RenderView<'a> {
    pub state: &'a GameState,
    pub history: &'a [SessionRecord],
    pub speed: u8,
    pub metrics: &'a SessionMetrics,
    pub game_over: Option<&'a GameOver>,
}

pub struct Renderer {
    geometry: Geometry,
}

impl Renderer {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and history
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(HISTORY_WIDTH)])
            .split(chunks[1]);

        let (width, height) = self.geometry.pixel_size();
        let board = centered(body[0], width.saturating_add(2), height.saturating_add(2));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Snake · {} ", view.state.mode));
        let inner = block.inner(board);
        frame.render_widget(block, board);
        self.draw_board(frame.buffer_mut(), inner, view.state);

        if let Some(game_over) = view.game_over {
            let popup = centered(board, 36, 9);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(game_over), popup);
        }

        frame.render_widget(self.render_history(view.history), body[1]);
        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Paint the grid, then hazards, food, body and head on top
    fn draw_board(&self, buf: &mut Buffer, inner: Rect, state: &GameState) {
        let dim = Style::default().fg(Color::DarkGray);
        for y in 0..self.geometry.grid_count {
            for x in 0..self.geometry.grid_count {
                self.put(buf, inner, Cell::new(x, y), EMPTY, dim);
            }
        }

        let plain = Style::default();
        for bomb in &state.bombs {
            self.put(buf, inner, bomb.cell, BOMB, plain);
        }

        if let Some(mini) = &state.mini_snake {
            for (index, (&cell, &tag)) in mini.body.iter().zip(&mini.tags).enumerate().rev() {
                let glyph = if index == 0 { MINI_HEAD } else { tag_glyph(tag) };
                self.put(buf, inner, cell, glyph, plain);
            }
        }

        self.put(buf, inner, state.food, CARROT, plain);
        for &segment in state.snake.body_segments() {
            self.put(buf, inner, segment, CARROT, plain);
        }
        self.put(buf, inner, state.snake.head(), RABBIT, plain);
    }

    /// Draw one glyph at a cell; off-grid or clipped cells are skipped
    fn put(&self, buf: &mut Buffer, inner: Rect, cell: Cell, glyph: &str, style: Style) {
        let Some((px, py)) = self.geometry.cell_origin(cell) else {
            return;
        };
        if px + self.geometry.cell_width > inner.width || py + self.geometry.cell_height > inner.height
        {
            return;
        }
        buf.set_string(inner.x + px, inner.y + py, glyph, style);
    }

    fn render_stats(&self, view: &RenderView) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                view.state.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Mode: ", label),
            Span::styled(view.state.mode.label(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(view.speed.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(view.metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(view.metrics.best_score.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_history(&self, history: &[SessionRecord]) -> Paragraph<'_> {
        let lines: Vec<Line> = if history.is_empty() {
            vec![Line::from(Span::styled(
                "No games yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            history
                .iter()
                .map(|record| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>5} ", record.score),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("{:<8}", record.mode.label()),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::styled(
                            record.timestamp.clone(),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect()
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" History "),
        )
    }

    fn render_game_over(&self, game_over: &GameOver) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                format!("The rabbit {}", game_over.cause.describe()),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    game_over.record.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", key),
            Span::raw("/"),
            Span::styled("WASD", key),
            Span::raw(" move | "),
            Span::styled("1", key),
            Span::raw("/"),
            Span::styled("2", key),
            Span::raw("/"),
            Span::styled("M", key),
            Span::raw(" mode | "),
            Span::styled("+", key),
            Span::raw("/"),
            Span::styled("-", key),
            Span::raw(" speed | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// A rectangle of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
