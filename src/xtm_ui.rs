// Terminal frontend: draws the board with ratatui and maps keyboard and
// mouse input onto GameSession commands

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::xtm_color::{Depth, Palette};
use xtmines::xtm_config::{Config, save_config};
use xtmines::{CellIcon, Difficulty, GameSession, GameStatus};

/// Glyph set for cells; the ASCII variant suits limited fonts
struct Glyphs {
    hidden: &'static str,
    flag: &'static str,
    mine: &'static str,
}

impl Glyphs {
    fn new(ascii: bool) -> Glyphs {
        if ascii {
            Glyphs { hidden: "#", flag: "F", mine: "*" }
        } else {
            Glyphs { hidden: "■", flag: "⚑", mine: "☼" }
        }
    }
}

/// Per-run UI state that is not part of the game itself
struct UiState {
    cursor: (usize, usize), // (row, column)
    board_rect: Option<Rect>,
    quit: bool,
}

impl UiState {
    fn new() -> Self {
        UiState { cursor: (0, 0), board_rect: None, quit: false }
    }

    /// Keep the cursor on the board after a size change
    fn clamp_cursor(&mut self, session: &GameSession) {
        let b = session.board();
        self.cursor.0 = self.cursor.0.min(b.rows() - 1);
        self.cursor.1 = self.cursor.1.min(b.columns() - 1);
    }

    fn step_cursor(&mut self, session: &GameSession, dr: isize, dc: isize) {
        let b = session.board();
        let r = (self.cursor.0 as isize + dr).clamp(0, b.rows() as isize - 1);
        let c = (self.cursor.1 as isize + dc).clamp(0, b.columns() as isize - 1);
        self.cursor = (r as usize, c as usize);
    }

    /// Board cell under a terminal position, if any
    fn cell_at(&self, session: &GameSession, column: u16, row: u16) -> Option<(usize, usize)> {
        let brect = self.board_rect?;
        let inner = Rect::new(brect.x + 1, brect.y + 1, brect.width.saturating_sub(2), brect.height.saturating_sub(2));
        if column < inner.x || column >= inner.x + inner.width || row < inner.y || row >= inner.y + inner.height {
            return None;
        }
        // each cell is two terminal columns wide
        let c = ((column - inner.x) / 2) as usize;
        let r = (row - inner.y) as usize;
        let b = session.board();
        (r < b.rows() && c < b.columns()).then_some((r, c))
    }
}

pub fn run(cfg: &mut Config) -> Result<(), Box<dyn Error>> {
    let mut session = GameSession::with_seed(cfg.difficulty, cfg.seed)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut session, cfg);

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut GameSession,
    cfg: &mut Config,
) -> Result<(), Box<dyn Error>> {
    let palette = Palette::new(Depth::detect());
    let glyphs = Glyphs::new(cfg.ascii_icons);
    let mut ui = UiState::new();

    // redraw at least this often so the timer keeps moving
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    while !ui.quit {
        terminal.draw(|f| draw(f, session, &mut ui, &palette, &glyphs))?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                // Windows also reports releases; act on presses only
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                    handle_key(code, session, &mut ui, cfg)?;
                }
                Event::Mouse(me) => handle_mouse(me, session, &mut ui),
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn handle_key(code: KeyCode, session: &mut GameSession, ui: &mut UiState, cfg: &mut Config) -> Result<(), Box<dyn Error>> {
    let (r, c) = (ui.cursor.0 as isize, ui.cursor.1 as isize);
    match code {
        KeyCode::Esc | KeyCode::Char('q') => ui.quit = true,
        KeyCode::Up => ui.step_cursor(session, -1, 0),
        KeyCode::Down => ui.step_cursor(session, 1, 0),
        KeyCode::Left => ui.step_cursor(session, 0, -1),
        KeyCode::Right => ui.step_cursor(session, 0, 1),
        KeyCode::Char(' ') | KeyCode::Enter => {
            let out = session.on_left_click(r, c);
            debug!(r, c, uncovered = out.revealed.len(), "reveal");
        }
        KeyCode::Char('f') | KeyCode::Char('F') => session.on_right_click(r, c),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(2) => session.restart()?,
        KeyCode::Char(d @ '1'..='3') => {
            let idx = d as usize - '1' as usize;
            let difficulty = Difficulty::from_index(idx)?;
            session.switch_difficulty(difficulty)?;
            ui.clamp_cursor(session);
            if cfg.difficulty != difficulty {
                cfg.difficulty = difficulty;
                save_config(cfg);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_mouse(me: MouseEvent, session: &mut GameSession, ui: &mut UiState) {
    let Some((r, c)) = ui.cell_at(session, me.column, me.row) else {
        return;
    };
    match me.kind {
        MouseEventKind::Moved => ui.cursor = (r, c),
        MouseEventKind::Down(MouseButton::Left) => {
            ui.cursor = (r, c);
            session.on_left_click(r as isize, c as isize);
        }
        MouseEventKind::Down(MouseButton::Right) => {
            ui.cursor = (r, c);
            session.on_right_click(r as isize, c as isize);
        }
        _ => {}
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, session: &GameSession, ui: &mut UiState, pal: &Palette, glyphs: &Glyphs) {
    let size = f.size();
    let board = session.board();
    let board_w = (board.columns() * 2) as u16 + 3;
    let board_h = board.rows() as u16 + 2;
    let min_w = board_w.max(64);
    let min_h = board_h + 6;

    if size.width < min_w || size.height < min_h {
        ui.board_rect = None;
        let lines = vec![
            Spans::from(Span::raw("Terminal size too small.")),
            Spans::from(Span::raw(format!("Minimum required: {} x {}", min_w, min_h))),
        ];
        let warn = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        f.render_widget(warn, center_rect(40.min(size.width), 4.min(size.height), size));
        return;
    }

    // counters on top, board in the middle, help at the bottom
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(board_h), Constraint::Length(3)].as_ref())
        .split(size);

    draw_header(f, chunks[0], session, pal);

    let brect = center_rect(board_w, board_h, chunks[1]);
    ui.board_rect = Some(brect);
    let mut lines = Vec::with_capacity(board.rows());
    for r in 0..board.rows() {
        let mut spans = Vec::with_capacity(board.columns() + 1);
        for c in 0..board.columns() {
            let Some(state) = session.render_state(r as isize, c as isize) else {
                continue;
            };
            let mut style = Style::default().bg(pal.board_bg);
            let text = match state.icon() {
                CellIcon::Hidden => {
                    style = style.fg(pal.hidden_fg);
                    glyphs.hidden.to_string()
                }
                CellIcon::Flag => {
                    style = style.fg(pal.flag_fg);
                    glyphs.flag.to_string()
                }
                CellIcon::Number(0) => " ".to_string(),
                CellIcon::Number(n) => {
                    style = style.fg(pal.number(n)).add_modifier(Modifier::BOLD);
                    n.to_string()
                }
                CellIcon::Mine => {
                    style = style.fg(pal.mine_fg);
                    glyphs.mine.to_string()
                }
                CellIcon::MineExploded => {
                    style = style.fg(pal.mine_fg).bg(pal.exploded_bg);
                    glyphs.mine.to_string()
                }
            };
            if ui.cursor == (r, c) && !session.is_game_finished() {
                style = style.bg(pal.cursor_bg);
            }
            spans.push(Span::styled(format!(" {}", text), style));
        }
        // right padding in board colour
        spans.push(Span::styled(" ", Style::default().bg(pal.board_bg)));
        lines.push(Spans::from(spans));
    }
    let field = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(board_title(session))
            .title_alignment(Alignment::Center),
    );
    f.render_widget(field, brect);

    draw_footer(f, chunks[2], session, pal);
}

/// Remaining-mines counter, status face and timer
fn draw_header<B: Backend>(f: &mut Frame<B>, area: Rect, session: &GameSession, pal: &Palette) {
    let left = format!(" Mines: {:03}", session.remaining_flag_count());
    let face = match session.status() {
        GameStatus::Playing => ":)",
        GameStatus::Won => "B)",
        GameStatus::Lost => "X(",
    };
    let right = format!("Time: {:03} ", session.elapsed_secs());
    let inner_w = area.width.saturating_sub(2) as usize;
    let used = left.width() + face.width() + right.width();
    let gap = inner_w.saturating_sub(used);
    let (gap_l, gap_r) = (gap / 2, gap - gap / 2);
    let spans = Spans::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(gap_l)),
        Span::styled(face, Style::default().fg(pal.key_fg).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap_r)),
        Span::raw(right),
    ]);
    f.render_widget(Paragraph::new(spans).block(Block::default().borders(Borders::ALL)), area);
}

/// Key help, or the result once the game is over
fn draw_footer<B: Backend>(f: &mut Frame<B>, area: Rect, session: &GameSession, pal: &Palette) {
    let key = Style::default().fg(pal.key_fg).add_modifier(Modifier::BOLD);
    let spans = match session.status() {
        GameStatus::Playing => Spans::from(vec![
            Span::styled(" Space", key),
            Span::raw(": reveal  "),
            Span::styled("F", key),
            Span::raw(": flag  "),
            Span::styled("R", key),
            Span::raw(": restart  "),
            Span::styled("1-3", key),
            Span::raw(": difficulty  "),
            Span::styled("Q", key),
            Span::raw(": quit"),
        ]),
        GameStatus::Won => Spans::from(vec![
            Span::raw(format!(" Mines cleared in {} s. ", session.elapsed_secs())),
            Span::styled("R", key),
            Span::raw(": play again  "),
            Span::styled("Q", key),
            Span::raw(": quit"),
        ]),
        GameStatus::Lost => Spans::from(vec![
            Span::raw(" Boom! "),
            Span::styled("R", key),
            Span::raw(": try again  "),
            Span::styled("Q", key),
            Span::raw(": quit"),
        ]),
    };
    f.render_widget(Paragraph::new(spans).block(Block::default().borders(Borders::ALL)), area);
}

/// "Easy · 10 mines"
fn board_title(session: &GameSession) -> String {
    format!("{} · {} mines", session.difficulty(), session.board().mine_count())
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
