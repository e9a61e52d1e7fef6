//! Terminal front end
//!
//! Draws a [`SessionSnapshot`] with crossterm. The playfield is sampled at
//! each cell center, so the drawing scales to any terminal size.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};

use crate::assistant::{AccentColor, Role};
use crate::session::SessionSnapshot;
use crate::sim::RunnerSnapshot;

const MAX_PLAYFIELD_COLS: u16 = 100;
const PLAYFIELD_ROWS: u16 = 12;
const HISTORY_ROWS: usize = 6;

/// What a playfield cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Player,
    Obstacle,
    Floor,
}

impl Cell {
    fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Player => '@',
            Cell::Obstacle => '#',
            Cell::Floor => '_',
        }
    }
}

/// Cell at `(col, row)` of a `cols` x `rows` grid covering the playfield
pub fn cell_at(runner: &RunnerSnapshot, col: u16, row: u16, cols: u16, rows: u16) -> Cell {
    let [width, height] = runner.playfield;
    let cell_w = width / cols.max(1) as f32;
    let cell_h = height / rows.max(1) as f32;
    let point = [(col as f32 + 0.5) * cell_w, (row as f32 + 0.5) * cell_h];

    if runner.player.contains(point) {
        Cell::Player
    } else if runner.obstacles.iter().any(|o| o.contains(point)) {
        Cell::Obstacle
    } else if point[1] >= runner.floor_y && point[1] - cell_h < runner.floor_y {
        Cell::Floor
    } else {
        Cell::Empty
    }
}

fn accent(color: &AccentColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb { r, g, b }
}

/// Owns the terminal while the game runs; restores it on drop
pub struct TerminalRenderer {
    out: Stdout,
}

impl TerminalRenderer {
    /// Switches to raw mode on the alternate screen
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out })
    }

    pub fn draw(&mut self, snapshot: &SessionSnapshot, input_line: &str) -> io::Result<()> {
        let (term_cols, _) = terminal::size()?;
        let cols = term_cols.clamp(1, MAX_PLAYFIELD_COLS);
        let color = accent(&snapshot.accent_color);
        let runner = &snapshot.runner;

        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        queue!(
            self.out,
            SetForegroundColor(color),
            Print("NEURAL RUNNER // VELOCITY: HIGH"),
            ResetColor,
            Print(format!(
                "   SCORE: {}   BEST: {}",
                runner.display_score, runner.best_score
            )),
        )?;

        for row in 0..PLAYFIELD_ROWS {
            let line: String = (0..cols)
                .map(|col| cell_at(runner, col, row, cols, PLAYFIELD_ROWS).glyph())
                .collect();
            queue!(
                self.out,
                MoveTo(0, row + 1),
                SetForegroundColor(color),
                Print(line),
                ResetColor
            )?;
        }

        let mut y = PLAYFIELD_ROWS + 1;
        if !runner.running {
            queue!(
                self.out,
                MoveTo(0, y),
                SetForegroundColor(Color::Red),
                Print("CONNECTION LOST  [F5] RESTORE LINK"),
                ResetColor
            )?;
        }
        y += 1;

        queue!(self.out, MoveTo(0, y), Print(status_line(snapshot)))?;
        y += 2;

        let skip = snapshot.history.len().saturating_sub(HISTORY_ROWS);
        for message in snapshot.history.iter().skip(skip) {
            let label_color = match message.role {
                Role::User => Color::Grey,
                Role::Jarvis => color,
            };
            queue!(
                self.out,
                MoveTo(0, y),
                Print(format!("[{}] ", message.time_label())),
                SetForegroundColor(label_color),
                Print(format!("{}: ", message.role.label())),
                ResetColor,
                Print(&message.text)
            )?;
            y += 1;
        }

        queue!(
            self.out,
            MoveTo(0, y + 1),
            Print(format!("> {input_line}")),
            MoveTo(0, y + 2),
            SetForegroundColor(Color::DarkGrey),
            Print("[Up/Tab] open palm  [Enter] speak  [F2] pause  [F5] reset  [Esc] quit"),
            ResetColor
        )?;

        self.out.flush()
    }
}

fn status_line(snapshot: &SessionSnapshot) -> String {
    let hand = if snapshot.sources.gesture_available {
        snapshot.hand.label()
    } else {
        "OFFLINE"
    };
    let mic = match (snapshot.sources.speech_available, snapshot.listening) {
        (false, _) => "OFFLINE",
        (true, true) => "LISTENING",
        (true, false) => "IDLE",
    };

    let mut line = format!("HAND: {hand}   MIC: {mic}   ACCENT: {}", snapshot.accent_color);
    if snapshot.resetting {
        line.push_str("   [RESETTING]");
    }
    if snapshot.paused {
        line.push_str("   [PAUSED]");
    }
    if snapshot.pending_replies > 0 {
        line.push_str("   [PROCESSING]");
    }
    line
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
