use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::style::Color;
use log::{debug, info};
use rand::rngs::ThreadRng;

use crate::input::{map_key, KeyAction};
use crate::sim::{GameState, Status, TickOutcome};
use crate::snake::{Direction::*, Grid, Position};
use crate::speed::{Menu, Speed};
use crate::term::{Coords, Glyph, TermManager};
use crate::ticker::Ticker;

const HAPPY_FACE_TIME: Duration = Duration::from_millis(400);
const PAUSED_POLL: Duration = Duration::from_millis(250);

// Every grid cell is two terminal columns wide so the board looks square
const CELL_WIDTH: u16 = 2;

const SNAKE_COLOR: Color = Color::Blue;
const HEAD_COLOR: Color = Color::Cyan;
const APPLE_COLOR: Color = Color::Red;
const DEAD_COLOR: Color = Color::DarkGrey;
const GRID_COLOR: Color = Color::DarkGrey;

const CONTROLS_HINT: &str = "Arrows/WASD move  Esc pause  Ctrl+C quit";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Face {
    Plain,
    Happy,
    Dead,
}

pub struct SnakeGame {
    term: TermManager,
    grid: Grid,
    menu: Menu,
    rng: ThreadRng,
    origin: Coords,
}

impl SnakeGame {
    pub fn new(grid: Grid, preselected: Speed) -> Result<Self> {
        let term = TermManager::new()?;
        let (w, h) = term.size();
        let (need_w, need_h) = board_size(grid);

        if w < need_w || h < need_h {
            bail!(
                "terminal is {}x{} but a {}x{} grid needs at least {}x{}",
                w, h, grid.width, grid.height, need_w, need_h
            );
        }

        let origin = ((w - need_w) / 2, (h - need_h) / 2);
        Ok(SnakeGame { term, grid, menu: Menu::new(preselected), rng: rand::thread_rng(), origin })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Menu, round, game over screen, again, until the player quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let speed = match self.choose_speed()? {
                Some(speed) => speed,
                None => break,
            };

            let state = match self.play(speed)? {
                Some(state) => state,
                None => break,
            };

            if !self.game_over(&state)? {
                break;
            }
        }

        info!("Player quit");
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn choose_speed(&mut self) -> Result<Option<Speed>> {
        self.term.clear()?;

        loop {
            let lines = self.menu.lines();
            self.term.show_message(lines.as_slice())?;

            match map_key(&self.term.read_key_blocking()?) {
                KeyAction::Quit => return Ok(None),
                KeyAction::Steer(Up) => self.menu.up(),
                KeyAction::Steer(Down) => self.menu.down(),
                KeyAction::Preset(speed) => {
                    self.menu.select(speed);
                    return Ok(Some(speed));
                }
                KeyAction::Confirm => return Ok(Some(self.menu.selected())),
                _ => {}
            }
        }
    }

    /// Runs one round. `None` means the player quit mid-round.
    fn play(&mut self, speed: Speed) -> Result<Option<GameState>> {
        self.term.clear()?;
        self.draw_board_frame()?;

        let mut state = GameState::new(self.grid, &mut self.rng);
        state.launch(Right);

        let mut ticker = Ticker::start(speed.tick_interval(), Instant::now());
        let mut happy_until: Option<Instant> = None;

        info!(
            "Round started: {} ({} ms/tick), {}x{} grid",
            speed.label(), ticker.interval().as_millis(), self.grid.width, self.grid.height
        );
        self.render(&state, Face::Plain)?;

        loop {
            let timeout = ticker.until_next(Instant::now()).unwrap_or(PAUSED_POLL);

            if let Some(key) = self.term.wait_key(timeout)? {
                match map_key(&key) {
                    KeyAction::Quit => return Ok(None),
                    KeyAction::Pause => self.toggle_pause(&mut ticker)?,
                    KeyAction::Steer(dir) if !ticker.is_paused() => {
                        state.steer(dir);
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            if !ticker.poll(now) {
                continue;
            }

            match state.tick(&mut self.rng) {
                TickOutcome::Ate => {
                    debug!("Food eaten, score {}, length {}", state.score(), state.snake().len());
                    happy_until = Some(now + HAPPY_FACE_TIME);
                }
                TickOutcome::Crashed | TickOutcome::Cleared | TickOutcome::Halted => ticker.cancel(),
                TickOutcome::Moved | TickOutcome::Idle => {}
            }

            let happy = happy_until.map_or(false, |until| now < until);
            self.render(&state, face_for(&state, happy))?;

            if ticker.is_cancelled() {
                info!(
                    "Round ended ({:?}): score {}, length {}",
                    state.status(), state.score(), state.snake().len()
                );
                return Ok(Some(state));
            }
        }
    }

    /// Returns whether the player wants another round.
    fn game_over(&mut self, state: &GameState) -> Result<bool> {
        let (title, face) = match state.status() {
            Status::Cleared => ("BOARD CLEARED!", "^_^"),
            _ => ("GAME OVER", "x_x"),
        };
        let score = format!("Score: {}", state.score());

        self.term.show_message(&[
            title,
            "",
            score.as_str(),
            face,
            "",
            "[ Restart ]",
            "Enter or Space to restart,",
            "or CTRL+C to quit.",
        ])?;

        loop {
            match map_key(&self.term.read_key_blocking()?) {
                KeyAction::Confirm => return Ok(true),
                KeyAction::Quit => return Ok(false),
                _ => {}
            }
        }
    }

    fn toggle_pause(&mut self, ticker: &mut Ticker) -> Result<()> {
        if ticker.is_paused() {
            self.term.hide_message()?;
            ticker.resume(Instant::now());
            debug!("Resumed");
        } else {
            ticker.pause();
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
            debug!("Paused");
        }
        Ok(())
    }

    fn draw_board_frame(&mut self) -> Result<()> {
        let (w, h) = frame_size(self.grid);
        self.term.draw_frame((self.origin.0, self.origin.1 + 1), w, h)?;
        self.term.print_str((self.origin.0, self.origin.1 + h + 1), CONTROLS_HINT, Some(GRID_COLOR))?;
        self.term.flush()
    }

    fn render(&mut self, state: &GameState, face: Face) -> Result<()> {
        let score = format!("Score: {:<8}", state.score());
        self.term.print_str(self.origin, &score, None)?;

        // Board interior starts one row below the score line, inside the frame
        let left = self.origin.0 + 1;
        let top = self.origin.1 + 2;

        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                let glyphs = cell_glyphs(state, Position::new(x, y), face);
                for (i, glyph) in glyphs.iter().enumerate() {
                    self.term.print_at((left + x * CELL_WIDTH + i as u16, top + y), *glyph)?;
                }
            }
        }

        self.term.flush()
    }
}

/// Outer size of the framed board.
fn frame_size(grid: Grid) -> Coords {
    (grid.width * CELL_WIDTH + 2, grid.height + 2)
}

/// Terminal columns and rows taken by the score line, framed board and hint.
fn board_size(grid: Grid) -> Coords {
    let (w, h) = frame_size(grid);
    (w.max(CONTROLS_HINT.len() as u16), h + 2)
}

fn face_for(state: &GameState, happy: bool) -> Face {
    if state.is_game_over() {
        Face::Dead
    } else if happy {
        Face::Happy
    } else {
        Face::Plain
    }
}

fn cell_glyphs(state: &GameState, pos: Position, face: Face) -> [Glyph; 2] {
    let snake = state.snake();
    let dead = face == Face::Dead;

    if pos == snake.head() {
        let eye = match face {
            Face::Plain => 'o',
            Face::Happy => '^',
            Face::Dead => 'x',
        };
        let color = if dead {DEAD_COLOR} else {HEAD_COLOR};
        return [Glyph::colored(eye, color); 2];
    }

    if snake.contains(pos) {
        return if dead {
            [Glyph::colored('X', DEAD_COLOR); 2]
        } else {
            [Glyph::colored('█', SNAKE_COLOR); 2]
        };
    }

    if pos == state.food() {
        return [Glyph::colored('(', APPLE_COLOR), Glyph::colored(')', APPLE_COLOR)];
    }

    [Glyph::BLANK, Glyph::colored('·', GRID_COLOR)]
}
