use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type Coords = (u16, u16);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Option<Color>,
}

impl Glyph {
    pub const BLANK: Glyph = Glyph { ch: ' ', color: None };

    pub fn plain(ch: char) -> Self {
        Glyph { ch, color: None }
    }

    pub fn colored(ch: char, color: Color) -> Self {
        Glyph { ch, color: Some(color) }
    }
}

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        let screen = vec![Glyph::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking).context("Failed to show cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("Failed to leave alternate screen")?;
        Ok(())
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Failed to read terminal event")? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for a key press.
    pub fn wait_key(&self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !poll(timeout).context("Failed to poll terminal events")? {
            return Ok(None);
        }

        match read().context("Failed to read terminal event")? {
            Event::Key(ev) => Ok(Some(ev)),
            _ => Ok(None),
        }
    }

    pub fn draw_frame(&mut self, top_left: Coords, width: u16, height: u16) -> Result<()> {
        let end_x = top_left.0 + width - 1;
        let end_y = top_left.1 + height - 1;

        for x in top_left.0..=end_x {
            let ch = if x == top_left.0 || x == end_x {'+'} else {'-'};
            self.print_at((x, top_left.1), Glyph::plain(ch))?;
            self.print_at((x, end_y), Glyph::plain(ch))?;
        }

        for y in top_left.1 + 1..end_y {
            self.print_at((top_left.0, y), Glyph::plain('|'))?;
            self.print_at((end_x, y), Glyph::plain('|'))?;
        }

        self.flush()
    }

    /// Writes `text` left to right starting at `pos`, clipped to the screen.
    pub fn print_str(&mut self, pos: Coords, text: &str, color: Option<Color>) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let x = pos.0 + i as u16;
            if x >= self.width {
                break;
            }
            self.print_at((x, pos.1), Glyph { ch, color })?;
        }
        Ok(())
    }

    pub fn show_message<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|l| l.as_ref().chars().count()).max().unwrap_or(0) + 4) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Blank top and bottom rows
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), Glyph::BLANK)?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line.as_ref(), width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), Glyph::plain(ch))?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message was covering
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(glyph) = self.glyph_at((x, y)) {
                    self.print_at_no_save((x, y), glyph)?;
                }
            }
        }

        self.flush()
    }

    /// Queues a glyph, skipping the write when the screen already shows it.
    pub fn print_at(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        if self.screen[idx] == glyph {
            return Ok(());
        }

        self.screen[idx] = glyph;
        // Cells under a message are only buffered, hide_message puts them on screen
        if self.current_msg.as_ref().map_or(false, |msg| msg.covers(pos)) {
            return Ok(());
        }
        self.print_at_no_save(pos, glyph)
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear terminal")?;
        self.screen = vec![Glyph::BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn glyph_at(&self, pos: Coords) -> Option<Glyph> {
        self.index(pos).map(|idx| self.screen[idx])
    }

    fn print_at_no_save(&mut self, pos: Coords, glyph: Glyph) -> Result<()> {
        // Messages go through here so the screen buffer keeps what they cover
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;
        match glyph.color {
            Some(color) => queue!(
                self.stdout,
                style::SetForegroundColor(color),
                style::Print(glyph.ch),
                style::ResetColor
            )?,
            None => queue!(self.stdout, style::Print(glyph.ch))?,
        }
        Ok(())
    }
}

impl Message {
    fn covers(&self, pos: Coords) -> bool {
        pos.0 >= self.top_left.0 && pos.0 < self.top_left.0 + self.width &&
        pos.1 >= self.top_left.1 && pos.1 < self.top_left.1 + self.height
    }
}
