use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    interactive: bool,
}

/// A single cell in the terminal buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

impl Terminal {
    /// Take over the terminal: raw mode, alternate screen and mouse
    /// capture, all released on drop.
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, EnableMouseCapture)?;

        Ok(Self {
            width,
            height,
            buffer: blank(width, height),
            interactive: true,
        })
    }

    /// Off-screen buffer of a fixed size, for print mode
    pub fn headless(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: blank(width, height),
            interactive: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Reallocate the back buffer for new dimensions
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = blank(width, height);
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a cell, ignoring out-of-bounds positions
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bg };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bg);
        }
    }

    #[cfg(test)]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Write the whole back buffer to the screen in one flush
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        let mut fg: Option<Color> = None;
        let mut bg: Option<Color> = None;

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                if cell.fg != fg {
                    queue!(out, SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    fg = cell.fg;
                }
                if cell.bg != bg {
                    queue!(out, SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                    bg = cell.bg;
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, ResetColor)?;
        out.flush()
    }

    /// Next pending input event, without blocking
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        if poll(Duration::from_millis(0))? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }

    /// Print buffer to stdout with 24-bit ANSI colors (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        for row in &self.buffer {
            for cell in row {
                if let Some(Color::Rgb { r, g, b }) = cell.fg {
                    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)?;
                }
                if let Some(Color::Rgb { r, g, b }) = cell.bg {
                    write!(out, "\x1b[48;2;{};{};{}m", r, g, b)?;
                }
                write!(out, "{}", cell.ch)?;
            }
            writeln!(out, "\x1b[0m")?;
        }
        out.flush()
    }
}

fn blank(width: u16, height: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); width as usize]; height as usize]
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.interactive {
            let _ = execute!(stdout(), DisableMouseCapture, ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
