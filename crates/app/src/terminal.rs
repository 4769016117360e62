//! Half-block terminal backend: every cell holds two vertical pixels.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use volume_wave_core::{Canvas, Color, Rect, Result};

/// Raw-mode alternate screen, restored on drop.
pub struct TerminalSession;

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Terminal size in cells reserved for the wave, leaving the bottom row for
/// the status line.
pub fn wave_area() -> Result<(u16, u16)> {
    let (cols, rows) = terminal::size()?;
    Ok((cols, rows.saturating_sub(1)))
}

/// Pixel size of a cell area.
pub fn pixel_size(cols: u16, rows: u16) -> (f32, f32) {
    (f32::from(cols), f32::from(rows) * 2.0)
}

/// Off-screen pixel buffer presented as half-block characters.
pub struct TerminalCanvas {
    cols: u16,
    rows: u16,
    pixels: Vec<Option<Color>>,
}

impl TerminalCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            pixels: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.pixels = vec![None; usize::from(cols) * usize::from(rows) * 2];
    }

    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn pixel_height(&self) -> usize {
        usize::from(self.rows) * 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= usize::from(self.cols) || y >= self.pixel_height() {
            return None;
        }
        self.pixels[y * usize::from(self.cols) + x]
    }

    /// Writes the buffer and a status line to `out`.
    pub fn present<W: Write>(&self, out: &mut W, status: &str) -> Result<()> {
        for row in 0..self.rows {
            queue!(out, MoveTo(0, row))?;
            for col in 0..usize::from(self.cols) {
                let top = self.pixel(col, usize::from(row) * 2);
                let bottom = self.pixel(col, usize::from(row) * 2 + 1);
                match (top, bottom) {
                    (Some(top), Some(bottom)) if top == bottom => {
                        queue!(out, SetForegroundColor(to_term(top)), Print('█'))?
                    }
                    (Some(top), Some(bottom)) => queue!(
                        out,
                        SetForegroundColor(to_term(top)),
                        SetBackgroundColor(to_term(bottom)),
                        Print('▀'),
                        ResetColor
                    )?,
                    (Some(top), None) => {
                        queue!(out, SetForegroundColor(to_term(top)), Print('▀'))?
                    }
                    (None, Some(bottom)) => {
                        queue!(out, SetForegroundColor(to_term(bottom)), Print('▄'))?
                    }
                    (None, None) => queue!(out, Print(' '))?,
                }
            }
        }

        queue!(
            out,
            ResetColor,
            MoveTo(0, self.rows),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        out.flush()?;
        Ok(())
    }
}

impl Canvas for TerminalCanvas {
    /// Corners are below cell resolution, so `radius` is ignored.
    fn draw_round_rect(&mut self, rect: Rect, _radius: f32, color: Color) -> Result<()> {
        let cols = usize::from(self.cols);
        let x0 = rect.left.round().max(0.0) as usize;
        let x1 = (rect.right.round().max(0.0) as usize).min(cols);
        let y0 = rect.top.round().max(0.0) as usize;
        let y1 = (rect.bottom.round().max(0.0) as usize).min(self.pixel_height());

        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels[y * cols + x] = Some(color);
            }
        }
        Ok(())
    }
}

fn to_term(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.red(),
        g: color.green(),
        b: color.blue(),
    }
}
