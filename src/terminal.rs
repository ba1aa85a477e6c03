//! Terminal drawing context
//!
//! Every character cell shows two vertical pixels: the upper half block is
//! drawn in the foreground color and the lower half shows the background.

use std::io::{self, BufWriter, IsTerminal, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use log::debug;

use crate::color::Rgb;
use crate::error::{BackdropError, Result};
use crate::graphics::Canvas;
use crate::pointer::Viewport;
use crate::surface::DrawContext;

const HALF_BLOCK: char = '\u{2580}';

/// Terminal size in character cells, preferring termsize
pub fn terminal_size() -> Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => Ok(terminal::size()?),
    }
}

/// Maps a mouse cell to the device pixel at its center
pub fn cell_to_pixel(column: u16, row: u16) -> (f32, f32) {
    (column as f32 + 0.5, row as f32 * 2.0 + 1.0)
}

/// Raw-mode alternate screen with mouse capture, restored on drop
pub struct TerminalContext {
    out: BufWriter<Stdout>,
    columns: u16,
    rows: u16,
    overlay: Option<String>,
}

impl TerminalContext {
    pub fn new() -> Result<Self> {
        let stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(BackdropError::ContextUnavailable(
                "standard output is not a terminal".to_string(),
            ));
        }
        let (columns, rows) = terminal_size()?;
        enable_raw_mode()?;
        let mut out = BufWriter::new(stdout);
        if let Err(error) = execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = disable_raw_mode();
            return Err(error.into());
        }
        debug!("Terminal context opened at {}x{} cells", columns, rows);
        Ok(TerminalContext {
            out,
            columns,
            rows,
            overlay: None,
        })
    }

    /// Records a new terminal size in cells
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    /// Text drawn over the top-left corner of every frame
    pub fn set_overlay(&mut self, overlay: Option<String>) {
        self.overlay = overlay;
    }

    fn write_frame(&mut self, canvas: &Canvas) -> io::Result<()> {
        let (columns, rows) = (self.columns as usize, self.rows as usize);
        if columns == 0 || rows == 0 {
            return Ok(());
        }
        // Canvas pixels covered by one device pixel
        let scale_x = canvas.width() as f32 / columns as f32;
        let scale_y = canvas.height() as f32 / (rows * 2) as f32;
        let block = |x: usize, y: usize| {
            let x0 = (x as f32 * scale_x) as usize;
            let y0 = (y as f32 * scale_y) as usize;
            let x1 = (((x + 1) as f32 * scale_x) as usize).max(x0 + 1);
            let y1 = (((y + 1) as f32 * scale_y) as usize).max(y0 + 1);
            to_color(canvas.block_average(x0, y0, x1, y1))
        };

        let mut current: Option<(Color, Color)> = None;
        for row in 0..rows {
            queue!(self.out, MoveTo(0, row as u16))?;
            for column in 0..columns {
                let colors = (block(column, row * 2), block(column, row * 2 + 1));
                if current != Some(colors) {
                    queue!(self.out, SetForegroundColor(colors.0), SetBackgroundColor(colors.1))?;
                    current = Some(colors);
                }
                queue!(self.out, Print(HALF_BLOCK))?;
            }
        }
        if let Some(overlay) = &self.overlay {
            queue!(
                self.out,
                MoveTo(0, 0),
                SetForegroundColor(Color::White),
                SetBackgroundColor(Color::Black),
                Print(overlay)
            )?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}

fn to_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb { r, g, b }
}

impl DrawContext for TerminalContext {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.columns, self.rows.saturating_mul(2))
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.write_frame(canvas)?;
        Ok(())
    }
}

impl Drop for TerminalContext {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        debug!("Terminal context restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_pixel_centers() {
        assert_eq!(cell_to_pixel(0, 0), (0.5, 1.0));
        assert_eq!(cell_to_pixel(9, 4), (9.5, 9.0));
    }

    #[test]
    fn test_to_color_clamps() {
        assert_eq!(to_color(Rgb::new(2.0, 0.5, -1.0)), Color::Rgb { r: 255, g: 128, b: 0 });
    }
}
