//! Drawing birdoid positions onto a character grid.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use birdoid_core::Vector2;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

/// A display surface the simulation loop can draw on.
pub trait Renderer {
    /// Current drawable area as `(height, width)` in cells.
    fn bounds(&self) -> Result<(u32, u32)>;

    fn draw(&mut self, positions: &[Vector2]) -> Result<()>;
}

/// In-memory character grid. Row `y`, column `x`.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    height: u32,
    width: u32,
    glyph: char,
    cells: Vec<char>,
}

impl FrameBuffer {
    pub fn new(height: u32, width: u32, glyph: char) -> Self {
        Self {
            height,
            width,
            glyph,
            cells: vec![' '; height as usize * width as usize],
        }
    }

    pub fn resize(&mut self, height: u32, width: u32) {
        self.height = height;
        self.width = width;
        self.cells = vec![' '; height as usize * width as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Mark the cell under each position. Positions are truncated toward
    /// zero; anything off the grid or not finite is skipped.
    pub fn plot(&mut self, positions: &[Vector2]) {
        for p in positions {
            if let Some(index) = self.cell_index(*p) {
                self.cells[index] = self.glyph;
            }
        }
    }

    pub fn glyph_at(&self, row: u32, col: u32) -> Option<char> {
        if row < self.height && col < self.width {
            Some(self.cells[self.index(row as usize, col as usize)])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().collect())
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c == self.glyph).count()
    }

    fn cell_index(&self, p: Vector2) -> Option<usize> {
        if !p.is_finite() {
            return None;
        }
        let (col, row) = (p.x.trunc(), p.y.trunc());
        if col < 0.0 || row < 0.0 || col >= f64::from(self.width) || row >= f64::from(self.height) {
            return None;
        }
        Some(self.index(row as usize, col as usize))
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width as usize + col
    }
}

impl Renderer for FrameBuffer {
    fn bounds(&self) -> Result<(u32, u32)> {
        Ok((self.height, self.width))
    }

    fn draw(&mut self, positions: &[Vector2]) -> Result<()> {
        self.clear();
        self.plot(positions);
        Ok(())
    }
}

/// Renders on the real terminal through crossterm.
///
/// Raw mode and the alternate screen are entered only once the renderer
/// exists, and left again on drop, so the shell is restored even when setup
/// or the loop errors out.
pub struct TerminalRenderer {
    out: Stdout,
    buffer: FrameBuffer,
}

impl TerminalRenderer {
    pub fn new(glyph: char) -> Result<Self> {
        let (height, width) = terminal_bounds()?;
        let mut renderer = Self {
            out: io::stdout(),
            buffer: FrameBuffer::new(height, width, glyph),
        };

        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(renderer.out, EnterAlternateScreen, Hide)
            .context("Failed to enter alternate screen")?;
        Ok(renderer)
    }
}

/// Undo the screen changes made by [`TerminalRenderer::new`]. Safe to call
/// when they were never made.
fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Show, LeaveAlternateScreen)
}

fn terminal_bounds() -> Result<(u32, u32)> {
    let (cols, rows) = terminal::size().context("Failed to query terminal size")?;
    Ok((u32::from(rows), u32::from(cols)))
}

impl Renderer for TerminalRenderer {
    fn bounds(&self) -> Result<(u32, u32)> {
        terminal_bounds()
    }

    fn draw(&mut self, positions: &[Vector2]) -> Result<()> {
        let (height, width) = terminal_bounds()?;
        if self.buffer.bounds()? != (height, width) {
            self.buffer.resize(height, width);
            queue!(self.out, Clear(ClearType::All))?;
        }

        self.buffer.draw(positions)?;
        for (row, line) in self.buffer.rows().enumerate() {
            queue!(self.out, MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush().context("Failed to flush terminal")?;
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if let Err(e) = leave_screen(&mut self.out) {
            log::error!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("Failed to disable raw mode: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_truncates_to_cells() {
        let mut frame = FrameBuffer::new(4, 6, 'o');
        frame.plot(&[Vector2::new(2.9, 1.2), Vector2::new(0.0, 3.99)]);
        assert_eq!(frame.glyph_at(1, 2), Some('o'));
        assert_eq!(frame.glyph_at(3, 0), Some('o'));
        assert_eq!(frame.occupied(), 2);
    }

    #[test]
    fn test_plot_skips_out_of_bounds_and_non_finite() {
        let mut frame = FrameBuffer::new(4, 6, 'o');
        frame.plot(&[
            Vector2::new(-0.5, 1.0),
            Vector2::new(-1.0, 1.0),
            Vector2::new(6.0, 1.0),
            Vector2::new(1.0, 4.0),
            Vector2::new(f64::NAN, 1.0),
            Vector2::new(1.0, f64::INFINITY),
        ]);
        // -0.5 truncates to column 0 and is drawn.
        assert_eq!(frame.occupied(), 1);
        assert_eq!(frame.glyph_at(1, 0), Some('o'));
    }

    #[test]
    fn test_rows_render_grid() {
        let mut frame = FrameBuffer::new(2, 3, '*');
        frame
            .draw(&[Vector2::new(0.0, 0.0), Vector2::new(2.0, 1.0)])
            .unwrap();
        let rows: Vec<String> = frame.rows().collect();
        assert_eq!(rows, vec!["*  ".to_string(), "  *".to_string()]);
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let mut frame = FrameBuffer::new(3, 3, 'o');
        frame.draw(&[Vector2::new(1.0, 1.0)]).unwrap();
        frame.draw(&[Vector2::new(2.0, 2.0)]).unwrap();
        assert_eq!(frame.glyph_at(1, 1), Some(' '));
        assert_eq!(frame.glyph_at(2, 2), Some('o'));
    }

    #[test]
    fn test_resize() {
        let mut frame = FrameBuffer::new(2, 2, 'o');
        frame.resize(5, 7);
        assert_eq!(frame.bounds().unwrap(), (5, 7));
        assert_eq!(frame.rows().count(), 5);
        assert_eq!(frame.glyph_at(4, 6), Some(' '));
        assert_eq!(frame.glyph_at(5, 0), None);
    }

    #[test]
    fn test_glyph_at_matches_plotted_cells() {
        let mut frame = FrameBuffer::new(5, 9, 'o');
        let positions: Vec<Vector2> = (0..9)
            .map(|i| Vector2::new(f64::from(i), f64::from(i % 5)))
            .collect();
        frame.plot(&positions);

        for row in 0..5 {
            for col in 0..9 {
                let expected = if col % 5 == row { 'o' } else { ' ' };
                assert_eq!(frame.glyph_at(row, col), Some(expected));
            }
        }
        let last_row = frame.rows().last().unwrap();
        assert_eq!(last_row, "    o    ");
    }

    #[test]
    fn test_leave_screen_restores_cursor_and_main_screen() {
        let mut out = Vec::new();
        leave_screen(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[?1049l"));
    }
}
