//! Viewport geometry
//!
//! This module maps between the console grid and the 16x2 window shown on
//! the LCD: which console bytes are visible, where the console cursor lands on
//! the LCD, and how the window moves when a button is pressed.
//!
//! The console grid is stored row-major, `cols` bytes per line, so the cell at
//! `(x, y)` lives at byte `y * cols + x`. The viewport covers
//! `[view_x, view_x + 16) x [view_y, view_y + 2)`.
//!
//! ## Example
//!
//! ```
//! use vcs_lcd::{Button, ConsoleGeometry, CursorPosition, LocalCursor, Viewport};
//!
//! let geometry = ConsoleGeometry { lines: 24, cols: 80 };
//! let mut view = match Viewport::new(geometry, 0, 0) {
//!     Some(view) => view,
//!     None => return,
//! };
//!
//! // Cursor at column 5 of the top line shows up at LCD column 5
//! let cursor = CursorPosition { x: 5, y: 0 };
//! assert_eq!(view.locate(cursor), LocalCursor::new(5, 0));
//!
//! // Pan right by one column
//! assert!(view.step(Button::Right));
//! assert_eq!(view.locate(cursor), LocalCursor::new(4, 0));
//! ```

use crate::buttons::Button;
use crate::cell::{Cell, fill_row};
use crate::config::{LCD_COLS, LCD_ROWS, SLICE_LEN};
use crate::console::{ConsoleGeometry, CursorPosition};
use crate::display::LocalCursor;

/// Borrowed snapshot of the console text
///
/// Wraps the raw vcs bytes with the line width needed to index them.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleGrid<'a> {
    bytes: &'a [u8],
    cols: usize,
}

impl<'a> ConsoleGrid<'a> {
    /// Wrap a raw row-major snapshot
    pub fn new(bytes: &'a [u8], geometry: ConsoleGeometry) -> Self {
        Self {
            bytes,
            cols: geometry.cols as usize,
        }
    }

    /// Up to `len` bytes starting at `(x, y)`
    ///
    /// Shorter than `len` if the snapshot ends early.
    pub fn span(&self, x: usize, y: usize, len: usize) -> &'a [u8] {
        let start = y * self.cols + x;
        let end = start + len;
        self.bytes
            .get(start..end.min(self.bytes.len()))
            .unwrap_or(&[])
    }
}

/// Position of the LCD window within the console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    x: usize,
    y: usize,
    max_x: usize,
    max_y: usize,
}

impl Viewport {
    /// Create a viewport at `(x, y)`, clamped into the console
    ///
    /// Returns `None` if the console is smaller than the LCD.
    pub fn new(geometry: ConsoleGeometry, x: usize, y: usize) -> Option<Self> {
        let max_x = (geometry.cols as usize).checked_sub(LCD_COLS)?;
        let max_y = (geometry.lines as usize).checked_sub(LCD_ROWS)?;
        Some(Self {
            x: x.min(max_x),
            y: y.min(max_y),
            max_x,
            max_y,
        })
    }

    /// Console column shown in the leftmost LCD column
    pub fn x(&self) -> usize {
        self.x
    }

    /// Console line shown on the top LCD line
    pub fn y(&self) -> usize {
        self.y
    }

    /// Extract the visible cells, top line then bottom line
    ///
    /// Bytes missing from a short snapshot come back as [`Cell::BLANK`].
    pub fn slice(&self, grid: &ConsoleGrid<'_>) -> [Cell; SLICE_LEN] {
        let mut cells = [Cell::BLANK; SLICE_LEN];
        for (row, chunk) in cells.chunks_exact_mut(LCD_COLS).enumerate() {
            fill_row(chunk, grid.span(self.x, self.y + row, LCD_COLS));
        }
        cells
    }

    /// LCD position of a console cursor, if it is inside the window
    pub fn locate(&self, cursor: CursorPosition) -> Option<LocalCursor> {
        let col = (cursor.x as usize).checked_sub(self.x)?;
        let row = (cursor.y as usize).checked_sub(self.y)?;
        LocalCursor::new(col, row)
    }

    /// Whether `button` can move the window without leaving the console
    pub fn can_step(&self, button: Button) -> bool {
        match button {
            Button::Up => self.y > 0,
            Button::Left => self.x > 0,
            Button::Down => self.y < self.max_y,
            Button::Right => self.x < self.max_x,
        }
    }

    /// Move the window one cell in the direction of `button`
    ///
    /// Returns `false` and leaves the window alone at the console edge.
    pub fn step(&mut self, button: Button) -> bool {
        if !self.can_step(button) {
            return false;
        }
        match button {
            Button::Up => self.y -= 1,
            Button::Left => self.x -= 1,
            Button::Down => self.y += 1,
            Button::Right => self.x += 1,
        }
        true
    }
}
