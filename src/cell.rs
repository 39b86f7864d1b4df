//! Character cell type
//!
//! A [`Cell`] is one byte of console text exactly as it sits in the vcs
//! screen dump, and exactly as it is written into the HD44780 character RAM.
//! There is no encoding step in between: bytes in the ASCII range map to the
//! same glyphs on the ROM A00 character generator, everything else shows
//! whatever the ROM holds at that code.
//!
//! ## Example
//!
//! ```
//! use vcs_lcd::Cell;
//!
//! let cell = Cell::from(b'A');
//! assert_eq!(cell.code(), 0x41);
//! assert_eq!(Cell::BLANK.code(), b' ');
//! ```

/// A single character cell as sent to the display
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    /// Blank cell (ASCII space)
    ///
    /// Used for console cells that are missing from a short snapshot.
    pub const BLANK: Cell = Cell(b' ');

    /// Create a cell from a raw character code
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw character code
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Cell {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.0
    }
}

/// Copy raw console bytes into a row of cells
///
/// Cells past the end of `bytes` are filled with [`Cell::BLANK`].
pub fn fill_row(row: &mut [Cell], bytes: &[u8]) {
    for (i, cell) in row.iter_mut().enumerate() {
        *cell = bytes.get(i).copied().map_or(Cell::BLANK, Cell::new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nul() {
        assert_eq!(Cell::default().code(), 0x00);
    }

    #[test]
    fn test_round_trip_byte() {
        assert_eq!(u8::from(Cell::from(0xA5)), 0xA5);
    }

    #[test]
    fn test_fill_row_pads_with_blank() {
        let mut row = [Cell::default(); 4];
        fill_row(&mut row, b"ab");
        assert_eq!(
            row,
            [Cell::new(b'a'), Cell::new(b'b'), Cell::BLANK, Cell::BLANK]
        );
    }
}
