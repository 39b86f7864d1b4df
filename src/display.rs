//! Core display operations

use embedded_hal::delay::DelayNs;
use log::trace;

use crate::cell::Cell;
use crate::command::{
    CLEAR_DISPLAY, CURSOR_BLINK, CURSOR_ON, DISPLAY_CONTROL, DISPLAY_ON, ENTRY_LEFT_TO_RIGHT,
    FOUR_BIT_NIBBLE, FUNCTION_4BIT_2LINE, RETURN_HOME, SET_DDRAM_ADDR, WAKE_UP_NIBBLE,
};
use crate::config::{Config, LCD_COLS, LCD_ROWS, SLICE_LEN};
use crate::error::Error;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Cursor position on the LCD itself
///
/// `col` is always in `0..16` and `row` in `0..2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalCursor {
    pub(crate) col: usize,
    pub(crate) row: usize,
}

impl LocalCursor {
    /// Position at `(col, row)`, or `None` if it is off the LCD
    pub fn new(col: usize, row: usize) -> Option<Self> {
        (col < LCD_COLS && row < LCD_ROWS).then_some(Self { col, row })
    }

    /// Column on the LCD
    pub fn col(&self) -> usize {
        self.col
    }

    /// Row on the LCD
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Core display driver for HD44780
///
/// This struct sequences instructions with the settle delays the controller
/// needs. For console mirroring, use `ConsoleMirror` (requires `alloc` feature).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        Self { interface, config }
    }

    /// Bring the controller into 4-bit, 2-line mode and clear it
    ///
    /// Runs initialization by instruction first, so this works whether the
    /// controller was just powered on or is still in 4-bit mode from a
    /// previous run. The display is left on with a blinking cursor at home.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        delay.delay_ms(self.config.power_on_delay_ms);

        // Force 8-bit mode from any state, then switch to 4-bit
        for _ in 0..3 {
            self.interface
                .send_nibble(WAKE_UP_NIBBLE, delay)
                .map_err(Error::Interface)?;
            delay.delay_us(self.config.init_settle_us);
        }
        self.interface
            .send_nibble(FOUR_BIT_NIBBLE, delay)
            .map_err(Error::Interface)?;
        delay.delay_us(self.config.init_settle_us);

        let display_mode = self.cursor_on_mode();
        for command in [
            FUNCTION_4BIT_2LINE,
            display_mode,
            CLEAR_DISPLAY,
            ENTRY_LEFT_TO_RIGHT,
        ] {
            self.send_command(command, delay)?;
            delay.delay_us(self.config.init_settle_us);
        }

        Ok(())
    }

    /// Clear the display and return the address counter to 0
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(CLEAR_DISPLAY, delay)?;
        delay.delay_us(self.config.clear_settle_us);
        Ok(())
    }

    /// Move the write cursor to line 1, column 0
    pub fn return_home<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(RETURN_HOME, delay)?;
        delay.delay_us(self.config.home_settle_us);
        Ok(())
    }

    /// Set the DDRAM address counter
    pub fn set_ddram_address<D: DelayNs>(&mut self, address: u8, delay: &mut D) -> DisplayResult<I> {
        self.send_command(SET_DDRAM_ADDR | (address & 0x7F), delay)?;
        delay.delay_us(self.config.command_settle_us);
        Ok(())
    }

    /// Show the cursor and park it at `cursor`
    pub fn show_cursor<D: DelayNs>(
        &mut self,
        cursor: LocalCursor,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let mode = self.cursor_on_mode();
        self.send_command(mode, delay)?;
        delay.delay_us(self.config.command_settle_us);

        let address = self.config.ddram_address(cursor);
        trace!("cursor at {},{} (DDRAM {:#04x})", cursor.col, cursor.row, address);
        self.set_ddram_address(address, delay)
    }

    /// Hide the cursor, leaving the display on
    pub fn hide_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        trace!("cursor hidden");
        self.send_command(DISPLAY_CONTROL | DISPLAY_ON, delay)
    }

    /// Write a single cell at the current address
    pub fn write_cell<D: DelayNs>(&mut self, cell: Cell, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .send_character(cell, delay)
            .map_err(Error::Interface)
    }

    /// Rewrite the whole LCD from a row-major 16x2 slice
    ///
    /// Starts from home and repositions the write cursor at the start of each
    /// following line, since the line addresses are not contiguous.
    pub fn write_screen<D: DelayNs>(
        &mut self,
        cells: &[Cell; SLICE_LEN],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.return_home(delay)?;
        let first_line = self.config.line_offsets[0];
        if first_line != 0 {
            self.set_ddram_address(first_line, delay)?;
        }
        for (i, &cell) in cells.iter().enumerate() {
            if i != 0 && i % LCD_COLS == 0 {
                let address = self.config.line_offsets[i / LCD_COLS];
                self.set_ddram_address(address, delay)?;
            }
            self.write_cell(cell, delay)?;
        }
        Ok(())
    }

    /// Blank the display, switch it off and idle the bus
    ///
    /// Every step is attempted; the first error is returned.
    pub fn shutdown<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let cleared = self.clear(delay);
        let off = self.send_command(DISPLAY_CONTROL, delay);
        let released = self.interface.release().map_err(Error::Interface);
        cleared.and(off).and(released)
    }

    /// Get a reference to the display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Get a mutable reference to the hardware interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Display control value with the cursor visible
    fn cursor_on_mode(&self) -> u8 {
        let blink = if self.config.cursor_blink {
            CURSOR_BLINK
        } else {
            0
        };
        DISPLAY_CONTROL | DISPLAY_ON | CURSOR_ON | blink
    }

    fn send_command<D: DelayNs>(&mut self, command: u8, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .send_command(command, delay)
            .map_err(Error::Interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::test_support::{MockDelay, MockInterface, Op};
    use alloc::vec::Vec;

    fn test_display() -> Display<MockInterface> {
        Display::new(MockInterface::new(), Builder::new().build().unwrap())
    }

    #[test]
    fn test_init_sequence() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        display.init(&mut delay).unwrap();
        assert_eq!(
            display.interface().ops,
            [
                Op::Nibble(0x3),
                Op::Nibble(0x3),
                Op::Nibble(0x3),
                Op::Nibble(0x2),
                Op::Command(0x28),
                Op::Command(0x0F),
                Op::Command(0x01),
                Op::Command(0x06),
            ]
        );
        // power-on wait plus eight 10ms settles
        assert!(delay.total_ns >= 130_000_000);
    }

    #[test]
    fn test_init_without_blink() {
        let config = Builder::new().cursor_blink(false).build().unwrap();
        let mut display = Display::new(MockInterface::new(), config);
        display.init(&mut MockDelay::default()).unwrap();
        assert!(display.interface().commands().contains(&0x0E));
    }

    #[test]
    fn test_write_screen_repositions_line_two() {
        let mut display = test_display();
        let cells: [Cell; SLICE_LEN] = core::array::from_fn(|i| Cell::new(b'a' + i as u8));
        display
            .write_screen(&cells, &mut MockDelay::default())
            .unwrap();

        let ops = &display.interface().ops;
        assert_eq!(ops[0], Op::Command(RETURN_HOME));
        assert_eq!(ops[1..17].len(), 16);
        assert!(ops[1..17].iter().all(|op| matches!(op, Op::Char(_))));
        assert_eq!(ops[17], Op::Command(SET_DDRAM_ADDR | 0x40));
        assert_eq!(ops.len(), 1 + 32 + 1);

        let written: Vec<u8> = display.interface().chars();
        let expected: Vec<u8> = cells.iter().map(|c| c.code()).collect();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_write_screen_honours_first_line_offset() {
        let config = Builder::new().line_offsets([0x10, 0x50]).build().unwrap();
        let mut display = Display::new(MockInterface::new(), config);
        let mut delay = MockDelay::default();
        display
            .write_screen(&[Cell::BLANK; SLICE_LEN], &mut delay)
            .unwrap();

        let ops = &display.interface().ops;
        assert_eq!(ops[0], Op::Command(RETURN_HOME));
        assert_eq!(ops[1], Op::Command(SET_DDRAM_ADDR | 0x10));
        assert_eq!(ops[18], Op::Command(SET_DDRAM_ADDR | 0x50));

        display.interface_mut().clear();
        display
            .show_cursor(LocalCursor { col: 0, row: 0 }, &mut delay)
            .unwrap();
        assert_eq!(display.interface().commands()[1], SET_DDRAM_ADDR | 0x10);
    }

    #[test]
    fn test_return_home_settles_longer_than_address_set() {
        let mut display = test_display();

        let mut delay = MockDelay::default();
        display.return_home(&mut delay).unwrap();
        let home_ns = delay.total_ns;

        let mut delay = MockDelay::default();
        display.set_ddram_address(0x40, &mut delay).unwrap();
        let address_ns = delay.total_ns;

        assert!(home_ns >= 1_520_000, "return-home settled {home_ns}ns");
        assert!(home_ns > address_ns);
    }

    #[test]
    fn test_local_cursor_rejects_off_screen() {
        assert_eq!(
            LocalCursor::new(15, 1),
            Some(LocalCursor { col: 15, row: 1 })
        );
        assert_eq!(LocalCursor::new(16, 0), None);
        assert_eq!(LocalCursor::new(0, 2), None);
    }

    #[test]
    fn test_show_cursor_sets_address() {
        let mut display = test_display();
        display
            .show_cursor(LocalCursor { col: 4, row: 1 }, &mut MockDelay::default())
            .unwrap();
        assert_eq!(
            display.interface().commands(),
            [DISPLAY_CONTROL | DISPLAY_ON | CURSOR_ON | CURSOR_BLINK, 0x80 | 0x44]
        );
    }

    #[test]
    fn test_hide_cursor() {
        let mut display = test_display();
        display.hide_cursor(&mut MockDelay::default()).unwrap();
        assert_eq!(display.interface().commands(), [0x0C]);
    }

    #[test]
    fn test_clear_waits_for_clear_settle() {
        let mut display = test_display();
        let mut delay = MockDelay::default();
        display.clear(&mut delay).unwrap();
        assert_eq!(display.interface().commands(), [CLEAR_DISPLAY]);
        assert!(delay.total_ns >= 2_000_000);
    }

    #[test]
    fn test_set_ddram_address_masks_to_seven_bits() {
        let mut display = test_display();
        display
            .set_ddram_address(0xC0, &mut MockDelay::default())
            .unwrap();
        assert_eq!(display.interface().commands(), [0xC0]);
    }

    #[test]
    fn test_shutdown_clears_turns_off_and_releases() {
        let mut display = test_display();
        display.shutdown(&mut MockDelay::default()).unwrap();
        assert_eq!(
            display.interface().ops,
            [
                Op::Command(CLEAR_DISPLAY),
                Op::Command(DISPLAY_CONTROL),
                Op::Release
            ]
        );
    }
}
