//! HD44780 command definitions
//!
//! This module defines the instruction bytes used to control an
//! HD44780-compatible character LCD. Instructions are written with the RS
//! line low; character data is written with RS high.
//!
//! Most instructions are a base opcode ORed with flag bits, e.g.
//! `DISPLAY_CONTROL | DISPLAY_ON | CURSOR_ON`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vcs_lcd::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let mut interface = Interface::new(MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//! // Display on, cursor hidden
//! let _ = interface.send_command(command::DISPLAY_CONTROL | command::DISPLAY_ON, &mut delay);
//!
//! // Move the write cursor to the start of line 2
//! let _ = interface.send_command(command::SET_DDRAM_ADDR | 0x40, &mut delay);
//! ```

// Basic instructions

/// Clear display (0x01)
///
/// Fills DDRAM with spaces and returns the address counter to 0.
/// Needs ~1.52ms to complete.
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Return home (0x02)
///
/// Sets the address counter to 0 and undoes any display shift.
/// Needs ~1.52ms to complete.
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set (0x04)
///
/// Combine with [`ENTRY_INCREMENT`] and [`ENTRY_SHIFT`].
pub const ENTRY_MODE_SET: u8 = 0x04;

/// Address counter increments after each write
pub const ENTRY_INCREMENT: u8 = 0x02;

/// Display shifts with each write
pub const ENTRY_SHIFT: u8 = 0x01;

/// Display on/off control (0x08)
///
/// Combine with [`DISPLAY_ON`], [`CURSOR_ON`] and [`CURSOR_BLINK`].
pub const DISPLAY_CONTROL: u8 = 0x08;

/// Display enabled
pub const DISPLAY_ON: u8 = 0x04;

/// Underline cursor visible
pub const CURSOR_ON: u8 = 0x02;

/// Cursor position blinks
pub const CURSOR_BLINK: u8 = 0x01;

/// Function set (0x20)
///
/// Combine with [`EIGHT_BIT_BUS`], [`TWO_LINES`] and [`FONT_5X10`].
/// Absence of a flag selects 4-bit bus, 1 line and 5x8 font respectively.
pub const FUNCTION_SET: u8 = 0x20;

/// 8-bit data bus
pub const EIGHT_BIT_BUS: u8 = 0x10;

/// Two display lines
pub const TWO_LINES: u8 = 0x08;

/// 5x10 dot font
pub const FONT_5X10: u8 = 0x04;

/// Set DDRAM address (0x80)
///
/// OR with a 7-bit DDRAM address. In 2-line mode line 1 starts at 0x00
/// and line 2 at 0x40.
pub const SET_DDRAM_ADDR: u8 = 0x80;

// Initialization by instruction

/// Nibble written three times after power-on to force 8-bit mode
pub const WAKE_UP_NIBBLE: u8 = 0x03;

/// Nibble that switches the controller into 4-bit mode
pub const FOUR_BIT_NIBBLE: u8 = 0x02;

/// Highest valid DDRAM address in 2-line mode
pub const DDRAM_MAX_ADDR: u8 = 0x67;

/// Function set used by the mirror: 4-bit bus, 2 lines, 5x8 font (0x28)
pub const FUNCTION_4BIT_2LINE: u8 = FUNCTION_SET | TWO_LINES;

/// Entry mode used by the mirror: increment, no shift (0x06)
pub const ENTRY_LEFT_TO_RIGHT: u8 = ENTRY_MODE_SET | ENTRY_INCREMENT;
