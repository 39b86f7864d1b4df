//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with an HD44780 controller over a 4-bit parallel bus.
//!
//! ## Hardware Requirements
//!
//! The 4-bit bus needs 6 GPIO outputs:
//! - **D4-D7**: upper half of the data bus
//! - **EN**: Enable strobe, data is latched on the falling edge
//! - **RS**: Register select (low=instruction, high=character data)
//!
//! R/W is expected to be tied to ground; the driver never reads the busy flag
//! and relies on fixed settle delays instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use vcs_lcd::{Cell, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! // D4, D5, D6, D7, EN, RS
//! let mut interface = Interface::new(MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//!
//! // Send command
//! let _ = interface.send_command(0x01, &mut delay); // Clear display
//!
//! // Send a character
//! let _ = interface.send_character(Cell::from(b'A'), &mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::cell::Cell;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for hardware interface to an HD44780 controller
///
/// This trait abstracts over different bus implementations, allowing the
/// [`Display`](crate::display::Display) to work with any transport that can
/// move a byte into the instruction or data register.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If your LCD sits
/// behind an I/O expander or a different bus, implement this trait on your own
/// type. Test doubles implement it to record the traffic.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send an instruction byte to the controller
    ///
    /// The implementation must:
    /// 1. Set RS low (instruction register)
    /// 2. Transfer the high nibble, then the low nibble
    ///
    /// Settle time after the instruction is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if a GPIO operation fails.
    fn send_command<D: DelayNs>(
        &mut self,
        command: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Send a character to the controller's data register
    ///
    /// The implementation must:
    /// 1. Set RS high (data register)
    /// 2. Transfer the high nibble, then the low nibble
    ///
    /// The controller stores the glyph at its address counter and advances it.
    ///
    /// # Errors
    ///
    /// Returns an error if a GPIO operation fails.
    fn send_character<D: DelayNs>(
        &mut self,
        cell: Cell,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Transfer a single instruction nibble
    ///
    /// Only used during initialization by instruction, while the controller
    /// may still be listening on an 8-bit bus. The lower 4 bits of `nibble`
    /// are placed on D4-D7.
    ///
    /// # Errors
    ///
    /// Returns an error if a GPIO operation fails.
    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Drive every bus line low
    ///
    /// Leaves the bus idle before the lines are handed back.
    ///
    /// # Errors
    ///
    /// Returns the first GPIO error; all lines are still attempted.
    fn release(&mut self) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over the GPIO error type.
#[derive(Debug)]
pub enum InterfaceError<PinErr> {
    /// GPIO pin error
    Pin(PinErr),
}

impl<PinErr: Debug> core::fmt::Display for InterfaceError<PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<PinErr: Debug> core::error::Error for InterfaceError<PinErr> {}

/// Default enable pulse width in nanoseconds
///
/// The datasheet minimum is 450ns.
pub const DEFAULT_ENABLE_PULSE_NS: u32 = 450;

/// Default wait after each nibble in microseconds
///
/// Covers the 37us execution time of ordinary instructions and writes.
pub const DEFAULT_NIBBLE_SETTLE_US: u32 = 50;

/// 4-bit parallel bus implementation for HD44780
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 output pins.
///
/// ## Type Parameters
///
/// * `D4`-`D7` - Data lines implementing [`OutputPin`]
/// * `EN` - Enable strobe implementing [`OutputPin`]
/// * `RS` - Register select implementing [`OutputPin`]
pub struct Interface<D4, D5, D6, D7, EN, RS> {
    /// Data bit 4 (nibble bit 0)
    d4: D4,
    /// Data bit 5 (nibble bit 1)
    d5: D5,
    /// Data bit 6 (nibble bit 2)
    d6: D6,
    /// Data bit 7 (nibble bit 3)
    d7: D7,
    /// Enable strobe
    en: EN,
    /// Register select (low=instruction, high=data)
    rs: RS,
    /// Enable high time in nanoseconds
    enable_pulse_ns: u32,
    /// Wait after each nibble in microseconds
    nibble_settle_us: u32,
}

impl<D4, D5, D6, D7, EN, RS> Interface<D4, D5, D6, D7, EN, RS>
where
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
    EN: OutputPin,
    RS: OutputPin,
{
    /// Create a new Interface
    ///
    /// Pins are expected to be configured as outputs already, ideally
    /// starting low.
    pub fn new(d4: D4, d5: D5, d6: D6, d7: D7, en: EN, rs: RS) -> Self {
        Self {
            d4,
            d5,
            d6,
            d7,
            en,
            rs,
            enable_pulse_ns: DEFAULT_ENABLE_PULSE_NS,
            nibble_settle_us: DEFAULT_NIBBLE_SETTLE_US,
        }
    }

    /// Set the enable pulse width in nanoseconds
    pub fn set_enable_pulse(&mut self, pulse_ns: u32) -> &mut Self {
        self.enable_pulse_ns = pulse_ns;
        self
    }

    /// Get the enable pulse width in nanoseconds
    pub fn enable_pulse(&self) -> u32 {
        self.enable_pulse_ns
    }

    /// Set the wait after each nibble in microseconds
    pub fn set_nibble_settle(&mut self, settle_us: u32) -> &mut Self {
        self.nibble_settle_us = settle_us;
        self
    }

    /// Get the wait after each nibble in microseconds
    pub fn nibble_settle(&self) -> u32 {
        self.nibble_settle_us
    }
}

impl<D4, D5, D6, D7, EN, RS, PinErr> Interface<D4, D5, D6, D7, EN, RS>
where
    D4: OutputPin<Error = PinErr>,
    D5: OutputPin<Error = PinErr>,
    D6: OutputPin<Error = PinErr>,
    D7: OutputPin<Error = PinErr>,
    EN: OutputPin<Error = PinErr>,
    RS: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    /// Put a nibble on D4-D7 and strobe EN
    fn write_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PinErr>> {
        self.d4
            .set_state(PinState::from(nibble & 0x01 != 0))
            .map_err(InterfaceError::Pin)?;
        self.d5
            .set_state(PinState::from(nibble & 0x02 != 0))
            .map_err(InterfaceError::Pin)?;
        self.d6
            .set_state(PinState::from(nibble & 0x04 != 0))
            .map_err(InterfaceError::Pin)?;
        self.d7
            .set_state(PinState::from(nibble & 0x08 != 0))
            .map_err(InterfaceError::Pin)?;

        self.en.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ns(self.enable_pulse_ns);
        self.en.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_us(self.nibble_settle_us);
        Ok(())
    }

    fn write_byte<D: DelayNs>(
        &mut self,
        byte: u8,
        register: PinState,
        delay: &mut D,
    ) -> InterfaceResult<(), InterfaceError<PinErr>> {
        self.rs.set_state(register).map_err(InterfaceError::Pin)?;
        self.write_nibble(byte >> 4, delay)?;
        self.write_nibble(byte & 0x0F, delay)
    }
}

impl<D4, D5, D6, D7, EN, RS, PinErr> DisplayInterface for Interface<D4, D5, D6, D7, EN, RS>
where
    D4: OutputPin<Error = PinErr>,
    D5: OutputPin<Error = PinErr>,
    D6: OutputPin<Error = PinErr>,
    D7: OutputPin<Error = PinErr>,
    EN: OutputPin<Error = PinErr>,
    RS: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<PinErr>;

    fn send_command<D: DelayNs>(
        &mut self,
        command: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        self.write_byte(command, PinState::Low, delay)
    }

    fn send_character<D: DelayNs>(
        &mut self,
        cell: Cell,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        self.write_byte(cell.code(), PinState::High, delay)
    }

    fn send_nibble<D: DelayNs>(
        &mut self,
        nibble: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        self.rs.set_low().map_err(InterfaceError::Pin)?;
        self.write_nibble(nibble & 0x0F, delay)
    }

    fn release(&mut self) -> InterfaceResult<(), Self::Error> {
        // Attempt every line even if one fails
        let results = [
            self.en.set_low(),
            self.rs.set_low(),
            self.d4.set_low(),
            self.d5.set_low(),
            self.d6.set_low(),
            self.d7.set_low(),
        ];
        for result in results {
            result.map_err(InterfaceError::Pin)?;
        }
        Ok(())
    }
}
