//! Linux Virtual Console Mirror for HD44780 Character LCDs
//!
//! A driver that shows a 16x2 window of a Linux text console on an HD44780
//! compatible LCD wired over a 4-bit GPIO bus, panned with four buttons.
//!
//! ## Features
//!
//! - `no_std` compatible core (display driver, viewport, buttons)
//! - `embedded-hal` v1.0 support
//! - Change-detecting redraw with live cursor tracking (with `alloc` feature)
//! - `/dev/vcs` console reader (with `std` feature)
//! - `vcs-lcd` binary for Raspberry Pi and other gpiochip boards (with `linux` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use vcs_lcd::{Builder, Buttons, ConsoleMirror, Display, Interface, VcsConsole};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! // D4, D5, D6, D7, EN, RS
//! let interface = Interface::new(MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//! let config = match Builder::new().build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! // Up, down, left, right
//! let buttons = Buttons::new(MockPin, MockPin, MockPin, MockPin);
//! let console = match VcsConsole::open("/dev/vcs", "/dev/vcsa") {
//!     Ok(console) => console,
//!     Err(_) => return,
//! };
//!
//! let mut mirror = match ConsoleMirror::new(display, console, buttons, 0, 0) {
//!     Ok(mirror) => mirror,
//!     Err(_) => return,
//! };
//! let _ = mirror.scroll(&mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

/// Push-button input
pub mod buttons;
/// Character cells
pub mod cell;
/// HD44780 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Console data source
pub mod console;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Viewport geometry
pub mod viewport;

/// Console mirroring (requires `alloc` feature)
#[cfg(feature = "alloc")]
pub mod mirror;

/// Runtime settings from the environment (requires `std` feature)
#[cfg(feature = "std")]
pub mod settings;

/// Pulled-up button inputs on Linux GPIO (requires `linux` feature)
#[cfg(feature = "linux")]
pub mod gpio;

#[cfg(test)]
mod test_support;

pub use buttons::{Button, ButtonInput, Buttons, DEFAULT_DEBOUNCE_US};
pub use cell::Cell;
pub use config::{Builder, Config, LCD_COLS, LCD_ROWS, SLICE_LEN};
pub use console::{ConsoleGeometry, ConsoleSource, CursorPosition};
pub use display::{Display, LocalCursor};
pub use error::{BuilderError, Error};
pub use interface::InterfaceError;
pub use interface::{
    DEFAULT_ENABLE_PULSE_NS, DEFAULT_NIBBLE_SETTLE_US, DisplayInterface, Interface,
};
pub use viewport::{ConsoleGrid, Viewport};

#[cfg(feature = "alloc")]
pub use mirror::{ConsoleMirror, Frame};

#[cfg(feature = "std")]
pub use console::{ConsoleError, VcsConsole};
#[cfg(feature = "std")]
pub use settings::{Pins, Settings, SettingsError};
