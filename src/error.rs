//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display and mirror operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors while driving the display or reading the console
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level GPIO errors
//!
//! ## Example
//!
//! ```
//! use vcs_lcd::{Builder, BuilderError};
//!
//! // Line 2 would run off the end of DDRAM
//! let result = Builder::new().line_offsets([0x00, 0x60]).build();
//! assert!(matches!(result, Err(BuilderError::InvalidLineOffset { line: 1, .. })));
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use crate::config::{LCD_COLS, LCD_ROWS};
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type, and
/// over the console source error `C`. Plain display operations never touch
/// the console and use the default `C = Infallible`.
#[derive(Debug)]
pub enum Error<I: DisplayInterface, C = Infallible> {
    /// Interface error (GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Console source error
    ///
    /// Wraps the error from the [`ConsoleSource`](crate::console::ConsoleSource).
    Console(C),
    /// Console is smaller than the LCD
    ///
    /// The console must have at least 2 lines and 16 columns for a viewport
    /// to exist.
    ConsoleTooSmall {
        /// Lines reported by the console
        lines: u16,
        /// Columns reported by the console
        cols: u16,
    },
}

impl<I: DisplayInterface> Error<I, Infallible> {
    /// Re-type a display-only error for a context that also reads a console
    pub fn widen<C>(self) -> Error<I, C> {
        match self {
            Self::Interface(e) => Error::Interface(e),
            Self::Console(never) => match never {},
            Self::ConsoleTooSmall { lines, cols } => Error::ConsoleTooSmall { lines, cols },
        }
    }
}

impl<I: DisplayInterface, C: Debug> core::fmt::Display for Error<I, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Console(e) => write!(f, "Console error: {e:?}"),
            Self::ConsoleTooSmall { lines, cols } => write!(
                f,
                "Console {cols}x{lines} is smaller than the {LCD_COLS}x{LCD_ROWS} display"
            ),
        }
    }
}

impl<I: DisplayInterface + Debug, C: Debug> core::error::Error for Error<I, C> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug)]
pub enum BuilderError {
    /// Line start address leaves no room for a full row
    ///
    /// See [`Builder::line_offsets()`](crate::config::Builder::line_offsets).
    InvalidLineOffset {
        /// Zero-based LCD line
        line: usize,
        /// DDRAM offset requested
        offset: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidLineOffset { line, offset } => write!(
                f,
                "Invalid DDRAM offset {offset:#04x} for line {line} (row of {LCD_COLS} must end by 0x67)"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
