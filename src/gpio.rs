//! Button inputs on a Linux GPIO character device
//!
//! The buttons pull their line to ground, so each line is requested as an
//! input with the kernel pull-up bias enabled. All four lines share one
//! request; [`PullUpInput`] reads a single offset from it through the
//! `embedded-hal` [`InputPin`] trait.

use std::path::Path;
use std::sync::Arc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use gpiocdev::line::{Bias, Offset, Value};
use gpiocdev::request::{Config, Request};

/// Line configuration for active-low buttons: input, pull-up bias
pub fn pull_up_inputs(offsets: &[Offset]) -> Config {
    let mut config = Config::default();
    config.with_lines(offsets).as_input().with_bias(Bias::PullUp);
    config
}

/// Request `offsets` on `chip` as pulled-up inputs, one pin per offset
///
/// # Errors
///
/// Returns the kernel error if the chip cannot be opened or a line is busy.
pub fn request_pull_up_inputs<const N: usize>(
    chip: &Path,
    offsets: [Offset; N],
    consumer: &str,
) -> Result<[PullUpInput; N], gpiocdev::Error> {
    let request = Request::builder()
        .on_chip(chip)
        .with_config(pull_up_inputs(&offsets))
        .with_consumer(consumer)
        .request()?;
    let request = Arc::new(request);
    Ok(offsets.map(|offset| PullUpInput {
        request: Arc::clone(&request),
        offset,
    }))
}

/// Line read failure
#[derive(Debug)]
pub struct PinReadError(pub gpiocdev::Error);

impl embedded_hal::digital::Error for PinReadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl core::fmt::Display for PinReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO read failed: {}", self.0)
    }
}

impl std::error::Error for PinReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// One line of a shared input request
pub struct PullUpInput {
    request: Arc<Request>,
    offset: Offset,
}

impl PullUpInput {
    /// Line offset on the chip
    pub fn offset(&self) -> Offset {
        self.offset
    }
}

impl ErrorType for PullUpInput {
    type Error = PinReadError;
}

impl InputPin for PullUpInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.request
            .value(self.offset)
            .map(is_high)
            .map_err(PinReadError)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Lines are requested active-high, so an active value is a high level
fn is_high(value: Value) -> bool {
    value == Value::Active
}
