//! Button input
//!
//! Four push buttons pan the viewport. They are wired active-low: each input
//! has a pull-up and the button shorts it to ground, so a low level means
//! "pressed".
//!
//! Reads are debounced by sampling twice with a short gap; a press is only
//! reported when both samples are low.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::warn;

/// Direction buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Pan up one line
    Up,
    /// Pan left one column
    Left,
    /// Pan down one line
    Down,
    /// Pan right one column
    Right,
}

impl Button {
    /// Order in which buttons are checked; the first press wins
    pub const PRIORITY: [Button; 4] = [Button::Up, Button::Left, Button::Down, Button::Right];
}

/// Source of debounced button state
///
/// Implemented by [`Buttons`] for GPIO inputs. Substitute your own
/// implementation to drive the viewport from something else, or in tests.
pub trait ButtonInput {
    /// Whether `button` is currently held down
    ///
    /// May block for the debounce gap.
    fn is_pressed<D: DelayNs>(&mut self, button: Button, delay: &mut D) -> bool;
}

/// Default gap between debounce samples in microseconds
pub const DEFAULT_DEBOUNCE_US: u32 = 1_000;

/// Four active-low buttons on GPIO inputs
pub struct Buttons<UP, DOWN, LEFT, RIGHT> {
    up: UP,
    down: DOWN,
    left: LEFT,
    right: RIGHT,
    /// Gap between the two samples in microseconds
    debounce_us: u32,
}

impl<UP, DOWN, LEFT, RIGHT> Buttons<UP, DOWN, LEFT, RIGHT>
where
    UP: InputPin,
    DOWN: InputPin,
    LEFT: InputPin,
    RIGHT: InputPin,
{
    /// Create a new button set
    ///
    /// Pins are expected to be configured as inputs with pull-ups already.
    pub fn new(up: UP, down: DOWN, left: LEFT, right: RIGHT) -> Self {
        Self {
            up,
            down,
            left,
            right,
            debounce_us: DEFAULT_DEBOUNCE_US,
        }
    }

    /// Set the gap between debounce samples in microseconds
    pub fn set_debounce(&mut self, debounce_us: u32) -> &mut Self {
        self.debounce_us = debounce_us;
        self
    }

    /// Get the gap between debounce samples in microseconds
    pub fn debounce(&self) -> u32 {
        self.debounce_us
    }
}

/// Sample an active-low pin twice
fn debounced_low<P: InputPin, D: DelayNs>(pin: &mut P, debounce_us: u32, delay: &mut D) -> bool {
    let mut sample = || match pin.is_low() {
        Ok(low) => low,
        Err(e) => {
            warn!("button read failed: {:?}", e);
            false
        }
    };

    if !sample() {
        return false;
    }
    delay.delay_us(debounce_us);
    sample()
}

impl<UP, DOWN, LEFT, RIGHT> ButtonInput for Buttons<UP, DOWN, LEFT, RIGHT>
where
    UP: InputPin,
    DOWN: InputPin,
    LEFT: InputPin,
    RIGHT: InputPin,
{
    fn is_pressed<D: DelayNs>(&mut self, button: Button, delay: &mut D) -> bool {
        let debounce_us = self.debounce_us;
        match button {
            Button::Up => debounced_low(&mut self.up, debounce_us, delay),
            Button::Down => debounced_low(&mut self.down, debounce_us, delay),
            Button::Left => debounced_low(&mut self.left, debounce_us, delay),
            Button::Right => debounced_low(&mut self.right, debounce_us, delay),
        }
    }
}
