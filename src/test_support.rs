//! Shared test doubles for the display interface and timing.

use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::cell::Cell;
use crate::interface::DisplayInterface;

/// One transfer seen by [`MockInterface`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    Command(u8),
    Char(u8),
    Nibble(u8),
    Release,
}

/// Error returned by [`MockInterface`] when told to fail
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MockError;

#[derive(Debug, Default)]
pub struct MockInterface {
    pub ops: Vec<Op>,
    /// Fail the character write with this index (counted over all writes)
    pub fail_on_char: Option<usize>,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn chars(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl DisplayInterface for MockInterface {
    type Error = MockError;

    fn send_command<D: DelayNs>(&mut self, command: u8, _delay: &mut D) -> Result<(), Self::Error> {
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn send_character<D: DelayNs>(&mut self, cell: Cell, _delay: &mut D) -> Result<(), Self::Error> {
        let written = self.ops.iter().filter(|op| matches!(op, Op::Char(_))).count();
        if self.fail_on_char == Some(written) {
            return Err(MockError);
        }
        self.ops.push(Op::Char(cell.code()));
        Ok(())
    }

    fn send_nibble<D: DelayNs>(&mut self, nibble: u8, _delay: &mut D) -> Result<(), Self::Error> {
        self.ops.push(Op::Nibble(nibble));
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.ops.push(Op::Release);
        Ok(())
    }
}

/// Delay that returns immediately but remembers the total requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
