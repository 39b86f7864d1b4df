//! Display configuration types and builder

pub use crate::error::BuilderError;
use crate::command::DDRAM_MAX_ADDR;
use crate::display::LocalCursor;

/// Visible columns on the LCD
pub const LCD_COLS: usize = 16;

/// Visible rows on the LCD
pub const LCD_ROWS: usize = 2;

/// Number of cells in one full screen of the LCD
pub const SLICE_LEN: usize = LCD_COLS * LCD_ROWS;

/// Default DDRAM start address of each LCD line (2-line mode)
pub const DEFAULT_LINE_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40];

/// Display configuration
///
/// This struct holds the settle times and addressing used to drive the
/// controller. Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// DDRAM address of the first cell of each line
    pub line_offsets: [u8; LCD_ROWS],
    /// Wait after cursor moves and line repositioning (us)
    pub command_settle_us: u32,
    /// Wait after return-home (us)
    pub home_settle_us: u32,
    /// Wait after clear-display (us)
    pub clear_settle_us: u32,
    /// Wait after each instruction of the init sequence (us)
    pub init_settle_us: u32,
    /// Wait before the first instruction after power-on (ms)
    pub power_on_delay_ms: u32,
    /// Whether the visible cursor blinks
    pub cursor_blink: bool,
}

impl Config {
    /// DDRAM address of a position on the LCD
    pub fn ddram_address(&self, cursor: LocalCursor) -> u8 {
        self.line_offsets[cursor.row()] + cursor.col() as u8
    }
}

impl Default for Config {
    fn default() -> Self {
        // Defaults are always valid
        Self {
            line_offsets: DEFAULT_LINE_OFFSETS,
            command_settle_us: 1_000,
            home_settle_us: 2_000,
            clear_settle_us: 2_000,
            init_settle_us: 10_000,
            power_on_delay_ms: 50,
            cursor_blink: true,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use vcs_lcd::Builder;
///
/// let config = match Builder::new().command_settle_us(500).cursor_blink(false).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.line_offsets, [0x00, 0x40]);
/// ```
#[must_use]
pub struct Builder {
    /// DDRAM address of the first cell of each line
    line_offsets: [u8; LCD_ROWS],
    /// Wait after cursor moves and line repositioning (us)
    command_settle_us: u32,
    /// Wait after return-home (us)
    home_settle_us: u32,
    /// Wait after clear-display (us)
    clear_settle_us: u32,
    /// Wait after each instruction of the init sequence (us)
    init_settle_us: u32,
    /// Wait before the first instruction after power-on (ms)
    power_on_delay_ms: u32,
    /// Whether the visible cursor blinks
    cursor_blink: bool,
}

impl Default for Builder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            line_offsets: config.line_offsets,
            command_settle_us: config.command_settle_us,
            home_settle_us: config.home_settle_us,
            clear_settle_us: config.clear_settle_us,
            init_settle_us: config.init_settle_us,
            power_on_delay_ms: config.power_on_delay_ms,
            cursor_blink: config.cursor_blink,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the DDRAM start address of each line
    ///
    /// Some modules map line 2 elsewhere than 0x40.
    pub fn line_offsets(mut self, offsets: [u8; LCD_ROWS]) -> Self {
        self.line_offsets = offsets;
        self
    }

    /// Set the settle time after cursor and address instructions
    pub fn command_settle_us(mut self, value: u32) -> Self {
        self.command_settle_us = value;
        self
    }

    /// Set the settle time after return-home
    ///
    /// The controller takes 1.52ms to execute it.
    pub fn home_settle_us(mut self, value: u32) -> Self {
        self.home_settle_us = value;
        self
    }

    /// Set the settle time after clear-display
    pub fn clear_settle_us(mut self, value: u32) -> Self {
        self.clear_settle_us = value;
        self
    }

    /// Set the settle time after each init instruction
    pub fn init_settle_us(mut self, value: u32) -> Self {
        self.init_settle_us = value;
        self
    }

    /// Set the power-on wait before initialization
    pub fn power_on_delay_ms(mut self, value: u32) -> Self {
        self.power_on_delay_ms = value;
        self
    }

    /// Set whether the visible cursor blinks
    pub fn cursor_blink(mut self, value: bool) -> Self {
        self.cursor_blink = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidLineOffset` if a line would run past the
    /// end of DDRAM
    pub fn build(self) -> Result<Config, BuilderError> {
        for (line, &offset) in self.line_offsets.iter().enumerate() {
            if offset > DDRAM_MAX_ADDR - (LCD_COLS as u8 - 1) {
                return Err(BuilderError::InvalidLineOffset { line, offset });
            }
        }
        Ok(Config {
            line_offsets: self.line_offsets,
            command_settle_us: self.command_settle_us,
            home_settle_us: self.home_settle_us,
            clear_settle_us: self.clear_settle_us,
            init_settle_us: self.init_settle_us,
            power_on_delay_ms: self.power_on_delay_ms,
            cursor_blink: self.cursor_blink,
        })
    }
}
