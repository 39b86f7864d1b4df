//! Runtime settings from the environment
//!
//! The `vcs-lcd` binary takes no arguments. Wiring, console selection and poll
//! rate come from `VCS_LCD_*` environment variables, each with a default for a
//! Raspberry Pi wired to the BCM lines below.
//!
//! | Variable | Default |
//! |---|---|
//! | `VCS_LCD_GPIOCHIP` | `/dev/gpiochip0` |
//! | `VCS_LCD_TTY` | unset (`/dev/vcs`, `/dev/vcsa`) |
//! | `VCS_LCD_VCS` / `VCS_LCD_VCSA` | derived from `VCS_LCD_TTY` |
//! | `VCS_LCD_PIN_D4` .. `VCS_LCD_PIN_D7` | 4, 17, 27, 22 |
//! | `VCS_LCD_PIN_EN` / `VCS_LCD_PIN_RS` | 10 / 9 |
//! | `VCS_LCD_PIN_UP` / `DOWN` / `LEFT` / `RIGHT` | 11 / 8 / 7 / 25 |
//! | `VCS_LCD_POLL_MS` | 100 |
//! | `VCS_LCD_VIEW_X` / `VCS_LCD_VIEW_Y` | 0 / 0 |
//!
//! A value that does not parse is ignored with a warning.

use std::format;
use std::path::PathBuf;
use std::string::String;
use std::time::Duration;

use log::warn;

/// Prefix shared by every variable
const PREFIX: &str = "VCS_LCD_";

/// GPIO line offsets on the chip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pins {
    /// Data bit 4
    pub d4: u32,
    /// Data bit 5
    pub d5: u32,
    /// Data bit 6
    pub d6: u32,
    /// Data bit 7
    pub d7: u32,
    /// Enable strobe
    pub en: u32,
    /// Register select
    pub rs: u32,
    /// Pan up button
    pub up: u32,
    /// Pan down button
    pub down: u32,
    /// Pan left button
    pub left: u32,
    /// Pan right button
    pub right: u32,
}

impl Pins {
    /// LCD outputs in bus order: D4, D5, D6, D7, EN, RS
    pub fn outputs(&self) -> [u32; 6] {
        [self.d4, self.d5, self.d6, self.d7, self.en, self.rs]
    }

    /// Button inputs in the order up, down, left, right
    pub fn inputs(&self) -> [u32; 4] {
        [self.up, self.down, self.left, self.right]
    }

    /// Every configured line, outputs first
    pub fn all(&self) -> [u32; 10] {
        let [d4, d5, d6, d7, en, rs] = self.outputs();
        let [up, down, left, right] = self.inputs();
        [d4, d5, d6, d7, en, rs, up, down, left, right]
    }

    fn check_unique(&self) -> Result<(), SettingsError> {
        let all = self.all();
        for (i, offset) in all.iter().enumerate() {
            if all[i + 1..].contains(offset) {
                return Err(SettingsError::DuplicatePin { offset: *offset });
            }
        }
        Ok(())
    }
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            d4: 4,
            d5: 17,
            d6: 27,
            d7: 22,
            en: 10,
            rs: 9,
            up: 11,
            down: 8,
            left: 7,
            right: 25,
        }
    }
}

/// Errors validating settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Two functions were assigned the same GPIO line
    DuplicatePin {
        /// Line offset used more than once
        offset: u32,
    },
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicatePin { offset } => {
                write!(f, "GPIO line {offset} is assigned more than once")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Everything the binary needs to start
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// GPIO character device
    pub gpiochip: PathBuf,
    /// Console text device
    pub vcs: PathBuf,
    /// Console attribute device
    pub vcsa: PathBuf,
    /// Line assignments
    pub pins: Pins,
    /// Wait between polls
    pub poll: Duration,
    /// Initial window column
    pub view_x: usize,
    /// Initial window line
    pub view_y: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gpiochip: PathBuf::from("/dev/gpiochip0"),
            vcs: PathBuf::from("/dev/vcs"),
            vcsa: PathBuf::from("/dev/vcsa"),
            pins: Pins::default(),
            poll: Duration::from_millis(100),
            view_x: 0,
            view_y: 0,
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::DuplicatePin`] if two functions share a line.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);
        let defaults = Self::default();
        let default_pins = defaults.pins;

        let tty = env.parsed::<u16>("TTY");
        let (vcs, vcsa) = match tty {
            Some(n) => (
                PathBuf::from(format!("/dev/vcs{n}")),
                PathBuf::from(format!("/dev/vcsa{n}")),
            ),
            None => (defaults.vcs, defaults.vcsa),
        };

        let pins = Pins {
            d4: env.parsed("PIN_D4").unwrap_or(default_pins.d4),
            d5: env.parsed("PIN_D5").unwrap_or(default_pins.d5),
            d6: env.parsed("PIN_D6").unwrap_or(default_pins.d6),
            d7: env.parsed("PIN_D7").unwrap_or(default_pins.d7),
            en: env.parsed("PIN_EN").unwrap_or(default_pins.en),
            rs: env.parsed("PIN_RS").unwrap_or(default_pins.rs),
            up: env.parsed("PIN_UP").unwrap_or(default_pins.up),
            down: env.parsed("PIN_DOWN").unwrap_or(default_pins.down),
            left: env.parsed("PIN_LEFT").unwrap_or(default_pins.left),
            right: env.parsed("PIN_RIGHT").unwrap_or(default_pins.right),
        };
        pins.check_unique()?;

        Ok(Self {
            gpiochip: env.path("GPIOCHIP").unwrap_or(defaults.gpiochip),
            vcs: env.path("VCS").unwrap_or(vcs),
            vcsa: env.path("VCSA").unwrap_or(vcsa),
            pins,
            poll: env
                .parsed("POLL_MS")
                .map_or(defaults.poll, Duration::from_millis),
            view_x: env.parsed("VIEW_X").unwrap_or(defaults.view_x),
            view_y: env.parsed("VIEW_Y").unwrap_or(defaults.view_y),
        })
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn raw(&self, key: &str) -> Option<(String, String)> {
        let name = format!("{PREFIX}{key}");
        let value = (self.0)(&name)?;
        let value = value.trim();
        (!value.is_empty()).then(|| (name, String::from(value)))
    }

    fn parsed<T: core::str::FromStr>(&self, key: &str) -> Option<T> {
        let (name, value) = self.raw(key)?;
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("ignoring {name}={value:?}: not a valid value");
                None
            }
        }
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.raw(key).map(|(_, value)| PathBuf::from(value))
    }
}
