//! Mirror a Linux virtual console onto an HD44780 LCD.
//!
//! Configured through `VCS_LCD_*` environment variables, see
//! [`vcs_lcd::settings`]. Runs until SIGINT or SIGTERM, then blanks the
//! display and returns every GPIO line to an input.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::{CdevPin, Delay};
use log::{error, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use vcs_lcd::gpio::request_pull_up_inputs;
use vcs_lcd::{
    Builder, Buttons, ConsoleMirror, ConsoleSource, Display, Interface, Pins, Settings,
    VcsConsole,
};

/// Consumer label shown by `gpioinfo`
const CONSUMER: &str = "vcs-lcd";

/// Longest single sleep while waiting for the next poll
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// Returns every configured line to an input when dropped
struct GpioRelease {
    chip: std::path::PathBuf,
    pins: Pins,
}

impl Drop for GpioRelease {
    fn drop(&mut self) {
        let mut chip = match Chip::new(&self.chip) {
            Ok(chip) => chip,
            Err(e) => {
                warn!("cannot reopen {} to release lines: {}", self.chip.display(), e);
                return;
            }
        };
        for offset in self.pins.all() {
            let released = chip
                .get_line(offset)
                .and_then(|line| line.request(LineRequestFlags::INPUT, 0, CONSUMER));
            if let Err(e) = released {
                warn!("failed to release GPIO line {}: {}", offset, e);
            }
        }
        info!("GPIO lines released");
    }
}

fn output(chip: &mut Chip, offset: u32) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .with_context(|| format!("getting GPIO line {offset}"))?
        .request(LineRequestFlags::OUTPUT, 0, CONSUMER)
        .with_context(|| format!("requesting GPIO line {offset} as output"))?;
    CdevPin::new(handle).with_context(|| format!("creating output pin {offset}"))
}

/// Sleep for `total`, returning early once `shutdown` is set
fn sleep_unless(shutdown: &AtomicBool, total: Duration) {
    let deadline = Instant::now() + total;
    while !shutdown.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

fn run() -> Result<()> {
    let settings = Settings::from_env().context("reading settings")?;
    let pins = settings.pins;

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .with_context(|| format!("registering handler for signal {signal}"))?;
    }

    // Declared before the pins so it drops after them
    let _release = GpioRelease {
        chip: settings.gpiochip.clone(),
        pins,
    };

    let mut chip = Chip::new(&settings.gpiochip)
        .with_context(|| format!("opening GPIO chip {}", settings.gpiochip.display()))?;
    info!(
        "LCD on {}: D4-D7 {},{},{},{} EN {} RS {}",
        settings.gpiochip.display(),
        pins.d4,
        pins.d5,
        pins.d6,
        pins.d7,
        pins.en,
        pins.rs
    );
    info!(
        "buttons: up {} down {} left {} right {}",
        pins.up, pins.down, pins.left, pins.right
    );

    let interface = Interface::new(
        output(&mut chip, pins.d4)?,
        output(&mut chip, pins.d5)?,
        output(&mut chip, pins.d6)?,
        output(&mut chip, pins.d7)?,
        output(&mut chip, pins.en)?,
        output(&mut chip, pins.rs)?,
    );
    let [up, down, left, right] =
        request_pull_up_inputs(&settings.gpiochip, pins.inputs(), CONSUMER)
            .context("requesting button lines as pulled-up inputs")?;
    let buttons = Buttons::new(up, down, left, right);

    let console = VcsConsole::open(&settings.vcs, &settings.vcsa).with_context(|| {
        format!(
            "opening console {} / {}",
            settings.vcs.display(),
            settings.vcsa.display()
        )
    })?;
    let geometry = console.geometry();
    info!(
        "console {}x{} from {}",
        geometry.cols,
        geometry.lines,
        settings.vcs.display()
    );

    let config = Builder::new().build().context("building display config")?;
    let mut delay = Delay;
    let mut display = Display::new(interface, config);
    display
        .init(&mut delay)
        .map_err(|e| anyhow!("initializing display: {e}"))?;

    let mut mirror = ConsoleMirror::new(display, console, buttons, settings.view_x, settings.view_y)
        .map_err(|e| anyhow!("starting mirror: {e}"))?;
    info!(
        "mirroring from {},{} every {:?}",
        mirror.viewport().x(),
        mirror.viewport().y(),
        settings.poll
    );

    if let Err(e) = mirror.render(&mut delay) {
        warn!("first frame failed: {e}");
    }
    while !shutdown.load(Ordering::Relaxed) {
        sleep_unless(&shutdown, settings.poll);
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        if let Err(e) = mirror.scroll(&mut delay) {
            warn!("poll failed: {e}");
        }
    }

    info!("shutting down");
    if let Err(e) = mirror.display_mut().shutdown(&mut delay) {
        warn!("display shutdown incomplete: {e}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
