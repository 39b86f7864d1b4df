//! Console mirroring
//!
//! This module provides the [`ConsoleMirror`] struct which wraps [`Display`]
//! and keeps it in sync with a [`ConsoleSource`].
//!
//! ## Features
//!
//! - Redraws only when the visible text changed
//! - Tracks the console cursor every poll, hiding it when it leaves the window
//! - Pans the window one cell per poll from button input
//!
//! ## Example
//!
//! ```rust,no_run
//! use vcs_lcd::{Builder, ConsoleMirror, Display, Interface, VcsConsole};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # use vcs_lcd::{Button, ButtonInput};
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct NoButtons;
//! # impl ButtonInput for NoButtons {
//! #     fn is_pressed<D: DelayNs>(&mut self, _b: Button, _d: &mut D) -> bool { false }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let buttons = NoButtons;
//! let interface = Interface::new(MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//! let config = match Builder::new().build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! let console = match VcsConsole::open("/dev/vcs1", "/dev/vcsa1") {
//!     Ok(console) => console,
//!     Err(_) => return,
//! };
//! let mut mirror = match ConsoleMirror::new(display, console, buttons, 0, 0) {
//!     Ok(mirror) => mirror,
//!     Err(_) => return,
//! };
//!
//! loop {
//!     let _ = mirror.scroll(&mut delay);
//!     delay.delay_ms(100);
//! }
//! ```

use alloc::vec;
use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;
use log::debug;

use crate::buttons::{Button, ButtonInput};
use crate::cell::Cell;
use crate::config::SLICE_LEN;
use crate::console::{ConsoleGeometry, ConsoleSource};
use crate::display::{Display, LocalCursor};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::viewport::{ConsoleGrid, Viewport};

type MirrorResult<I, C, T> = core::result::Result<T, Error<I, <C as ConsoleSource>::Error>>;

/// What a single render pass did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Whether the LCD text was rewritten
    pub redrawn: bool,
    /// Where the cursor was parked, `None` if it was hidden
    pub cursor: Option<LocalCursor>,
}

/// Display kept in sync with a console window
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `C` - Console implementing [`ConsoleSource`]
/// * `B` - Buttons implementing [`ButtonInput`]
pub struct ConsoleMirror<I, C, B>
where
    I: DisplayInterface,
    C: ConsoleSource,
    B: ButtonInput,
{
    /// The underlying display driver
    display: Display<I>,
    console: C,
    buttons: B,
    /// Console size, fixed at construction
    geometry: ConsoleGeometry,
    viewport: Viewport,
    /// Reused screen snapshot buffer
    screen: Vec<u8>,
    /// Cells currently on the LCD, `None` until the first draw
    shown: Option<[Cell; SLICE_LEN]>,
}

impl<I, C, B> ConsoleMirror<I, C, B>
where
    I: DisplayInterface,
    C: ConsoleSource,
    B: ButtonInput,
{
    /// Create a new mirror with the window at `(view_x, view_y)`
    ///
    /// The display should already be initialized. The window position is
    /// clamped into the console.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConsoleTooSmall`] if the console is smaller than
    /// the LCD.
    pub fn new(
        display: Display<I>,
        console: C,
        buttons: B,
        view_x: usize,
        view_y: usize,
    ) -> MirrorResult<I, C, Self> {
        let geometry = console.geometry();
        let viewport =
            Viewport::new(geometry, view_x, view_y).ok_or(Error::ConsoleTooSmall {
                lines: geometry.lines,
                cols: geometry.cols,
            })?;
        Ok(Self {
            display,
            console,
            buttons,
            geometry,
            viewport,
            screen: vec![0; geometry.cell_count()],
            shown: None,
        })
    }

    /// Copy the current window to the LCD and place the cursor
    ///
    /// The text is only rewritten when it differs from what the LCD already
    /// shows. The cursor is re-sent every time.
    pub fn render<D: DelayNs>(&mut self, delay: &mut D) -> MirrorResult<I, C, Frame> {
        let read = self
            .console
            .read_screen(&mut self.screen)
            .map_err(Error::Console)?;
        let grid = ConsoleGrid::new(&self.screen[..read], self.geometry);
        let cells = self.viewport.slice(&grid);

        let redrawn = self.shown != Some(cells);
        if redrawn {
            debug!(
                "redrawing window at {},{}",
                self.viewport.x(),
                self.viewport.y()
            );
            self.display
                .write_screen(&cells, delay)
                .map_err(Error::widen)?;
            self.shown = Some(cells);
        }

        let position = self.console.read_cursor().map_err(Error::Console)?;
        let cursor = self.viewport.locate(position);
        match cursor {
            Some(local) => self.display.show_cursor(local, delay),
            None => self.display.hide_cursor(delay),
        }
        .map_err(Error::widen)?;

        Ok(Frame { redrawn, cursor })
    }

    /// Poll the buttons, pan the window, then render
    ///
    /// Buttons are checked in [`Button::PRIORITY`] order and only the first
    /// press that can move the window is applied. Renders even when nothing
    /// moved so the cursor keeps tracking.
    pub fn scroll<D: DelayNs>(&mut self, delay: &mut D) -> MirrorResult<I, C, Frame> {
        if let Some(button) = self.pressed(delay) {
            debug!(
                "{:?}: window now at {},{}",
                button,
                self.viewport.x(),
                self.viewport.y()
            );
        }
        self.render(delay)
    }

    fn pressed<D: DelayNs>(&mut self, delay: &mut D) -> Option<Button> {
        Button::PRIORITY
            .into_iter()
            .find(|&button| self.buttons.is_pressed(button, delay) && self.viewport.step(button))
    }

    /// Current window position
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Console size captured at construction
    pub fn geometry(&self) -> ConsoleGeometry {
        self.geometry
    }

    /// Get a reference to the display driver
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Get a mutable reference to the display driver
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CURSOR_BLINK, CURSOR_ON, DISPLAY_CONTROL, DISPLAY_ON, RETURN_HOME};
    use crate::config::Builder;
    use crate::console::CursorPosition;
    use crate::test_support::{MockDelay, MockError, MockInterface, Op};

    const SHOW_CURSOR: u8 = DISPLAY_CONTROL | DISPLAY_ON | CURSOR_ON | CURSOR_BLINK;
    const HIDE_CURSOR: u8 = DISPLAY_CONTROL | DISPLAY_ON;

    struct MockConsole {
        geometry: ConsoleGeometry,
        screen: Vec<u8>,
        cursor: CursorPosition,
        fail_reads: bool,
    }

    #[derive(Debug, PartialEq)]
    struct ReadFailed;

    impl MockConsole {
        fn blank(lines: u16, cols: u16) -> Self {
            let geometry = ConsoleGeometry { lines, cols };
            Self {
                geometry,
                screen: vec![b' '; geometry.cell_count()],
                cursor: CursorPosition::default(),
                fail_reads: false,
            }
        }

        fn write(&mut self, x: usize, y: usize, text: &[u8]) {
            let start = y * self.geometry.cols as usize + x;
            self.screen[start..start + text.len()].copy_from_slice(text);
        }
    }

    impl ConsoleSource for MockConsole {
        type Error = ReadFailed;

        fn geometry(&self) -> ConsoleGeometry {
            self.geometry
        }

        fn read_screen(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.fail_reads {
                return Err(ReadFailed);
            }
            let n = buf.len().min(self.screen.len());
            buf[..n].copy_from_slice(&self.screen[..n]);
            Ok(n)
        }

        fn read_cursor(&mut self) -> Result<CursorPosition, Self::Error> {
            Ok(self.cursor)
        }
    }

    /// Buttons held down for the whole test, recording every read
    #[derive(Default)]
    struct MockButtons {
        held: Vec<Button>,
        reads: Vec<Button>,
    }

    impl MockButtons {
        fn holding(held: &[Button]) -> Self {
            Self {
                held: held.to_vec(),
                reads: Vec::new(),
            }
        }
    }

    impl ButtonInput for MockButtons {
        fn is_pressed<D: DelayNs>(&mut self, button: Button, _delay: &mut D) -> bool {
            self.reads.push(button);
            self.held.contains(&button)
        }
    }

    type TestMirror = ConsoleMirror<MockInterface, MockConsole, MockButtons>;

    fn hello_console() -> MockConsole {
        let mut console = MockConsole::blank(24, 80);
        console.write(0, 0, b"HELLO WORLD");
        console.cursor = CursorPosition { x: 5, y: 0 };
        console
    }

    fn test_mirror(console: MockConsole, buttons: MockButtons) -> TestMirror {
        let display = Display::new(MockInterface::new(), Builder::new().build().unwrap());
        ConsoleMirror::new(display, console, buttons, 0, 0).unwrap()
    }

    fn ops(mirror: &TestMirror) -> &[Op] {
        &mirror.display().interface().ops
    }

    fn clear_ops(mirror: &mut TestMirror) {
        mirror.display_mut().interface_mut().clear();
    }

    #[test]
    fn test_console_too_small() {
        let display = Display::new(MockInterface::new(), Builder::new().build().unwrap());
        let result = ConsoleMirror::new(
            display,
            MockConsole::blank(1, 80),
            MockButtons::default(),
            0,
            0,
        );
        assert!(matches!(
            result,
            Err(Error::ConsoleTooSmall { lines: 1, cols: 80 })
        ));
    }

    #[test]
    fn test_hello_world_frame() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let frame = mirror.render(&mut MockDelay::default()).unwrap();

        assert!(frame.redrawn);
        assert_eq!(frame.cursor, Some(LocalCursor { col: 5, row: 0 }));

        let chars = mirror.display().interface().chars();
        assert_eq!(&chars[..16], b"HELLO WORLD     ");
        assert_eq!(&chars[16..], [b' '; 16]);
        assert_eq!(ops(&mirror)[0], Op::Command(RETURN_HOME));
        assert_eq!(ops(&mirror)[17], Op::Command(0x80 | 0x40));

        let tail = &ops(&mirror)[ops(&mirror).len() - 2..];
        assert_eq!(tail, [Op::Command(SHOW_CURSOR), Op::Command(0x80 | 0x05)]);
    }

    #[test]
    fn test_unchanged_console_skips_redraw_but_tracks_cursor() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let mut delay = MockDelay::default();
        mirror.render(&mut delay).unwrap();
        clear_ops(&mut mirror);

        let frame = mirror.render(&mut delay).unwrap();
        assert!(!frame.redrawn);
        assert_eq!(frame.cursor, Some(LocalCursor { col: 5, row: 0 }));
        assert_eq!(
            ops(&mirror),
            [Op::Command(SHOW_CURSOR), Op::Command(0x80 | 0x05)]
        );
    }

    #[test]
    fn test_change_outside_window_skips_redraw() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let mut delay = MockDelay::default();
        mirror.render(&mut delay).unwrap();

        mirror.console.write(40, 0, b"offscreen");
        mirror.console.write(0, 2, b"below");
        assert!(!mirror.render(&mut delay).unwrap().redrawn);

        mirror.console.write(15, 1, b"!");
        assert!(mirror.render(&mut delay).unwrap().redrawn);
    }

    #[test]
    fn test_cursor_out_of_view_is_hidden() {
        let mut console = hello_console();
        console.cursor = CursorPosition { x: 79, y: 23 };
        let mut mirror = test_mirror(console, MockButtons::default());

        let frame = mirror.render(&mut MockDelay::default()).unwrap();
        assert_eq!(frame.cursor, None);
        assert_eq!(ops(&mirror).last(), Some(&Op::Command(HIDE_CURSOR)));
    }

    #[test]
    fn test_scroll_right_shifts_window_and_cursor() {
        let mut mirror = test_mirror(hello_console(), MockButtons::holding(&[Button::Right]));
        let frame = mirror.scroll(&mut MockDelay::default()).unwrap();

        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (1, 0));
        assert_eq!(frame.cursor, Some(LocalCursor { col: 4, row: 0 }));
        let chars = mirror.display().interface().chars();
        assert_eq!(&chars[..16], b"ELLO WORLD      ");
    }

    #[test]
    fn test_scroll_acts_on_first_press_only() {
        let mut mirror = test_mirror(
            hello_console(),
            MockButtons::holding(&[Button::Down, Button::Right]),
        );
        mirror.scroll(&mut MockDelay::default()).unwrap();

        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (0, 1));
        assert_eq!(
            mirror.buttons.reads,
            [Button::Up, Button::Left, Button::Down]
        );
    }

    #[test]
    fn test_blocked_press_falls_through_to_next_button() {
        // Up is held at the top edge, so Left is checked next, then Down
        let mut mirror = test_mirror(
            hello_console(),
            MockButtons::holding(&[Button::Up, Button::Down]),
        );
        mirror.scroll(&mut MockDelay::default()).unwrap();
        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (0, 1));
    }

    #[test]
    fn test_scroll_without_press_still_renders() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let frame = mirror.scroll(&mut MockDelay::default()).unwrap();
        assert!(frame.redrawn);
        assert_eq!(
            mirror.buttons.reads,
            [Button::Up, Button::Left, Button::Down, Button::Right]
        );
        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (0, 0));
    }

    #[test]
    fn test_scroll_never_leaves_console() {
        let mut mirror = test_mirror(
            MockConsole::blank(3, 18),
            MockButtons::holding(&[Button::Down, Button::Right]),
        );
        let mut delay = MockDelay::default();
        for _ in 0..10 {
            mirror.scroll(&mut delay).unwrap();
        }
        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (2, 1));

        mirror.buttons.held = alloc::vec![Button::Up, Button::Left];
        for _ in 0..10 {
            mirror.scroll(&mut delay).unwrap();
        }
        assert_eq!((mirror.viewport().x(), mirror.viewport().y()), (0, 0));
    }

    #[test]
    fn test_console_error_keeps_cache() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let mut delay = MockDelay::default();
        mirror.render(&mut delay).unwrap();

        mirror.console.fail_reads = true;
        let result = mirror.render(&mut delay);
        assert!(matches!(result, Err(Error::Console(ReadFailed))));

        mirror.console.fail_reads = false;
        assert!(!mirror.render(&mut delay).unwrap().redrawn);
    }

    #[test]
    fn test_failed_redraw_is_retried() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        let mut delay = MockDelay::default();
        mirror.display_mut().interface_mut().fail_on_char = Some(20);

        let result = mirror.render(&mut delay);
        assert!(matches!(result, Err(Error::Interface(MockError))));

        mirror.display_mut().interface_mut().fail_on_char = None;
        clear_ops(&mut mirror);
        let frame = mirror.render(&mut delay).unwrap();
        assert!(frame.redrawn);
        assert_eq!(
            &mirror.display().interface().chars()[..16],
            b"HELLO WORLD     "
        );

        assert!(!mirror.render(&mut delay).unwrap().redrawn);
    }

    #[test]
    fn test_geometry_is_captured_once() {
        let mut mirror = test_mirror(hello_console(), MockButtons::default());
        mirror.console.geometry = ConsoleGeometry { lines: 50, cols: 132 };
        assert_eq!(mirror.geometry(), ConsoleGeometry { lines: 24, cols: 80 });
    }
}
