//! Console data source
//!
//! The mirror reads two things from the console on every poll: the text
//! screen and the cursor position. [`ConsoleSource`] abstracts over where they
//! come from.
//!
//! On Linux, [`VcsConsole`] (requires `std` feature) reads the virtual console
//! memory devices:
//!
//! - `/dev/vcsN`: `lines * cols` bytes of screen text, row-major, no header
//! - `/dev/vcsaN`: a 4-byte header `[lines, cols, cursor_x, cursor_y]`
//!   followed by character/attribute pairs
//!
//! `/dev/vcs` and `/dev/vcsa` (no number) follow the foreground console.

use core::fmt::Debug;

/// Console size in character cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleGeometry {
    /// Number of text lines
    pub lines: u16,
    /// Number of columns per line
    pub cols: u16,
}

impl ConsoleGeometry {
    /// Total number of cells in a full screen snapshot
    pub fn cell_count(&self) -> usize {
        self.lines as usize * self.cols as usize
    }
}

/// Text cursor position in console coordinates (zero-based)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPosition {
    /// Column
    pub x: u16,
    /// Line
    pub y: u16,
}

/// Source of console snapshots
///
/// The geometry is fixed for the life of the source; a console resized after
/// construction is not picked up.
pub trait ConsoleSource {
    /// Error type for read operations
    type Error: Debug;

    /// Console size captured when the source was opened
    fn geometry(&self) -> ConsoleGeometry;

    /// Read the whole screen from the start into `buf`
    ///
    /// Returns the number of bytes read, which may be less than
    /// `buf.len()` if the console is smaller than expected.
    fn read_screen(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read the current cursor position
    fn read_cursor(&mut self) -> Result<CursorPosition, Self::Error>;
}

#[cfg(feature = "std")]
pub use self::vcs::{ConsoleError, VcsConsole};

#[cfg(feature = "std")]
mod vcs {
    use std::fs::File;
    use std::io::{self, Read, Seek, SeekFrom};
    use std::path::Path;

    use super::{ConsoleGeometry, ConsoleSource, CursorPosition};

    /// Size of the vcsa header
    const ATTR_HEADER_LEN: usize = 4;

    /// Offset of the cursor bytes in the vcsa header
    const ATTR_CURSOR_OFFSET: u64 = 2;

    /// Errors reading the vcs devices
    #[derive(Debug)]
    pub enum ConsoleError {
        /// Underlying read or seek failed
        Io(io::Error),
        /// Attribute device returned fewer header bytes than required
        ShortAttributeRead {
            /// Bytes required
            expected: usize,
            /// Bytes actually read
            read: usize,
        },
    }

    impl core::fmt::Display for ConsoleError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            match self {
                Self::Io(e) => write!(f, "Console I/O error: {e}"),
                Self::ShortAttributeRead { expected, read } => write!(
                    f,
                    "Short read from console attributes: expected {expected} bytes, got {read}"
                ),
            }
        }
    }

    impl std::error::Error for ConsoleError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Self::Io(e) => Some(e),
                Self::ShortAttributeRead { .. } => None,
            }
        }
    }

    impl From<io::Error> for ConsoleError {
        fn from(e: io::Error) -> Self {
            Self::Io(e)
        }
    }

    /// Read until `buf` is full or the reader hits end of file
    fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Linux virtual console reader
    ///
    /// Generic over the two streams so it can be driven from in-memory
    /// buffers; use [`VcsConsole::open`] for the real devices.
    #[derive(Debug)]
    pub struct VcsConsole<S, A> {
        /// Screen text stream (`/dev/vcsN`)
        screen: S,
        /// Attribute stream (`/dev/vcsaN`)
        attrs: A,
        geometry: ConsoleGeometry,
        /// Cursor position from the header read at construction
        initial_cursor: CursorPosition,
    }

    impl VcsConsole<File, File> {
        /// Open the screen and attribute devices
        pub fn open(
            screen: impl AsRef<Path>,
            attrs: impl AsRef<Path>,
        ) -> Result<Self, ConsoleError> {
            Self::new(File::open(screen)?, File::open(attrs)?)
        }
    }

    impl<S: Read + Seek, A: Read + Seek> VcsConsole<S, A> {
        /// Wrap the two streams and read the console geometry
        ///
        /// # Errors
        ///
        /// Returns [`ConsoleError::ShortAttributeRead`] if the attribute
        /// stream holds fewer than 4 bytes.
        pub fn new(screen: S, mut attrs: A) -> Result<Self, ConsoleError> {
            let mut header = [0u8; ATTR_HEADER_LEN];
            attrs.seek(SeekFrom::Start(0))?;
            let read = read_full(&mut attrs, &mut header)?;
            if read != ATTR_HEADER_LEN {
                return Err(ConsoleError::ShortAttributeRead {
                    expected: ATTR_HEADER_LEN,
                    read,
                });
            }
            let [lines, cols, x, y] = header;
            Ok(Self {
                screen,
                attrs,
                geometry: ConsoleGeometry {
                    lines: lines.into(),
                    cols: cols.into(),
                },
                initial_cursor: CursorPosition {
                    x: x.into(),
                    y: y.into(),
                },
            })
        }

        /// Cursor position reported when the console was opened
        pub fn initial_cursor(&self) -> CursorPosition {
            self.initial_cursor
        }
    }

    impl<S: Read + Seek, A: Read + Seek> ConsoleSource for VcsConsole<S, A> {
        type Error = ConsoleError;

        fn geometry(&self) -> ConsoleGeometry {
            self.geometry
        }

        fn read_screen(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.screen.seek(SeekFrom::Start(0))?;
            Ok(read_full(&mut self.screen, buf)?)
        }

        fn read_cursor(&mut self) -> Result<CursorPosition, Self::Error> {
            let mut pos = [0u8; 2];
            self.attrs.seek(SeekFrom::Start(ATTR_CURSOR_OFFSET))?;
            let read = read_full(&mut self.attrs, &mut pos)?;
            if read != pos.len() {
                return Err(ConsoleError::ShortAttributeRead {
                    expected: pos.len(),
                    read,
                });
            }
            Ok(CursorPosition {
                x: pos[0].into(),
                y: pos[1].into(),
            })
        }
    }

}
