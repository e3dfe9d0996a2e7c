//! Core types module - shared constants and the configuration snapshot
//!
//! Everything here is plain data with no external dependencies, so it can be
//! shared by the engine, the terminal layer and the command line front end.
//!
//! # Stream Bounds
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_STREAM_LENGTH` | 4 | Shortest stream, in rows |
//! | `MAX_STREAM_LENGTH` | 12 | Longest stream, in rows |
//! | `MIN_STREAM_SPEED` | 4 | Slowest stream, in rows per second at the reference height |
//! | `MAX_STREAM_SPEED` | 26 | Fastest stream |
//! | `REFERENCE_HEIGHT` | 55.0 | Terminal height the speeds are calibrated against |
//! | `TICK_MS` | 10 | Frame cadence |
//!
//! # Palette
//!
//! Colors are indices into the xterm 256-color palette:
//!
//! | Constant | Index | Used for |
//! |----------|-------|----------|
//! | `COLOR_BLANK` | 0 | Erased cells |
//! | `COLOR_SLOW` | 28 | Body of slow streams |
//! | `COLOR_FAST` | 40 | Body of fast streams |
//! | `COLOR_TRAIL` | 249 | Rows right behind the head |
//! | `COLOR_HEAD` | 255 | Stream head and message text |
//! | `COLOR_BACKGROUND` | 232 | Screen background |
//!
//! # Examples
//!
//! ```
//! use matrix_rain_types::{CharPool, RainConfig, UNICODE_RANGE};
//!
//! let config = RainConfig::default();
//! assert!(config.full_width);
//! assert_eq!(config.pool.len(), UNICODE_RANGE as usize);
//!
//! let ascii = RainConfig::ascii();
//! assert!(!ascii.full_width);
//! assert!(matches!(ascii.pool, CharPool::Range { seed: '#', .. }));
//! ```

use std::time::Duration;

/// First katakana code point used by the default pool.
pub const UNICODE_CHAR: char = '\u{30A1}';

/// Number of code points in the default katakana pool.
pub const UNICODE_RANGE: u32 = 89;

/// First printable code point of the ASCII pool (`#`).
pub const ASCII_CHAR: char = '\u{23}';

/// Number of code points in the ASCII pool.
pub const ASCII_RANGE: u32 = 59;

pub const MIN_STREAM_LENGTH: usize = 4;
pub const MAX_STREAM_LENGTH: usize = 12;

pub const MIN_STREAM_SPEED: u32 = 4;
pub const MAX_STREAM_SPEED: u32 = 26;

/// Number of head-adjacent rows drawn in the trail shade.
pub const TRAIL_ROWS: usize = 3;

/// Height (rows) the stream speeds are tuned for. Taller screens fall proportionally faster.
pub const REFERENCE_HEIGHT: f64 = 55.0;

/// Extra streams per screen column when the count is derived from the width.
pub const STREAM_RATIO: f64 = 0.3;

/// Fixed frame cadence in milliseconds.
pub const TICK_MS: u64 = 10;

/// Default interval between message reveals in milliseconds.
pub const DEFAULT_MESSAGE_DELAY_MS: u64 = 150;

pub const COLOR_BLANK: u8 = 0;
pub const COLOR_SLOW: u8 = 28;
pub const COLOR_FAST: u8 = 40;
pub const COLOR_TRAIL: u8 = 249;
pub const COLOR_HEAD: u8 = 255;
pub const COLOR_BACKGROUND: u8 = 232;

/// Character used for erased cells.
pub const BLANK: char = ' ';

/// Where stream characters come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharPool {
    /// `seed + [0, range)` code points.
    Range { seed: char, range: u32 },
    /// Literal characters (from `--stream` or piped stdin).
    Source(Vec<char>),
}

impl CharPool {
    /// Number of distinct slots in the pool.
    pub fn len(&self) -> usize {
        match self {
            CharPool::Range { range, .. } => *range as usize,
            CharPool::Source(chars) => chars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at `offset` from the start of the pool.
    ///
    /// Range pools fall back to the seed for offsets that do not land on a scalar value;
    /// validated configurations never hit that path.
    pub fn at(&self, offset: usize) -> char {
        match self {
            CharPool::Range { seed, .. } => (*seed as u32)
                .checked_add(offset as u32)
                .and_then(char::from_u32)
                .unwrap_or(*seed),
            CharPool::Source(chars) => chars[offset % chars.len()],
        }
    }

    /// Iterate every character of the pool.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.len()).map(move |i| self.at(i))
    }
}

/// How a literal source fills a stream's glyph buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Each glyph is drawn independently and uniformly from the source.
    #[default]
    Random,
    /// Glyphs copy the source in order, cycling when the stream is longer.
    Sequential,
}

/// Centered message revealed one character at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageConfig {
    pub text: Vec<char>,
    pub reveal_delay: Duration,
}

impl MessageConfig {
    pub fn new(text: &str, reveal_delay: Duration) -> Self {
        Self {
            text: text.chars().collect(),
            reveal_delay,
        }
    }
}

/// Immutable configuration snapshot handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RainConfig {
    pub pool: CharPool,
    pub source_mode: SourceMode,
    /// Explicit number of streams; derived from the width when `None`.
    pub stream_count: Option<usize>,
    pub message: Option<MessageConfig>,
    /// Glyphs occupy two columns; streams are placed on even columns only.
    pub full_width: bool,
    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            pool: CharPool::Range {
                seed: UNICODE_CHAR,
                range: UNICODE_RANGE,
            },
            source_mode: SourceMode::Random,
            stream_count: None,
            message: None,
            full_width: true,
            seed: None,
        }
    }
}

impl RainConfig {
    /// Half-width ASCII configuration.
    pub fn ascii() -> Self {
        Self {
            pool: CharPool::Range {
                seed: ASCII_CHAR,
                range: ASCII_RANGE,
            },
            full_width: false,
            ..Self::default()
        }
    }

    /// Configuration using a literal character source.
    pub fn with_source(source: &str) -> Self {
        Self {
            pool: CharPool::Source(source.chars().collect()),
            full_width: false,
            ..Self::default()
        }
    }

    /// Number of streams for a screen `width` columns wide.
    pub fn streams_for_width(&self, width: u16) -> usize {
        match self.stream_count {
            Some(n) => n,
            None => derived_stream_count(width),
        }
    }
}

/// `width + round(width * STREAM_RATIO)`.
pub fn derived_stream_count(width: u16) -> usize {
    let w = width as usize;
    w + (width as f64 * STREAM_RATIO).round() as usize
}

/// Midpoint of the speed range; streams at or below it use the slow shade.
pub fn speed_midpoint() -> f64 {
    MIN_STREAM_SPEED as f64 + (MAX_STREAM_SPEED - MIN_STREAM_SPEED) as f64 * 0.5
}
