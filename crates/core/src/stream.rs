//! Stream - a single falling column of glyphs.

use rand::Rng;

use crate::types::{
    CharPool, RainConfig, SourceMode, BLANK, MAX_STREAM_LENGTH, MAX_STREAM_SPEED,
    MIN_STREAM_LENGTH, MIN_STREAM_SPEED,
};

#[derive(Debug, Clone, Default)]
pub struct Stream {
    /// Screen column.
    pub x: u16,
    /// Row of the topmost glyph. Fractional; may run past the screen before regeneration.
    pub y: f64,
    /// Rows per second at the reference height.
    pub speed: u32,
    length: usize,
    /// Glyph storage. Never truncated: its length is the buffer capacity and only grows.
    glyphs: Vec<char>,
}

impl Stream {
    /// Create a freshly regenerated stream.
    pub fn new<R: Rng + ?Sized>(config: &RainConfig, width: u16, height: u16, rng: &mut R) -> Self {
        let mut stream = Self::default();
        stream.regenerate(config, width, height, rng);
        stream
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Glyphs in use, `length` long.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs[..self.length]
    }

    /// Allocated glyph slots.
    pub fn capacity(&self) -> usize {
        self.glyphs.len()
    }

    /// Topmost occupied row.
    #[inline]
    pub fn top(&self) -> usize {
        self.y as usize
    }

    /// Number of rows starting at `top()` that are on screen.
    #[inline]
    pub fn visible_rows(&self, height: u16) -> usize {
        let h = height as f64;
        (0..self.length)
            .take_while(|&j| self.y + (j as f64) < h)
            .count()
    }

    /// Glyph displayed at row offset `j`.
    ///
    /// The index rotates with the integer row so the column shimmers while it falls.
    #[inline]
    pub fn glyph_at(&self, j: usize) -> char {
        self.glyphs[(j + self.top()) % self.length]
    }

    /// Put the stream at an explicit position and shape, growing the buffer if needed.
    ///
    /// Newly allocated slots are blank.
    pub fn place(&mut self, x: u16, y: f64, length: usize, speed: u32) {
        self.ensure_capacity(length);
        self.x = x;
        self.y = y;
        self.length = length;
        self.speed = speed;
    }

    fn ensure_capacity(&mut self, length: usize) {
        if length > self.glyphs.len() {
            self.glyphs.resize(length, BLANK);
        }
    }

    /// Re-roll length, glyphs, column and speed, and move back to the top.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        config: &RainConfig,
        width: u16,
        _height: u16,
        rng: &mut R,
    ) {
        self.length = rng.gen_range(MIN_STREAM_LENGTH..=MAX_STREAM_LENGTH);
        self.ensure_capacity(self.length);

        let slots = &mut self.glyphs[..self.length];
        match (&config.pool, config.source_mode) {
            (CharPool::Range { range, .. }, _) => {
                let range = (*range).max(1) as usize;
                for slot in slots.iter_mut() {
                    *slot = config.pool.at(rng.gen_range(0..range));
                }
            }
            (CharPool::Source(src), SourceMode::Random) => {
                for slot in slots.iter_mut() {
                    *slot = src[rng.gen_range(0..src.len())];
                }
            }
            (CharPool::Source(src), SourceMode::Sequential) => {
                for (slot, &ch) in slots.iter_mut().zip(src.iter().cycle()) {
                    *slot = ch;
                }
            }
        }

        self.x = pick_column(config.full_width, width, rng);
        self.y = 0.0;
        self.speed = rng.gen_range(MIN_STREAM_SPEED..=MAX_STREAM_SPEED);
    }
}

/// Column for a regenerated stream.
///
/// Full-width glyphs cover two columns, so they are kept on even columns and away
/// from the last two columns (some terminals wrap otherwise).
fn pick_column<R: Rng + ?Sized>(full_width: bool, width: u16, rng: &mut R) -> u16 {
    if full_width {
        if width <= 2 {
            return 0;
        }
        let x = rng.gen_range(0..width - 2);
        x - (x % 2)
    } else if width == 0 {
        0
    } else {
        rng.gen_range(0..width)
    }
}
