//! Animation engine - owns the grid, the stream pool and the message overlay.
//!
//! The engine never touches the terminal. Each [`Engine::tick`] leaves the set of
//! changed cells marked dirty in the [`GlyphGrid`]; the caller flushes them.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::GlyphGrid;
use crate::message::MessageOverlay;
use crate::pool::StreamPool;
use crate::stream::Stream;
use crate::types::{
    speed_midpoint, RainConfig, BLANK, COLOR_BLANK, COLOR_FAST, COLOR_HEAD, COLOR_SLOW,
    COLOR_TRAIL, REFERENCE_HEIGHT, TRAIL_ROWS,
};

#[derive(Debug)]
pub struct Engine<R: Rng = StdRng> {
    config: RainConfig,
    grid: GlyphGrid,
    pool: StreamPool,
    message: Option<MessageOverlay>,
    rng: R,
    /// Sum of elapsed time passed to `tick` since the engine was created.
    clock: Duration,
    width: u16,
    height: u16,
}

impl Engine<StdRng> {
    /// Create an engine seeded from `config.seed`, or from entropy when unset.
    pub fn new(config: RainConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine with an explicit random source. No geometry until `resize`.
    pub fn with_rng(config: RainConfig, rng: R) -> Self {
        let message = config.message.as_ref().map(MessageOverlay::new);
        Self {
            config,
            grid: GlyphGrid::default(),
            pool: StreamPool::new(),
            message,
            rng,
            clock: Duration::ZERO,
            width: 0,
            height: 0,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn grid(&self) -> &GlyphGrid {
        &self.grid
    }

    pub fn pool(&self) -> &StreamPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut StreamPool {
        &mut self.pool
    }

    pub fn message(&self) -> Option<&MessageOverlay> {
        self.message.as_ref()
    }

    /// Reinitialize everything for a new screen size.
    ///
    /// The grid comes back blank and clean, every stream is regenerated and the
    /// message is hidden again.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.grid.resize(width, height);
        self.pool
            .rebuild(&self.config, width, height, &mut self.rng);
        if let Some(message) = self.message.as_mut() {
            message.reset(self.clock);
        }
    }

    /// Advance one frame. Changed cells are left dirty in the returned grid.
    pub fn tick(&mut self, elapsed: Duration) -> &mut GlyphGrid {
        self.clock += elapsed;
        if self.width == 0 || self.height == 0 {
            return &mut self.grid;
        }

        let dt = elapsed.as_secs_f64();
        let scale = self.height as f64 / REFERENCE_HEIGHT;
        for stream in self.pool.iter_mut() {
            erase(&mut self.grid, stream, self.height);

            stream.y += stream.speed as f64 * dt * scale;
            if stream.y >= self.height as f64 {
                stream.regenerate(&self.config, self.width, self.height, &mut self.rng);
            }

            draw(&mut self.grid, stream, self.height);
        }

        if let Some(message) = self.message.as_mut() {
            message.advance(self.clock, &mut self.rng);
            message.draw(&mut self.grid);
        }

        &mut self.grid
    }

    /// Release the grid and the streams. Safe to call any number of times.
    pub fn teardown(&mut self) {
        self.pool.release();
        self.grid.release();
        self.width = 0;
        self.height = 0;
    }
}

fn erase(grid: &mut GlyphGrid, stream: &Stream, height: u16) {
    let top = stream.top();
    for j in 0..stream.visible_rows(height) {
        grid.set(stream.x, (top + j) as u16, BLANK, COLOR_BLANK);
    }
}

fn draw(grid: &mut GlyphGrid, stream: &Stream, height: u16) {
    let top = stream.top();
    for j in 0..stream.visible_rows(height) {
        grid.set(stream.x, (top + j) as u16, stream.glyph_at(j), shade(stream, j));
    }
}

/// Color of row offset `j`: head is brightest, the rows right behind it are the
/// trail shade, the rest takes the slow or fast body shade.
pub fn shade(stream: &Stream, j: usize) -> u8 {
    let length = stream.length();
    if j + 1 == length {
        COLOR_HEAD
    } else if j + 1 + TRAIL_ROWS >= length {
        COLOR_TRAIL
    } else if stream.speed as f64 <= speed_midpoint() {
        COLOR_SLOW
    } else {
        COLOR_FAST
    }
}
