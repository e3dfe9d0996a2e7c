//! FrameDriver: the per-frame state machine around the engine.
//!
//! Each frame it compares the measured geometry with the last known one,
//! reinitializes on change, advances the engine and encodes the dirty glyphs.
//! It writes into a caller-supplied buffer and performs no I/O itself.

use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::Engine;
use crate::renderer::{encode_clear_into, encode_dirty_into};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Geometry changed; the engine is being rebuilt.
    Resizing,
    /// Terminal state. Frames are ignored.
    Shutdown,
}

/// Counters reported when the run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub resizes: u64,
    pub glyphs: u64,
}

#[derive(Debug)]
pub struct FrameDriver<R: Rng = StdRng> {
    engine: Engine<R>,
    geometry: Option<(u16, u16)>,
    state: DriverState,
    stats: FrameStats,
}

impl<R: Rng> FrameDriver<R> {
    pub fn new(engine: Engine<R>) -> Self {
        Self {
            engine,
            geometry: None,
            state: DriverState::Running,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn geometry(&self) -> Option<(u16, u16)> {
        self.geometry
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    /// Run one frame into `out`.
    ///
    /// `size` is the measured terminal size; `None` (a failed query) keeps the
    /// last known geometry. Returns the number of glyphs encoded.
    pub fn frame(
        &mut self,
        size: Option<(u16, u16)>,
        elapsed: Duration,
        out: &mut Vec<u8>,
    ) -> Result<usize> {
        if self.state == DriverState::Shutdown {
            return Ok(0);
        }

        if let Some(size) = size {
            if self.geometry != Some(size) {
                self.state = DriverState::Resizing;
                self.resize(size, out)?;
            }
        }
        if self.geometry.is_none() {
            return Ok(0);
        }

        let grid = self.engine.tick(elapsed);
        let written = encode_dirty_into(grid, out)?;

        self.stats.frames += 1;
        self.stats.glyphs += written as u64;
        Ok(written)
    }

    fn resize(&mut self, (width, height): (u16, u16), out: &mut Vec<u8>) -> Result<()> {
        self.engine.resize(width, height);
        encode_clear_into(out)?;
        self.geometry = Some((width, height));
        self.stats.resizes += 1;
        self.state = DriverState::Running;
        Ok(())
    }

    /// Tear the engine down and stop accepting frames. Idempotent.
    pub fn shutdown(&mut self) {
        self.engine.teardown();
        self.state = DriverState::Shutdown;
    }
}
