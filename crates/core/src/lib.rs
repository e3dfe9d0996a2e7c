//! Core animation module - pure and testable
//!
//! This crate holds the digital rain simulation. It has **no terminal I/O**:
//! it consumes screen geometry and elapsed time and produces dirty glyphs.
//!
//! - **Deterministic**: seed the engine and the same frames come out
//! - **Incremental**: streams erase and redraw only the rows they occupy
//! - **Allocation-free** steady state: stream buffers grow but never shrink
//!
//! # Module Structure
//!
//! - [`grid`]: glyph grid with per-cell dirty tracking
//! - [`stream`]: a single falling column and its regeneration
//! - [`pool`]: the set of streams for the current geometry
//! - [`message`]: optional centered message revealed over time
//! - [`engine`]: per-tick update tying it all together
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use matrix_rain_core::Engine;
//! use matrix_rain_types::RainConfig;
//!
//! let mut engine = Engine::new(RainConfig {
//!     seed: Some(1),
//!     ..RainConfig::ascii()
//! });
//! engine.resize(80, 24);
//!
//! let grid = engine.tick(Duration::from_millis(10));
//! assert!(grid.dirty_count() > 0);
//!
//! engine.teardown();
//! ```

pub mod engine;
pub mod grid;
pub mod message;
pub mod pool;
pub mod stream;

pub use matrix_rain_types as types;

pub use engine::{shade, Engine};
pub use grid::{Glyph, GlyphGrid};
pub use message::MessageOverlay;
pub use pool::StreamPool;
pub use stream::Stream;
