//! Terminal layer for the rain animation.
//!
//! Everything that touches the terminal device lives here, kept apart from the
//! pure engine in `matrix-rain-core`:
//!
//! - [`renderer`]: raw mode / alternate screen lifecycle and dirty-glyph encoding
//! - [`driver`]: per-frame resize detection, engine tick and flush
//! - [`input`]: quit keys, termination signals and the idle wait

pub mod driver;
pub mod input;
pub mod renderer;

pub use matrix_rain_core as core;
pub use matrix_rain_types as types;

pub use driver::{DriverState, FrameDriver, FrameStats};
pub use input::{should_quit, wait_until, Interrupt};
pub use renderer::{encode_clear_into, encode_dirty_into, palette_color, TerminalRenderer};
