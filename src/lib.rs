//! Matrix rain (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and hosts the command line
//! layer shared by the binary and the integration tests.

pub mod cli;

pub use matrix_rain_core as core;
pub use matrix_rain_term as term;
pub use matrix_rain_types as types;
