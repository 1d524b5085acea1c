//! # Secure Share Model generator
//!
//! Turns a mesh into an archive of 512 snapshots, one per orientation in the
//! 45° grid. The grid is walked with X as the outer axis, Y in the middle and
//! Z innermost; each snapshot is stored under the [`ssm_core::ImageKey`] of
//! the orientation it shows.

pub mod cancel;
pub mod config;
pub mod generator;
pub mod report;

pub use cancel::*;
pub use config::*;
pub use generator::*;
pub use report::*;
