//! Utility functions and types used throughout allocprobe.
//!
//! This module provides:
//! - [`Size`] - Memory size representation
//! - Constants ([`MB`], [`FILL_BYTE`])
//! - [`parse_mebibytes`] - permissive size argument parsing
//! - Progress reporting utilities ([`NamedProgress`])

mod constants;
mod lenient;
mod named_progress;
mod size;

pub use self::constants::*;
pub use self::lenient::parse_mebibytes;
pub use self::named_progress::NamedProgress;
pub use self::size::Size;
