//! # Allocprobe Core
//!
//! `allocprobe-core` provides the building blocks of a manual memory-allocation
//! exerciser: a buffer is allocated with a pluggable strategy, the operator is
//! asked to continue, every byte is touched, and the operator is asked again.
//! The pauses leave time to inspect resident memory and page faults with an
//! external tool.
//!
//! ## Main Components
//!
//! - [`allocator::ProbeAllocator`] - Defines an allocation strategy.
//! - [`Probe`] - The state machine driving allocation, gates and the fill phase.
//! - [`Gate`] - Blocks until the operator supplies a line.
//! - [`memory`] module - The [`memory::Memory`] buffer abstraction.
//! - [`util`] module - [`util::Size`], constants and permissive size parsing.
//!
//! ## Platform Support
//!
//! Linux. Allocation strategies use `libc` directly.

#![warn(missing_docs)]

pub mod allocator;
mod gate;
pub mod memory;
mod probe;
pub mod util;

pub use gate::{Gate, GateError};
pub use probe::{Error, Probe, ProbeState};
