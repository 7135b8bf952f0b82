//! Heap memory allocator.
//!
//! This crate provides an allocator that requests the whole buffer as one
//! `malloc` block. For large sizes the C library typically serves the request
//! with an anonymous mapping, so pages stay virtual until first written.
//!
//! Implements the [`allocprobe_core::allocator::ProbeAllocator`] trait.

#![warn(missing_docs)]

mod heap;

pub use heap::*;
