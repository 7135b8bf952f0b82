//! File-backed shared mapping allocator.
//!
//! This crate provides an allocator that creates a fresh temporary file with
//! `mkstemp`, extends it past the requested size by writing a short trailer,
//! and maps the requested range `MAP_SHARED`. Touching the mapping therefore
//! commits page-cache pages of the file rather than anonymous memory.
//!
//! The file is left on disk so it can be inspected after the process exits.
//!
//! Implements the [`allocprobe_core::allocator::ProbeAllocator`] trait.

#![warn(missing_docs)]

mod filemap;

pub use filemap::*;
