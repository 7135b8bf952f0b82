//! # Allocprobe
//!
//! Allocprobe is a manual memory-allocation exerciser. It allocates a buffer
//! with a selectable strategy, pauses, touches every byte, and pauses again,
//! so resident memory and page faults can be observed from outside.
//!
//! ## Features
//!
//! - `heap`: re-exports `allocprobe-heap` as [`heap`].
//! - `filemap`: re-exports `allocprobe-filemap` as [`filemap`].
//!
//! The command line tool lives in the `allocprobe-bin` crate as `alloc`.

pub use allocprobe_core::*;

#[cfg(feature = "filemap")]
pub use allocprobe_filemap as filemap;
#[cfg(feature = "heap")]
pub use allocprobe_heap as heap;
