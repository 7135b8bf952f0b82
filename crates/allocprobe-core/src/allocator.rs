//! Allocation strategies.
//!
//! This module defines the [`ProbeAllocator`] trait and the [`alloc_memory`]
//! entry point used by the probe to obtain its buffer.

use crate::memory::{BytePointer, Memory};
use crate::util::Size;
use log::{debug, info};

/// Trait for allocation strategies that hand out one writable buffer.
///
/// Implementors only reserve the memory. Touching it is left to the caller so
/// that allocation and first write can be observed separately.
///
/// # Associated Types
///
/// * `Error` - The error type returned by allocation operations. Must implement [`std::error::Error`].
///
/// # Examples
///
/// See `allocprobe-heap` and `allocprobe-filemap` for concrete strategies.
pub trait ProbeAllocator {
    /// The error type returned by allocation operations.
    type Error: std::error::Error;

    /// Short human-readable name of the strategy.
    fn name(&self) -> &'static str;

    /// Allocates a contiguous buffer of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size does not fit the address space or the
    /// underlying primitive fails.
    fn alloc(&mut self, size: Size) -> Result<Memory, Self::Error>;
}

impl<A: ProbeAllocator + ?Sized> ProbeAllocator for &mut A {
    type Error = A::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn alloc(&mut self, size: Size) -> Result<Memory, Self::Error> {
        (**self).alloc(size)
    }
}

/// Allocate memory using an allocation strategy.
///
/// This is the main entry point for users who simply want a buffer.
///
/// # Errors
///
/// Propagates the allocator's error unchanged.
pub fn alloc_memory<E: std::error::Error>(
    allocator: &mut dyn ProbeAllocator<Error = E>,
    size: Size,
) -> Result<Memory, E> {
    debug!("Requesting {} from {} allocator", size, allocator.name());
    let memory = allocator.alloc(size)?;
    info!(
        "Allocated {} bytes at {:p} ({:?})",
        memory.len(),
        memory.ptr(),
        memory.backing()
    );
    Ok(memory)
}
