//! The `memory` module provides the buffer abstraction handed out by allocators.
//!
//! - [`Memory`]: an allocated span together with the primitive that backs it.
//! - [`Backing`]: which primitive produced the span.
//! - [`BytePointer`]: byte-level access to a span.
mod memblock;

pub use self::memblock::{Backing, Memory};

/// Trait for accessing memory as a byte pointer.
///
/// Provides low-level access to memory regions with byte-level addressing.
pub trait BytePointer {
    /// Returns a mutable pointer to the byte at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of bounds.
    fn addr(&self, offset: usize) -> *mut u8;

    /// Returns a mutable pointer to the start of the memory region.
    fn ptr(&self) -> *mut u8;

    /// Returns the total length of the memory region in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the region spans zero bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
