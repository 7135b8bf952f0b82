use std::ptr::NonNull;

use super::BytePointer;
use crate::util::MB;
use indicatif::ProgressBar;
use log::{debug, trace};

/// The primitive a [`Memory`] span was obtained from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backing {
    /// Anonymous process heap memory from `malloc`.
    Heap,
    /// A shared mapping created with `mmap`.
    Mapping,
    /// A zero-length request. No primitive was called.
    Empty,
}

/// A managed memory region.
///
/// Memory is never released implicitly. The probe relies on process teardown;
/// library users call [`Memory::dealloc`].
#[derive(Debug)]
pub struct Memory {
    /// Block pointer
    pub ptr: *mut u8,
    /// Block length in bytes
    pub len: usize,
    backing: Backing,
}

unsafe impl Send for Memory {}

impl Memory {
    /// Creates a new memory block with the given pointer, length and backing.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `len` bytes for as long as
    /// the returned value exists, and must have been obtained from the
    /// primitive named by `backing`.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize, backing: Backing) -> Self {
        Memory { ptr, len, backing }
    }

    /// Creates a zero-length block.
    pub fn empty() -> Self {
        Memory {
            ptr: NonNull::dangling().as_ptr(),
            len: 0,
            backing: Backing::Empty,
        }
    }

    /// The primitive backing this block.
    pub fn backing(&self) -> Backing {
        self.backing
    }

    /// Writes `byte` into every position of the block.
    ///
    /// Positions are written in increasing address order, one mebibyte at a
    /// time. `progress` is advanced by one per completed mebibyte.
    pub fn fill(&self, byte: u8, progress: Option<&ProgressBar>) {
        debug!(
            "Filling {} bytes at {:p} with {:#04x}",
            self.len, self.ptr, byte
        );
        for offset in (0..self.len).step_by(MB) {
            let count = MB.min(self.len - offset);
            let chunk = unsafe { std::slice::from_raw_parts_mut(self.addr(offset), count) };
            chunk.fill(byte);
            trace!("Filled chunk at offset {:#x}", offset);
            if let Some(p) = progress {
                p.inc(1);
            }
        }
    }

    /// Returns the block contents as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Deallocates the memory block.
    ///
    /// Releases the block with the primitive matching its backing. Consumes self.
    pub fn dealloc(self) {
        match self.backing {
            Backing::Heap => unsafe { libc::free(self.ptr as *mut libc::c_void) },
            Backing::Mapping => {
                unsafe { libc::munmap(self.ptr as *mut libc::c_void, self.len) };
            }
            Backing::Empty => {}
        }
    }
}

impl BytePointer for Memory {
    fn addr(&self, offset: usize) -> *mut u8 {
        assert!(
            offset < self.len,
            "Memory::addr failed. Offset {} >= {}",
            offset,
            self.len
        );
        unsafe { self.ptr.byte_add(offset) }
    }
    fn ptr(&self) -> *mut u8 {
        self.ptr
    }
    fn len(&self) -> usize {
        self.len
    }
}
