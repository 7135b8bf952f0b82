use allocprobe_core::allocator::ProbeAllocator;
use allocprobe_core::memory::{Backing, Memory};
use allocprobe_core::util::Size;
use log::debug;
use thiserror::Error;

/// Heap allocator. Obtains the buffer with a single `malloc` call.
#[derive(Debug, Default, Copy, Clone)]
pub struct HeapAllocator {}

impl HeapAllocator {
    /// Constructor for the heap allocator
    pub fn new() -> Self {
        HeapAllocator {}
    }
}

/// Errors that can happen during heap allocation
#[derive(Debug, Error)]
pub enum Error {
    /// The requested size does not fit into the address space.
    #[error("{0} exceeds the addressable memory range")]
    SizeOverflow(Size),
    /// `malloc` returned null.
    #[error("malloc() failed: {0}")]
    Malloc(std::io::Error),
}

impl ProbeAllocator for HeapAllocator {
    type Error = Error;

    fn name(&self) -> &'static str {
        "malloc"
    }

    fn alloc(&mut self, size: Size) -> Result<Memory, Self::Error> {
        let len = size.checked_bytes().ok_or(Error::SizeOverflow(size))?;
        if len == 0 {
            debug!("Zero-sized heap request, nothing to allocate");
            return Ok(Memory::empty());
        }
        let p = unsafe { libc::malloc(len) };
        if p.is_null() {
            return Err(Error::Malloc(std::io::Error::last_os_error()));
        }
        debug!("malloc({}) = {:p}", len, p);
        Ok(unsafe { Memory::from_raw_parts(p as *mut u8, len, Backing::Heap) })
    }
}
