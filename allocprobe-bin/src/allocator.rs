//! Allocation strategies selectable from the command line.
//!
//! To add a new strategy, implement the `ProbeAllocator` trait for it and add
//! a new variant to the [`Strategy`] enum.

use std::io::{BufRead, Write};

use allocprobe_core::allocator::ProbeAllocator;
use allocprobe_core::memory::Memory;
use allocprobe_core::util::Size;
use allocprobe_core::Probe;
use allocprobe_filemap::FileMapAllocator;
use allocprobe_heap::HeapAllocator;
use anyhow::Context;
use clap::ValueEnum;
use indicatif::MultiProgress;
use log::info;

/// Allocation strategy, spelled as on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// One `malloc` block on the process heap.
    #[value(name = "malloc")]
    HeapAllocation,
    /// A `MAP_SHARED` mapping of a new temporary file in the working directory.
    #[value(name = "mmap")]
    FileBackedMapping,
}

/// Runs the probe with the allocator selected by `strategy`.
///
/// The returned memory is still allocated. Callers exiting the process leave
/// its release to the kernel.
///
/// # Errors
///
/// Fails if allocation fails, a gate does not get its line or a milestone
/// cannot be written.
pub fn run<R: BufRead, W: Write>(
    strategy: Strategy,
    size: Size,
    input: R,
    out: W,
    progress: Option<MultiProgress>,
) -> anyhow::Result<Memory> {
    info!("Allocation strategy: {:?}", strategy);
    match strategy {
        Strategy::HeapAllocation => probe(HeapAllocator::new(), size, input, out, progress),
        Strategy::FileBackedMapping => {
            probe(FileMapAllocator::default(), size, input, out, progress)
        }
    }
}

fn probe<A, R, W>(
    allocator: A,
    size: Size,
    input: R,
    out: W,
    progress: Option<MultiProgress>,
) -> anyhow::Result<Memory>
where
    A: ProbeAllocator,
    A::Error: Send + Sync + 'static,
    R: BufRead,
    W: Write,
{
    let name = allocator.name();
    let mut probe = Probe::new(allocator, size, input, out);
    if let Some(progress) = progress {
        probe = probe.progress(progress);
    }
    probe
        .run()
        .with_context(|| format!("{} probe of {} failed", name, size))
}
