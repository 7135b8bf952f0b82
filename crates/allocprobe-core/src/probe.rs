use crate::allocator::{ProbeAllocator, alloc_memory};
use crate::gate::{Gate, GateError};
use crate::memory::{BytePointer, Memory};
use crate::util::{FILL_BYTE, MB, NamedProgress, Size};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::io::{BufRead, Write};
use thiserror::Error;

/// Lifecycle of a [`Probe`].
///
/// Transitions only move forward:
/// `Parsed -> Allocated -> WaitingToFill -> Filled -> WaitingToExit -> Exited`.
/// Any failed transition moves the probe to `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeState {
    /// Arguments are known, nothing is allocated yet.
    Parsed,
    /// The buffer exists but has not been announced.
    Allocated,
    /// The fill prompt was printed; the next step blocks on input.
    WaitingToFill,
    /// Every byte of the buffer holds the fill byte.
    Filled,
    /// The exit prompt was printed; the next step blocks on input.
    WaitingToExit,
    /// Both gates passed.
    Exited,
    /// A transition failed. No further steps are possible.
    Failed,
}

/// Errors that end a probe run.
#[derive(Debug, Error)]
pub enum Error<AE: std::error::Error> {
    /// The allocation strategy could not provide the buffer.
    #[error("allocation failed")]
    AllocationFailed(#[source] AE),
    /// A gate did not receive its line.
    #[error("waiting for operator input failed")]
    InputFailed(#[from] GateError),
    /// A milestone could not be written.
    #[error("failed to write milestone")]
    Output(#[source] std::io::Error),
    /// The probe already exited or failed.
    #[error("probe is in terminal state {0:?}")]
    Finished(ProbeState),
}

/// Allocates a buffer, then touches every byte of it between two operator gates.
///
/// Milestones go to `W`, operator lines come from `R`. The buffer is returned
/// from [`Probe::run`] and never released by the probe itself.
pub struct Probe<A: ProbeAllocator, R: BufRead, W: Write> {
    allocator: A,
    size: Size,
    gate: Gate<R>,
    out: W,
    progress: Option<MultiProgress>,
    state: ProbeState,
    memory: Option<Memory>,
}

impl<A: ProbeAllocator, R: BufRead, W: Write> Probe<A, R, W> {
    /// Creates a probe in state [`ProbeState::Parsed`].
    ///
    /// # Arguments
    ///
    /// * `allocator` - Strategy providing the buffer
    /// * `size` - Requested buffer size
    /// * `input` - Stream the gates read operator lines from
    /// * `out` - Stream receiving the milestones
    pub fn new(allocator: A, size: Size, input: R, out: W) -> Self {
        Probe {
            allocator,
            size,
            gate: Gate::new(input),
            out,
            progress: None,
            state: ProbeState::Parsed,
            memory: None,
        }
    }

    /// Shows a progress bar in `progress` while filling.
    pub fn progress(mut self, progress: MultiProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Current state.
    pub fn state(&self) -> ProbeState {
        self.state
    }

    /// The buffer, once allocated.
    pub fn memory(&self) -> Option<&Memory> {
        self.memory.as_ref()
    }

    /// Performs exactly one transition and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed transition, after which the probe is in
    /// [`ProbeState::Failed`]. Stepping a probe in a terminal state returns
    /// [`Error::Finished`].
    pub fn step(&mut self) -> Result<ProbeState, Error<A::Error>> {
        let next = match self.state {
            ProbeState::Parsed => self.allocate(),
            ProbeState::Allocated => self.prompt_fill(),
            ProbeState::WaitingToFill => self.fill(),
            ProbeState::Filled => self.prompt_exit(),
            ProbeState::WaitingToExit => self.exit(),
            ProbeState::Exited | ProbeState::Failed => return Err(Error::Finished(self.state)),
        };
        match next {
            Ok(state) => {
                debug!("Probe state {:?} -> {:?}", self.state, state);
                self.state = state;
                Ok(state)
            }
            Err(e) => {
                warn!("Probe failed in state {:?}: {}", self.state, e);
                self.state = ProbeState::Failed;
                Err(e)
            }
        }
    }

    /// Steps until [`ProbeState::Exited`] and hands out the buffer.
    ///
    /// # Errors
    ///
    /// Returns the first failing transition's error.
    pub fn run(mut self) -> Result<Memory, Error<A::Error>> {
        while self.step()? != ProbeState::Exited {}
        self.memory.take().ok_or(Error::Finished(self.state))
    }

    fn milestone(&mut self, msg: &str) -> Result<(), Error<A::Error>> {
        writeln!(self.out, "{}", msg).map_err(Error::Output)?;
        self.out.flush().map_err(Error::Output)
    }

    fn allocate(&mut self) -> Result<ProbeState, Error<A::Error>> {
        self.milestone(&format!("allocating {}", self.size))?;
        let memory =
            alloc_memory(&mut self.allocator, self.size).map_err(Error::AllocationFailed)?;
        self.memory = Some(memory);
        Ok(ProbeState::Allocated)
    }

    fn prompt_fill(&mut self) -> Result<ProbeState, Error<A::Error>> {
        self.milestone("allocated - press enter to fill")?;
        Ok(ProbeState::WaitingToFill)
    }

    fn fill(&mut self) -> Result<ProbeState, Error<A::Error>> {
        self.gate.wait()?;
        self.milestone("filling")?;
        let memory = self
            .memory
            .as_ref()
            .ok_or(Error::Finished(ProbeState::Failed))?;
        let p = self.progress.as_ref().map(|p| {
            p.add(
                ProgressBar::new(memory.len().div_ceil(MB) as u64)
                    .with_style(ProgressStyle::named_bar("Filling")),
            )
        });
        memory.fill(FILL_BYTE, p.as_ref());
        if let Some(p) = p {
            p.finish_and_clear();
        }
        info!("Filled {} bytes", memory.len());
        Ok(ProbeState::Filled)
    }

    fn prompt_exit(&mut self) -> Result<ProbeState, Error<A::Error>> {
        self.milestone("done - press enter to exit")?;
        Ok(ProbeState::WaitingToExit)
    }

    fn exit(&mut self) -> Result<ProbeState, Error<A::Error>> {
        self.gate.wait()?;
        Ok(ProbeState::Exited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Backing;
    use std::io::Cursor;

    /// Allocates through `malloc` and records how often it was asked.
    struct CountingAllocator {
        calls: usize,
        fail: bool,
    }

    #[derive(Debug, Error)]
    #[error("out of memory")]
    struct OutOfMemory;

    impl ProbeAllocator for CountingAllocator {
        type Error = OutOfMemory;

        fn name(&self) -> &'static str {
            "counting"
        }

        fn alloc(&mut self, size: Size) -> Result<Memory, Self::Error> {
            self.calls += 1;
            if self.fail {
                return Err(OutOfMemory);
            }
            let len = size.checked_bytes().ok_or(OutOfMemory)?;
            if len == 0 {
                return Ok(Memory::empty());
            }
            let p = unsafe { libc::malloc(len) } as *mut u8;
            if p.is_null() {
                return Err(OutOfMemory);
            }
            unsafe { std::ptr::write_bytes(p, 0, len) };
            Ok(unsafe { Memory::from_raw_parts(p, len, Backing::Heap) })
        }
    }

    fn allocator() -> CountingAllocator {
        CountingAllocator {
            calls: 0,
            fail: false,
        }
    }

    #[test]
    fn full_run() -> anyhow::Result<()> {
        let mut out = vec![];
        let probe = Probe::new(allocator(), Size::MB(1), Cursor::new(b"\n\n"), &mut out);
        let memory = probe.run()?;
        assert_eq!(memory.len(), 1_048_576);
        assert!(memory.as_slice().iter().all(|&b| b == b'w'));
        memory.dealloc();
        assert_eq!(
            String::from_utf8(out)?,
            "allocating 1 MB\n\
             allocated - press enter to fill\n\
             filling\n\
             done - press enter to exit\n"
        );
        Ok(())
    }

    #[test]
    fn states_advance_in_order() -> anyhow::Result<()> {
        let mut probe = Probe::new(allocator(), Size::MB(1), Cursor::new(b"\n\n"), vec![]);
        assert_eq!(probe.state(), ProbeState::Parsed);
        assert_eq!(probe.step()?, ProbeState::Allocated);
        assert!(probe.memory().is_some_and(|m| m.as_slice().iter().all(|&b| b == 0)));
        assert_eq!(probe.step()?, ProbeState::WaitingToFill);
        assert!(probe.memory().is_some_and(|m| m.as_slice().iter().all(|&b| b == 0)));
        assert_eq!(probe.step()?, ProbeState::Filled);
        assert_eq!(probe.step()?, ProbeState::WaitingToExit);
        assert_eq!(probe.step()?, ProbeState::Exited);
        assert!(matches!(
            probe.step(),
            Err(Error::Finished(ProbeState::Exited))
        ));
        Ok(())
    }

    #[test]
    fn eof_before_fill_skips_fill() {
        let mut probe = Probe::new(allocator(), Size::MB(1), Cursor::new(b""), vec![]);
        probe.step().unwrap();
        probe.step().unwrap();
        assert!(matches!(
            probe.step(),
            Err(Error::InputFailed(GateError::EndOfStream))
        ));
        assert_eq!(probe.state(), ProbeState::Failed);
        assert!(probe.memory().is_some_and(|m| m.as_slice().iter().all(|&b| b == 0)));
        assert_eq!(
            String::from_utf8(probe.out.clone()).unwrap(),
            "allocating 1 MB\nallocated - press enter to fill\n"
        );
    }

    #[test]
    fn eof_before_exit() {
        let mut out = vec![];
        let probe = Probe::new(allocator(), Size::MB(1), Cursor::new(b"\n"), &mut out);
        assert!(matches!(
            probe.run(),
            Err(Error::InputFailed(GateError::EndOfStream))
        ));
        assert!(String::from_utf8(out).unwrap().ends_with("done - press enter to exit\n"));
    }

    #[test]
    fn allocation_failure_is_terminal() {
        let mut out = vec![];
        let mut probe = Probe::new(
            CountingAllocator {
                calls: 0,
                fail: true,
            },
            Size::MB(1),
            Cursor::new(b"\n\n"),
            &mut out,
        );
        assert!(matches!(probe.step(), Err(Error::AllocationFailed(_))));
        assert!(matches!(probe.step(), Err(Error::Finished(ProbeState::Failed))));
        assert_eq!(probe.allocator.calls, 1);
        assert!(probe.memory().is_none());
    }

    #[test]
    fn zero_size_run() -> anyhow::Result<()> {
        let probe = Probe::new(allocator(), Size::MB(0), Cursor::new(b"\n\n"), vec![]);
        let memory = probe.run()?;
        assert!(memory.is_empty());
        Ok(())
    }

    #[test]
    fn fill_with_progress() -> anyhow::Result<()> {
        let progress = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        let probe = Probe::new(allocator(), Size::MB(2), Cursor::new(b"\n\n"), vec![])
            .progress(progress);
        let memory = probe.run()?;
        assert!(memory.as_slice().iter().all(|&b| b == b'w'));
        memory.dealloc();
        Ok(())
    }
}
