//! Blocking checkpoints on operator input.

use std::io::BufRead;

use log::debug;
use thiserror::Error;

/// Errors raised while waiting at a [`Gate`].
#[derive(Debug, Error)]
pub enum GateError {
    /// The input stream ended before a line arrived.
    #[error("input stream closed before a line was read")]
    EndOfStream,
    /// Reading from the input stream failed.
    #[error("failed to read line: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocks until the operator supplies one line of input.
///
/// The content of the line is discarded; only its arrival matters.
pub struct Gate<R: BufRead> {
    input: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Gate<R> {
    /// Creates a gate reading from `input`.
    pub fn new(input: R) -> Self {
        Gate { input, buf: vec![] }
    }

    /// Waits for one line.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::EndOfStream`] if the stream is exhausted and
    /// [`GateError::Io`] if reading fails.
    pub fn wait(&mut self) -> Result<(), GateError> {
        self.buf.clear();
        // lines are not required to be UTF-8
        let n = self.input.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Err(GateError::EndOfStream);
        }
        debug!("Gate released after {} bytes of input", n);
        Ok(())
    }
}
