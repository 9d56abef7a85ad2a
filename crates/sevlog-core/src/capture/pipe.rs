//! Bounded in-memory byte pipe between the logger and the decoder thread

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Bytes the pipe holds before writers block
pub(crate) const PIPE_CAPACITY: usize = 64 * 1024;

#[derive(Default)]
struct State {
    buf: VecDeque<u8>,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    readable: Condvar,
    writable: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create a connected writer/reader pair
pub(crate) fn pipe() -> (PipeWriter, PipeReader) {
    let shared = Arc::new(Shared::default());
    (
        PipeWriter(Arc::clone(&shared)),
        PipeReader(shared),
    )
}

/// Write end; each `write` lands in the pipe whole
pub(crate) struct PipeWriter(Arc<Shared>);

impl Write for PipeWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let shared = &self.0;
        let mut state = shared.lock();
        // An oversized write still goes through once the pipe is drained
        while !state.closed
            && !state.buf.is_empty()
            && state.buf.len() + data.len() > PIPE_CAPACITY
        {
            state = shared
                .writable
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "capture pipe closed"));
        }
        state.buf.extend(data);
        shared.readable.notify_one();
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read end, owned by the decoder thread and the capture logger
#[derive(Clone)]
pub(crate) struct PipeReader(Arc<Shared>);

impl PipeReader {
    /// Block until a complete newline-terminated line is available
    ///
    /// Returns `None` once the pipe is closed; an unterminated tail left at
    /// close is discarded.
    pub(crate) fn read_line(&self) -> Option<Vec<u8>> {
        let shared = &self.0;
        let mut state = shared.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(end) = state.buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = state.buf.drain(..=end).collect();
                shared.writable.notify_all();
                return Some(line);
            }
            state = shared
                .readable
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Drop every byte not yet read
    pub(crate) fn clear(&self) {
        let mut state = self.0.lock();
        state.buf.clear();
        self.0.writable.notify_all();
    }

    /// Close both ends, waking any blocked reader or writer
    pub(crate) fn close(&self) {
        let mut state = self.0.lock();
        state.closed = true;
        state.buf.clear();
        self.0.readable.notify_all();
        self.0.writable.notify_all();
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.0.lock().buf.len()
    }
}
