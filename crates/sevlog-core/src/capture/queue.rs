//! Decoded message queue shared by the decoder thread and consumers

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::message::LogMessage;
use crate::errors::{Result, SevlogError};

/// Decoded messages held before the decoder blocks
pub const QUEUE_CAPACITY: usize = 10;

#[derive(Default)]
struct State {
    messages: VecDeque<LogMessage>,
    errors: VecDeque<SevlogError>,
    closed: bool,
}

#[derive(Default)]
pub(crate) struct DecodedQueue {
    state: Mutex<State>,
    available: Condvar,
    space: Condvar,
}

impl DecodedQueue {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a message, waiting for room; fails once the queue is closed
    pub(crate) fn push_message(&self, message: LogMessage) -> Result<()> {
        let mut state = self.lock();
        while !state.closed && state.messages.len() >= QUEUE_CAPACITY {
            state = self
                .space
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            return Err(SevlogError::Closed);
        }
        state.messages.push_back(message);
        self.available.notify_one();
        Ok(())
    }

    pub(crate) fn push_error(&self, err: SevlogError) {
        let mut state = self.lock();
        state.errors.push_back(err);
        self.available.notify_one();
    }

    /// Next error or message, errors first
    ///
    /// Fails with `Closed` at once on a closed queue and with `NoMessages`
    /// when nothing arrives within `timeout`.
    pub(crate) fn pop(&self, timeout: Duration) -> Result<LogMessage> {
        let state = self.lock();
        if state.closed {
            return Err(SevlogError::Closed);
        }
        let (mut state, _) = self
            .available
            .wait_timeout_while(state, timeout, |s| {
                !s.closed && s.errors.is_empty() && s.messages.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(SevlogError::Closed);
        }
        if let Some(err) = state.errors.pop_front() {
            return Err(err);
        }
        match state.messages.pop_front() {
            Some(message) => {
                self.space.notify_one();
                Ok(message)
            }
            None => Err(SevlogError::NoMessages),
        }
    }

    pub(crate) fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.available.notify_all();
        self.space.notify_all();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
