//! Capture logger for tests
//!
//! A [`Logger`] whose structured output is decoded back into
//! [`LogMessage`]s on a background thread, so tests can assert on what was
//! logged without a terminal or file. Fatal never exits here.
//!
//! ```
//! use sevlog_core::{CaptureLogger, LEVEL_DEBUG};
//!
//! let log = CaptureLogger::new("debug").unwrap();
//! log.debug("my message", &[]);
//!
//! let msg = log.get_next().unwrap();
//! assert_eq!(msg.message, "my message");
//! assert_eq!(msg.level, LEVEL_DEBUG);
//! log.close();
//! ```

mod message;
mod pipe;
mod queue;

use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sevlog_core_types::Context;

pub use message::{FileSource, LogMessage, MessageField};

use self::pipe::{pipe, PipeReader};
use self::queue::DecodedQueue;
pub use self::queue::QUEUE_CAPACITY;
use crate::engine::{Attr, Destination, Level};
use crate::errors::Result;
use crate::facade::{Logger, NoExit};
use crate::levels::{parse_level, LEVEL_FATAL, STACK_FRAMES};
use crate::structured::new_json;

/// How long `get_next` waits for a message
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

const DECODER_THREAD: &str = "sevlog-capture";

pub struct CaptureLogger {
    logger: Logger,
    reader: PipeReader,
    queue: Arc<DecodedQueue>,
    decoder: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureLogger {
    /// Capture logger at the named threshold, without source locations
    pub fn new(level: &str) -> Result<Self> {
        Self::build(level, false)
    }

    /// Capture logger that also records the caller's source location
    pub fn with_source(level: &str) -> Result<Self> {
        Self::build(level, true)
    }

    fn build(level: &str, add_source: bool) -> Result<Self> {
        let level = parse_level(level)?;
        let (writer, reader) = pipe();
        let logger = Logger::new(new_json, Destination::new(writer), add_source, level, false)
            .with_terminator(Arc::new(NoExit));
        let queue = Arc::new(DecodedQueue::default());

        let decoder = {
            let reader = reader.clone();
            let queue = Arc::clone(&queue);
            thread::Builder::new()
                .name(DECODER_THREAD.to_string())
                .spawn(move || decode_loop(&reader, &queue))?
        };

        Ok(Self {
            logger,
            reader,
            queue,
            decoder: Mutex::new(Some(decoder)),
        })
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Next decoded message, waiting up to [`POLL_TIMEOUT`]
    ///
    /// A pending decode error is returned before any queued message.
    pub fn get_next(&self) -> Result<LogMessage> {
        self.queue.pop(POLL_TIMEOUT)
    }

    /// Next message at exactly `level`; messages at other levels are
    /// consumed and dropped
    pub fn get_next_level(&self, level: Level) -> Result<LogMessage> {
        loop {
            let msg = self.get_next()?;
            if msg.level == level {
                return Ok(msg);
            }
        }
    }

    /// Whether the next message's `field` equals `value`
    pub fn check_next_equal(&self, field: MessageField, value: &str) -> Result<bool> {
        Ok(self.get_next()?.field(field) == value)
    }

    /// Whether the next message at `level` has `field` equal to `value`
    pub fn check_next_level_equal(
        &self,
        level: Level,
        field: MessageField,
        value: &str,
    ) -> Result<bool> {
        Ok(self.get_next_level(level)?.field(field) == value)
    }

    /// Drop output written but not yet decoded; queued messages stay
    pub fn reset(&self) {
        if self.queue.is_closed() {
            return;
        }
        self.reader.clear();
    }

    /// Stop the decoder and close the stream; later writes fail and
    /// `get_next` reports `Closed`
    pub fn close(&self) {
        self.queue.close();
        self.reader.close();
        let handle = self
            .decoder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!(target: "sevlog::capture", "decoder thread panicked");
            }
        }
    }

    /// Log at Fatal without exiting
    #[track_caller]
    pub fn fatal(&self, msg: &str, attrs: &[Attr]) {
        self.logger
            .log_with_source(&Context::background(), LEVEL_FATAL, STACK_FRAMES, msg, attrs);
    }

    #[track_caller]
    pub fn fatal_ctx(&self, ctx: &Context, msg: &str, attrs: &[Attr]) {
        self.logger
            .log_with_source(ctx, LEVEL_FATAL, STACK_FRAMES, msg, attrs);
    }
}

impl Deref for CaptureLogger {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for CaptureLogger {
    fn drop(&mut self) {
        self.close();
    }
}

fn decode_loop(reader: &PipeReader, queue: &DecodedQueue) {
    tracing::debug!(target: "sevlog::capture", "decoder started");
    while let Some(line) = reader.read_line() {
        match LogMessage::decode(&line) {
            Ok(msg) => {
                if queue.push_message(msg).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(target: "sevlog::capture", code = err.code(), error = %err, "decoder stopping");
                queue.push_error(err);
                // No reader from here on: later writes must fail, not block
                reader.close();
                break;
            }
        }
    }
    tracing::debug!(target: "sevlog::capture", "decoder stopped");
}
