use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use sevlog_core::{Destination, HandlerFactory, Level, Logger, Terminate};

/// In-memory writer whose contents can be read back after logging
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Remembers exit codes instead of exiting
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingExit(pub Mutex<Vec<i32>>);

impl Terminate for RecordingExit {
    fn terminate(&self, code: i32) {
        self.0.lock().unwrap().push(code);
    }
}

/// A logger writing into a fresh buffer, plus the buffer
#[allow(dead_code)]
pub fn buffered_logger(
    factory: HandlerFactory,
    add_source: bool,
    level: Level,
) -> (Logger, SharedBuf) {
    let buf = SharedBuf::default();
    let logger = Logger::new(factory, Destination::new(buf.clone()), add_source, level, false);
    (logger, buf)
}
