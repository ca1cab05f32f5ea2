//! The shared output sink.
//!
//! One process-wide writable text sink, swappable so tests (and an
//! embedding harness) can capture what a method execution writes. The sink
//! is a cloneable handle: clones of a buffer sink share the same buffer.

use parking_lot::Mutex;
use std::sync::Arc;

/// A cloneable handle to the process-wide text sink.
#[derive(Clone, Debug, Default)]
pub enum OutputSink {
    /// Write through to standard output.
    #[default]
    Stdout,
    /// Capture into a shared buffer.
    Buffer(Arc<Mutex<String>>),
}

impl OutputSink {
    /// A fresh capturing sink.
    pub fn buffer() -> Self {
        OutputSink::Buffer(Arc::new(Mutex::new(String::new())))
    }

    /// Write text without a trailing newline.
    pub fn write(&self, text: &str) {
        match self {
            OutputSink::Stdout => print!("{text}"),
            OutputSink::Buffer(buf) => buf.lock().push_str(text),
        }
    }

    /// Write text followed by a newline.
    pub fn writeln(&self, text: &str) {
        match self {
            OutputSink::Stdout => println!("{text}"),
            OutputSink::Buffer(buf) => {
                let mut guard = buf.lock();
                guard.push_str(text);
                guard.push('\n');
            }
        }
    }

    /// Everything captured so far. Empty for the stdout sink.
    pub fn captured(&self) -> String {
        match self {
            OutputSink::Stdout => String::new(),
            OutputSink::Buffer(buf) => buf.lock().clone(),
        }
    }
}
