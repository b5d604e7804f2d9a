use core::fmt;

use hermit_sync::SpinMutex;
use test_harness::IOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// An [`IOutput`] that keeps every line in memory, in the order it was written.
#[derive(Default)]
pub struct CaptureOutput {
    lines: SpinMutex<Vec<(Stream, String)>>,
}

impl CaptureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines.lock().clone()
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stream(Stream::Stdout)
    }

    pub fn stderr_lines(&self) -> Vec<String> {
        self.stream(Stream::Stderr)
    }

    /// Whether `line` was written, exactly, to `stream`.
    pub fn contains(&self, stream: Stream, line: &str) -> bool {
        self.lines
            .lock()
            .iter()
            .any(|(s, l)| *s == stream && l == line)
    }

    /// How many lines containing `needle` were written to `stream`.
    pub fn count_containing(&self, stream: Stream, needle: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|(s, l)| *s == stream && l.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn stream(&self, stream: Stream) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, l)| l.clone())
            .collect()
    }

    fn push(&self, stream: Stream, line: fmt::Arguments<'_>) {
        let line = line.to_string();

        log::trace!("captured {:?}: {}", stream, line);

        self.lines.lock().push((stream, line));
    }
}

impl IOutput for CaptureOutput {
    fn stdout(&self, line: fmt::Arguments<'_>) {
        self.push(Stream::Stdout, line);
    }

    fn stderr(&self, line: fmt::Arguments<'_>) {
        self.push(Stream::Stderr, line);
    }
}
