//! Narration of simulation events
//!
//! The core never logs directly. It reports each state transition worth
//! narrating to an [`EventSink`] handed to it at construction, so callers
//! decide whether lines go to the `log` facade, a buffer, or nowhere.

use log::debug;

/// Receives one line of narration per event
pub trait EventSink {
    fn emit(&mut self, line: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _line: &str) {}
}

/// Forwards every line to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, line: &str) {
        debug!("{}", line);
    }
}

impl EventSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<F> EventSink for F
where
    F: FnMut(&str),
{
    fn emit(&mut self, line: &str) {
        self(line)
    }
}
