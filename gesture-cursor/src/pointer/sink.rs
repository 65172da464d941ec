//! Pointer sinks
//!
//! Where commands go once the engine has produced them. OS injection lives
//! outside this crate; the JSON lines sink is the hand-off point for it.

use super::command::PointerCommand;
use crate::{Error, Result};
use std::io::Write;

/// Receiver of pointer commands.
pub trait PointerSink {
    fn dispatch(&mut self, command: &PointerCommand) -> Result<()>;

    /// Push buffered commands out. Called once per frame.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: PointerSink + ?Sized> PointerSink for &mut S {
    fn dispatch(&mut self, command: &PointerCommand) -> Result<()> {
        (**self).dispatch(command)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Writes one JSON object per command per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PointerSink for JsonLinesSink<W> {
    fn dispatch(&mut self, command: &PointerCommand) -> Result<()> {
        serde_json::to_writer(&mut self.writer, command)?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| Error::Sink(format!("write failed: {}", e)))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::Sink(format!("flush failed: {}", e)))
    }
}

/// Keeps every command in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Vec<PointerCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PointerCommand] {
        &self.commands
    }

    pub fn count(&self, wanted: &PointerCommand) -> usize {
        self.commands.iter().filter(|c| *c == wanted).count()
    }

    pub fn take(&mut self) -> Vec<PointerCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl PointerSink for RecordingSink {
    fn dispatch(&mut self, command: &PointerCommand) -> Result<()> {
        self.commands.push(*command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines_output() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.dispatch(&PointerCommand::MoveTo { x: 1, y: 2 }).unwrap();
        sink.dispatch(&PointerCommand::Click).unwrap();
        sink.flush().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"cmd":"move_to","x":1,"y":2}"#);
        assert_eq!(lines[1], r#"{"cmd":"click"}"#);
    }

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.dispatch(&PointerCommand::ButtonDown).unwrap();
        sink.dispatch(&PointerCommand::ButtonUp).unwrap();
        assert_eq!(sink.count(&PointerCommand::ButtonDown), 1);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.commands().is_empty());
    }

    fn right_click_into<S: PointerSink>(mut sink: S) {
        sink.dispatch(&PointerCommand::RightClick).unwrap();
    }

    #[test]
    fn test_sink_by_mutable_reference() {
        let mut sink = RecordingSink::new();
        right_click_into(&mut sink);
        assert_eq!(sink.commands(), &[PointerCommand::RightClick]);
    }
}
