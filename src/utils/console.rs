use crate::domain::ports::LogSink;
use crate::utils::error::{ImagelynError, Result};
use std::cell::RefCell;
use std::io::{BufRead, Write};

/// Forwards interpreter messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("✅ {}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("⚠️ {}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("❌ {}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLevel {
    Info,
    Warn,
    Error,
}

/// Keeps every message in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: RefCell<Vec<(SinkLevel, String)>>,
}

impl MemorySink {
    fn at(&self, level: SinkLevel) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(SinkLevel::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(SinkLevel::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(SinkLevel::Error)
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.lines
            .borrow_mut()
            .push((SinkLevel::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines
            .borrow_mut()
            .push((SinkLevel::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines
            .borrow_mut()
            .push((SinkLevel::Error, message.to_string()));
    }
}

/// Asks for an integer in `[lower, upper]` until one is entered.
pub fn prompt_int<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    lower: u32,
    upper: u32,
    prompt: &str,
) -> Result<u32> {
    loop {
        write!(writer, "{} [{}-{}]: ", prompt, lower, upper)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(ImagelynError::IoError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before a number was entered",
            )));
        }

        match line.trim().parse::<u32>() {
            Ok(value) if (lower..=upper).contains(&value) => return Ok(value),
            _ => writeln!(writer, "Please enter a number between {} and {}", lower, upper)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_int_retries_until_in_range() {
        let mut input = Cursor::new("abc\n9\n2\n");
        let mut output = Vec::new();

        let value = prompt_int(&mut input, &mut output, 1, 3, "Pick").unwrap();
        assert_eq!(value, 2);

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Pick [1-3]: ").count(), 3);
        assert_eq!(printed.matches("Please enter a number").count(), 2);
    }

    #[test]
    fn test_prompt_int_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(prompt_int(&mut input, &mut output, 1, 3, "Pick").is_err());
    }

    #[test]
    fn test_memory_sink_separates_levels() {
        let sink = MemorySink::default();
        sink.info("a");
        sink.warn("b");
        sink.error("c");
        assert_eq!(sink.infos(), vec!["a"]);
        assert_eq!(sink.warnings(), vec!["b"]);
        assert_eq!(sink.errors(), vec!["c"]);
    }
}
