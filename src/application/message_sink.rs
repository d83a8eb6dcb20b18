//! Delivery of decoded message batches
//!
//! The driver hands every decoded page to a [`MessageSink`]. The CSV sink
//! owns the running total of written records; nothing else counts them.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

use crate::application::progress::ProgressReporter;
use crate::domain::ChatMessage;
use crate::infrastructure::replay_error::ReplayResult;

pub const CSV_HEADER: [&str; 2] = ["timestamp", "text"];

/// Receives one batch per decoded page, in page order
pub trait MessageSink {
    fn deliver(&mut self, batch: &[ChatMessage]) -> ReplayResult<()>;
}

/// Collects every delivered batch in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub batches: Vec<Vec<ChatMessage>>,
}

impl CollectingSink {
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.batches.iter().flatten()
    }
}

impl MessageSink for CollectingSink {
    fn deliver(&mut self, batch: &[ChatMessage]) -> ReplayResult<()> {
        self.batches.push(batch.to_vec());
        Ok(())
    }
}

/// Writes `timestamp,text` records, skipping messages without visible text.
/// Each batch is flushed before `deliver` returns.
pub struct CsvMessageSink<W: Write> {
    writer: csv::Writer<W>,
    lines_written: usize,
    progress: ProgressReporter,
}

impl CsvMessageSink<File> {
    /// Create (or truncate) the output file and write the header
    pub fn create(path: impl AsRef<Path>, progress: ProgressReporter) -> ReplayResult<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(file, progress)
    }
}

impl<W: Write> CsvMessageSink<W> {
    pub fn new(inner: W, progress: ProgressReporter) -> ReplayResult<Self> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer,
            lines_written: 0,
            progress,
        })
    }

    /// Records written so far, header excluded
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> MessageSink for CsvMessageSink<W> {
    fn deliver(&mut self, batch: &[ChatMessage]) -> ReplayResult<()> {
        let mut written = 0;
        for message in batch {
            let text = message.text().trim();
            if text.is_empty() {
                continue;
            }
            self.writer.write_record([message.timestamp(), text])?;
            written += 1;
        }
        self.writer.flush()?;
        self.lines_written += written;

        debug!(
            batch = batch.len(),
            written,
            total = self.lines_written,
            "Batch written"
        );
        self.progress
            .line(format_args!("[+] total {} lines written", self.lines_written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageKind;

    fn text(ts: &str, text: &str) -> ChatMessage {
        ChatMessage::new(ts, text, MessageKind::TextMessage)
    }

    fn written(sink: CsvMessageSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_header_written_even_without_messages() {
        let sink = CsvMessageSink::new(Vec::new(), ProgressReporter::silent()).unwrap();
        assert_eq!(written(sink), "timestamp,text\n");
    }

    #[test]
    fn test_blank_messages_are_skipped_and_not_counted() {
        let mut sink = CsvMessageSink::new(Vec::new(), ProgressReporter::silent()).unwrap();
        sink.deliver(&[text("0:01", "hi"), text("0:02", ""), text("0:03", "   ")])
            .unwrap();

        assert_eq!(sink.lines_written(), 1);
        assert_eq!(written(sink), "timestamp,text\n0:01,hi\n");
    }

    #[test]
    fn test_text_is_trimmed_and_minimally_quoted() {
        let mut sink = CsvMessageSink::new(Vec::new(), ProgressReporter::silent()).unwrap();
        sink.deliver(&[
            text("1:00", "  plain  "),
            text("1:01", "a, b"),
            text("1:02", "say \"hi\""),
        ])
        .unwrap();

        assert_eq!(
            written(sink),
            "timestamp,text\n1:00,plain\n1:01,\"a, b\"\n1:02,\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_running_total_spans_batches() {
        let mut sink = CsvMessageSink::new(Vec::new(), ProgressReporter::silent()).unwrap();
        sink.deliver(&[text("0:01", "a"), text("0:02", "b")]).unwrap();
        sink.deliver(&[]).unwrap();
        sink.deliver(&[text("0:03", "c")]).unwrap();

        assert_eq!(sink.lines_written(), 3);
    }

    #[test]
    fn test_collecting_sink_keeps_batches() {
        let mut sink = CollectingSink::default();
        sink.deliver(&[text("0:01", "a")]).unwrap();
        sink.deliver(&[text("0:02", "b"), text("0:03", "c")]).unwrap();

        assert_eq!(sink.batches.len(), 2);
        assert_eq!(sink.messages().count(), 3);
    }
}
