//! Persistence of confirmed feedback.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::Mutex;

use crate::conversation::record::ResponseRecord;
use crate::error::Result;

/// Receives a [`ResponseRecord`] each time a user confirms or rejects an
/// answer.
///
/// Failures are returned to the caller of the engine; nothing retries.
pub trait FeedbackSink: Send + Sync {
    /// Persist one record.
    fn save(&self, record: &ResponseRecord) -> Result<()>;

    /// Get the name of this sink for debugging and logging.
    fn name(&self) -> &str;
}

/// Keeps saved records in memory.
#[derive(Debug, Default)]
pub struct MemoryFeedbackSink {
    records: Mutex<Vec<ResponseRecord>>,
}

impl MemoryFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record saved so far, oldest first.
    pub fn records(&self) -> Vec<ResponseRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl FeedbackSink for MemoryFeedbackSink {
    fn save(&self, record: &ResponseRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Appends each saved record as one JSON object per line.
///
/// Each line goes to the file in a single unbuffered write, so a failed save
/// leaves nothing behind for the next one to append to.
#[derive(Debug)]
pub struct JsonlFeedbackSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlFeedbackSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from a feedback log, skipping blank lines.
    pub fn read_all<P: AsRef<Path>>(path: P) -> Result<Vec<ResponseRecord>> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl FeedbackSink for JsonlFeedbackSink {
    fn save(&self, record: &ResponseRecord) -> Result<()> {
        let line = encode_line(record)?;
        self.file.lock().write_all(&line)?;
        debug!("Saved feedback {} to {}", record.id, self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

fn encode_line(record: &ResponseRecord) -> Result<Vec<u8>> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink() {
        let sink = MemoryFeedbackSink::new();
        assert!(sink.is_empty());

        let mut record = ResponseRecord::new("bob", "q", "r");
        record.correct = Some(true);
        sink.save(&record).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0], record);
        assert_eq!(sink.name(), "memory");
    }

    #[test]
    fn test_jsonl_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("feedback.jsonl");

        let mut first = ResponseRecord::new("bob", "book a flight", "Where to?");
        first.correct = Some(true);
        let mut second = ResponseRecord::new("alice", "weather", "Sunny.");
        second.correct = Some(false);

        {
            let sink = JsonlFeedbackSink::open(&path).unwrap();
            sink.save(&first).unwrap();
        }
        let sink = JsonlFeedbackSink::open(&path).unwrap();
        sink.save(&second).unwrap();

        let records = JsonlFeedbackSink::read_all(sink.path()).unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn test_encode_line_is_one_complete_line() {
        let record = ResponseRecord::new("bob", "multi\nline question", "r");
        let line = encode_line(&record).unwrap();

        assert_eq!(line.iter().filter(|&&b| b == b'\n').count(), 1);
        assert_eq!(line.last(), Some(&b'\n'));
        let decoded: ResponseRecord = serde_json::from_slice(&line).unwrap();
        assert_eq!(decoded, record);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_jsonl_sink_reports_every_failed_write() {
        let sink = JsonlFeedbackSink::open("/dev/full").unwrap();
        let record = ResponseRecord::new("bob", "q", "r");

        for _ in 0..2 {
            let err = sink.save(&record).unwrap_err();
            assert!(err.is_persistence());
        }
    }
}
