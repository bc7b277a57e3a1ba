// src/track/tailer.rs

use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::fs::FileSystem;

/// Resumable reader over one append-only log file.
///
/// The file is opened lazily on the first successful read. Each call to
/// [`LogTail::read_new_lines`] returns only the complete lines appended since
/// the previous call; a trailing line without its newline yet is held back
/// until the rest of it arrives.
pub struct LogTail {
    path: PathBuf,
    reader: Option<BufReader<Box<dyn Read + Send>>>,
    pending: Vec<u8>,
    offset: u64,
}

impl std::fmt::Debug for LogTail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTail")
            .field("path", &self.path)
            .field("open", &self.reader.is_some())
            .field("offset", &self.offset)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl LogTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: None,
            pending: Vec::new(),
            offset: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Number of bytes consumed from the file so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read every complete line appended since the last call, with trailing
    /// whitespace trimmed.
    ///
    /// A file that cannot be opened yet yields no lines and is retried on the
    /// next call. Hitting end-of-file just ends this batch.
    pub fn read_new_lines(&mut self, fs: &dyn FileSystem) -> io::Result<Vec<String>> {
        if self.reader.is_none() {
            match fs.open_read(&self.path) {
                Ok(handle) => {
                    debug!(path = ?self.path, "opened suite log");
                    self.reader = Some(BufReader::new(handle));
                }
                Err(err) => {
                    trace!(path = ?self.path, error = %err, "suite log not readable yet");
                    return Ok(Vec::new());
                }
            }
        }

        let mut lines = Vec::new();
        let Some(reader) = self.reader.as_mut() else {
            return Ok(lines);
        };

        loop {
            let read = reader.read_until(b'\n', &mut self.pending)?;
            if read == 0 {
                break;
            }
            self.offset += read as u64;

            if self.pending.last() == Some(&b'\n') {
                let line = String::from_utf8_lossy(&self.pending);
                lines.push(line.trim_end().to_string());
                self.pending.clear();
            }
        }

        Ok(lines)
    }

    /// Release the file handle. Returns `true` if one was open.
    pub fn close(&mut self) -> bool {
        self.reader.take().is_some()
    }
}
