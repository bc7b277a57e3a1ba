// src/logging/dedup.rs

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

/// Writer that drops a line when it repeats the line written just before it.
///
/// Bytes are held until a newline completes the line, so a line split over
/// several `write` calls is still compared as a whole. Only immediate
/// repeats are suppressed: `a a b` becomes `a b`, while `a b a` passes
/// through unchanged. `flush` forwards an unterminated tail as-is. Clones
/// share the same underlying writer and memory of the last line, which lets
/// one sink serve as a `tracing` [`MakeWriter`].
#[derive(Debug)]
pub struct DedupWriter<W> {
    state: Arc<Mutex<DedupState<W>>>,
}

#[derive(Debug)]
struct DedupState<W> {
    inner: W,
    pending: Vec<u8>,
    last_line: Vec<u8>,
}

impl<W> Clone for DedupWriter<W> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<W: Write> DedupWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            state: Arc::new(Mutex::new(DedupState {
                inner,
                pending: Vec::new(),
                last_line: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DedupState<W>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the wrapped writer.
    pub fn with_inner<R>(&self, f: impl FnOnce(&W) -> R) -> R {
        f(&self.lock().inner)
    }
}

impl<W: Write> Write for DedupWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.lock();
        let state = &mut *guard;
        for chunk in buf.split_inclusive(|b| *b == b'\n') {
            state.pending.extend_from_slice(chunk);
            if state.pending.last() != Some(&b'\n') {
                continue;
            }
            if state.pending != state.last_line {
                state.inner.write_all(&state.pending)?;
                std::mem::swap(&mut state.last_line, &mut state.pending);
            }
            state.pending.clear();
        }
        // Suppressed and buffered bytes still count as written.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.pending.is_empty() {
            state.inner.write_all(&state.pending)?;
            state.pending.clear();
        }
        state.inner.flush()
    }
}

impl<'a, W: Write + 'a> MakeWriter<'a> for DedupWriter<W> {
    type Writer = DedupWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
