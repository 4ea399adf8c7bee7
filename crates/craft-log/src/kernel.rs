//! The event kernel: a cloneable handle threaded through contexts (see
//! spec.md §9 "Global logger" design note) that fans events out to a
//! console sink and an optional binary file sink on a dedicated writer
//! thread, so callers never block on file I/O.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::binary;
use crate::event::{Data, Event, EventType};
use crate::level::Level;

/// File sink size budget (spec.md §5): once the backing file would grow
/// past this, the sink closes itself and silently drops further events.
pub const FILE_SINK_BUDGET_BYTES: u64 = 64 * 1024 * 1024;

static NEXT_THREAD_ID: AtomicU32 = AtomicU32::new(1);

thread_local! {
    static THREAD_ID: u32 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

fn current_thread_id() -> u32 {
    THREAD_ID.with(|id| *id)
}

fn now_microseconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

enum Message {
    Event(Event),
    Shutdown,
}

struct FileSink {
    writer: BufWriter<File>,
    written: u64,
    closed: bool,
}

impl FileSink {
    fn open(path: &Path) -> std::io::Result<FileSink> {
        let mut writer = BufWriter::new(File::create(path)?);
        binary::write_header(&mut writer)?;
        writer.flush()?;
        Ok(FileSink {
            writer,
            written: (binary::MAGIC.len() + 4) as u64,
            closed: false,
        })
    }

    fn write(&mut self, event: &Event) {
        if self.closed {
            return;
        }
        let mut buf = Vec::new();
        if binary::write_event(&mut buf, event).is_err() {
            self.closed = true;
            return;
        }
        if self.written + buf.len() as u64 > FILE_SINK_BUDGET_BYTES {
            self.closed = true;
            let _ = self.writer.flush();
            return;
        }
        if self.writer.write_all(&buf).is_ok() {
            self.written += buf.len() as u64;
        } else {
            self.closed = true;
        }
    }
}

fn console_write(event: &Event) {
    if event.kind == EventType::RecursiveSpanBegin || event.kind == EventType::RecursiveSpanEnd {
        return;
    }
    match &event.data {
        Data::Null => {
            eprintln!("[{}] {}: {}", event.level.as_str(), event.category, event.message);
        }
        other => {
            eprintln!(
                "[{}] {}: {} = {:?}",
                event.level.as_str(),
                event.category,
                event.message,
                other
            );
        }
    }
}

/// A handle to the logging subsystem. Cheap to clone; all clones share the
/// same writer thread and sinks.
#[derive(Clone)]
pub struct Kernel {
    inner: Arc<Inner>,
}

struct Inner {
    tx: Sender<Message>,
    console_min_level: Level,
    writer: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Kernel {
    /// Start a kernel with a console sink and, if `file_path` is given, a
    /// binary file sink at that path.
    pub fn start(file_path: Option<PathBuf>, console_min_level: Level) -> anyhow::Result<Kernel> {
        let (tx, rx) = mpsc::channel::<Message>();

        let mut file_sink = match file_path {
            Some(path) => Some(FileSink::open(&path)?),
            None => None,
        };

        let handle = std::thread::spawn(move || {
            for message in rx {
                match message {
                    Message::Event(event) => {
                        if let Some(sink) = file_sink.as_mut() {
                            sink.write(&event);
                        }
                        if event.level <= console_min_level {
                            console_write(&event);
                        }
                    }
                    Message::Shutdown => break,
                }
            }
        });

        Ok(Kernel {
            inner: Arc::new(Inner {
                tx,
                console_min_level,
                writer: std::sync::Mutex::new(Some(handle)),
            }),
        })
    }

    /// A kernel that only logs to the console, at [`Level::Info`] and
    /// above. Handy default for tests and small tools.
    pub fn console_only() -> Kernel {
        Kernel::start(None, Level::Info).expect("console-only kernel never fails to start")
    }

    fn send(&self, event: Event) {
        // Swallow send errors: a shut-down kernel silently drops events
        // rather than panicking callers mid-build.
        let _ = self.inner.tx.send(Message::Event(event));
    }

    pub fn log(&self, category: impl Into<String>, level: Level, message: impl Into<String>) {
        self.send(Event {
            time_microseconds: now_microseconds(),
            thread_id: current_thread_id(),
            level,
            kind: EventType::Message,
            category: category.into(),
            message: message.into(),
            data: Data::Null,
        });
    }

    pub fn log_int(&self, category: impl Into<String>, level: Level, name: impl Into<String>, value: i64) {
        self.send(Event {
            time_microseconds: now_microseconds(),
            thread_id: current_thread_id(),
            level,
            kind: EventType::IntValue,
            category: category.into(),
            message: name.into(),
            data: Data::Int(value),
        });
    }

    /// Log `text` one line at a time, skipping entirely if `text` is empty
    /// (spec.md §7: "empty stdout/stderr suppression").
    pub fn log_lines(&self, category: impl Into<String> + Clone, level: Level, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        for line in text.lines() {
            self.log(category.clone(), level, line);
        }
    }

    /// Open a scoped section: a `RecursiveSpanBegin` event now, and a
    /// matching `RecursiveSpanEnd` when the returned guard drops.
    pub fn span(&self, name: impl Into<String>) -> Span<'_> {
        let name = name.into();
        self.send(Event {
            time_microseconds: now_microseconds(),
            thread_id: current_thread_id(),
            level: Level::Debug,
            kind: EventType::RecursiveSpanBegin,
            category: "Section".into(),
            message: name.clone(),
            data: Data::Null,
        });
        Span { kernel: self, name }
    }

    /// Flush the writer thread and block until every queued event has been
    /// processed. Used before the process exits.
    pub fn shutdown(&self) {
        let _ = self.inner.tx.send(Message::Shutdown);
        if let Ok(mut guard) = self.inner.writer.lock() {
            if let Some(handle) = guard.take() {
                let _ = handle.join();
            }
        }
    }
}

/// RAII guard for a logging section; see [`Kernel::span`].
pub struct Span<'k> {
    kernel: &'k Kernel,
    name: String,
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        self.kernel.send(Event {
            time_microseconds: now_microseconds(),
            thread_id: current_thread_id(),
            level: Level::Debug,
            kind: EventType::RecursiveSpanEnd,
            category: "Section".into(),
            message: std::mem::take(&mut self.name),
            data: Data::Null,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_records_header_and_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.axelog");
        let kernel = Kernel::start(Some(path.clone()), Level::Fatal).unwrap();
        kernel.log("task", Level::Info, "hello");
        kernel.shutdown();

        let bytes = std::fs::read(&path).unwrap();
        let mut cursor = &bytes[..];
        assert_eq!(binary::read_header(&mut cursor).unwrap(), binary::VERSION);
        let event = binary::read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(event.message, "hello");
        assert_eq!(event.category, "task");
    }

    #[test]
    fn span_emits_begin_and_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.axelog");
        let kernel = Kernel::start(Some(path.clone()), Level::Fatal).unwrap();
        {
            let _span = kernel.span("compile");
        }
        kernel.shutdown();

        let bytes = std::fs::read(&path).unwrap();
        let mut cursor = &bytes[..];
        binary::read_header(&mut cursor).unwrap();
        let begin = binary::read_event(&mut cursor).unwrap().unwrap();
        let end = binary::read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(begin.kind, EventType::RecursiveSpanBegin);
        assert_eq!(end.kind, EventType::RecursiveSpanEnd);
    }

    #[test]
    fn log_lines_suppresses_empty_text() {
        let kernel = Kernel::console_only();
        // Should not panic or emit anything observable; mostly a smoke test
        // that empty/whitespace-only text is a no-op.
        kernel.log_lines("stdout", Level::Verbose, "   \n  ");
        kernel.shutdown();
    }
}
