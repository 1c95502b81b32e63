//! JSONL file writer for conversation transcripts.
//!
//! Each [`ConversationEvent`] becomes a single JSON line carrying a
//! `type` field and a UTC `timestamp`, appended through a buffered
//! writer. The transcript is a diagnostic artifact, not a resumable
//! store: sessions are never reloaded from it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tabletalk_application::{ConversationEvent, ConversationLogger};
use tracing::warn;

/// Transcript logger writing one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event
/// and on `Drop`; the file is opened in append mode so consecutive runs
/// share one transcript.
pub struct JsonlTranscriptLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Open (or create) the transcript at the given path.
    ///
    /// Creates parent directories as needed. Returns `None` when the
    /// file cannot be opened; transcript logging is best-effort and must
    /// never take the session down.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create transcript directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Path of the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_for(event: ConversationEvent) -> serde_json::Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        match event.payload {
            serde_json::Value::Object(mut map) => {
                map.insert("type".to_string(), event.event_type.into());
                map.insert("timestamp".to_string(), timestamp.into());
                serde_json::Value::Object(map)
            }
            payload => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": payload,
            }),
        }
    }
}

impl ConversationLogger for JsonlTranscriptLogger {
    fn log(&self, event: ConversationEvent) {
        let record = Self::record_for(event);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
