//! JSONL transcript of consensus runs.
//!
//! One line per [`ConversationEvent`]. Every line carries the same envelope
//! (`type`, `timestamp`, `session`, `run`) followed by the event's own fields,
//! so lines from one run can be grouped even when several processes append
//! to the same file.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use triplet_application::{ConversationEvent, ConversationLogger};

/// Event type that closes a run; the next event starts a new one.
const RUN_END: &str = "consensus_complete";

#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    timestamp: String,
    session: &'a str,
    run: u64,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

struct Transcript {
    writer: BufWriter<File>,
    run: u64,
}

/// Appends consensus events to a JSONL file.
///
/// `session` identifies this logger instance (its opening time); `run`
/// counts consensus runs within the session, starting at 1.
pub struct JsonlConversationLogger {
    transcript: Mutex<Transcript>,
    session: String,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` when the file cannot be opened; logging is then off.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Cannot create transcript directory {}: {}", parent.display(), e);
            return None;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| warn!("Cannot open transcript {}: {}", path.display(), e))
            .ok()?;

        Some(Self {
            transcript: Mutex::new(Transcript {
                writer: BufWriter::new(file),
                run: 1,
            }),
            session: chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fields(payload: Value) -> Map<String, Value> {
        match payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut transcript) = self.transcript.lock() else {
            return;
        };

        let record = Record {
            event_type: event.event_type,
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            session: &self.session,
            run: transcript.run,
            fields: Self::fields(event.payload),
        };

        match serde_json::to_string(&record) {
            Ok(line) => {
                if let Err(e) = writeln!(transcript.writer, "{}", line)
                    .and_then(|_| transcript.writer.flush())
                {
                    warn!("Transcript write failed: {}", e);
                }
            }
            Err(e) => warn!("Cannot serialize {} event: {}", event.event_type, e),
        }

        if event.event_type == RUN_END {
            transcript.run += 1;
        }
    }
}
