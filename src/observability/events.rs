//! Structured lifecycle event stream.
//!
//! Discrete, typed events emitted as plans move through the lifecycle.
//! Events are serialized as newline-delimited JSON (JSONL) with a
//! monotonically increasing sequence number for ordering.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::Phase;
use crate::plan::PlanId;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete lifecycle event.
///
/// Each variant is tagged with `"type"` when serialized so consumers can
/// dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A plan snapshot was read from the store.
    PlanLoaded {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        phase: Phase,
        version: u64,
    },

    /// An advance was refused because requirements are unmet.
    TransitionBlocked {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        from: Phase,
        /// `None` when the plan is already terminal.
        to: Option<Phase>,
        /// Keys of the unmet requirements.
        unmet: Vec<String>,
    },

    /// The confirmation gate declined an advance.
    TransitionDeclined {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        from: Phase,
        to: Phase,
    },

    /// A transition was committed.
    PhaseAdvanced {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        from: Phase,
        to: Phase,
        /// Version of the stored snapshot after the commit.
        version: u64,
    },

    /// The store rejected a commit because the snapshot was stale.
    TransitionConflict {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        expected_version: u64,
    },

    /// The store failed to persist a commit.
    PersistenceFailed {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        error: String,
    },

    /// An evidence field was set or cleared.
    EvidenceChanged {
        timestamp: DateTime<Utc>,
        plan_id: PlanId,
        field: String,
        cleared: bool,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as one JSON line, and flushes. Serialization and
/// I/O failures are dropped: a broken event sink never fails a transition.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter appending to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
