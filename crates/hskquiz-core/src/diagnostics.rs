//! Structured diagnostics for degraded-but-recoverable paths.
//!
//! The quiz flow never halts when vocabulary or assets run short; the engine
//! records what was degraded here so tests and operators can detect silent
//! quality loss without scraping log output.

use std::sync::Mutex;

use serde::Serialize;

/// One degraded-operation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// A vocabulary set could not fill the requested round count.
    QuestionShortfall {
        set: String,
        requested: usize,
        available: usize,
    },
    /// A level's own set could not supply enough unique distractor glosses,
    /// forcing escalation to the whole store.
    DistractorShortfall { needed: usize, found: usize },
    /// Placeholder strings were used to fill a choice set. A correctly
    /// populated vocabulary configuration never reaches this.
    ChoicePadding { placeholders: usize },
    /// A reward folder could not be enumerated; treated as zero candidates.
    AssetResolutionFailed { folder: String, reason: String },
}

/// Receiver for diagnostic events, distinct from the player-facing output.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Sink that discards every event.
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _: DiagnosticEvent) {}
}

/// Sink that keeps events in memory, for tests and diagnostics tooling.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record(DiagnosticEvent::ChoicePadding { placeholders: 1 });
        sink.record(DiagnosticEvent::QuestionShortfall {
            set: "hsk1".into(),
            requested: 5,
            available: 3,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            DiagnosticEvent::ChoicePadding { placeholders: 1 }
        );
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_string(&DiagnosticEvent::DistractorShortfall {
            needed: 3,
            found: 1,
        })
        .unwrap();
        assert!(json.contains(r#""kind":"distractor_shortfall""#));
    }
}
