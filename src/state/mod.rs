//! Research session state shared between the agent and the UI.
//!
//! [`ResearchState`] is the single source of truth for a research session.
//! The agent sends it as JSON (possibly partial, possibly with fields this
//! crate has never heard of), so every field is optional and unknown fields
//! are carried through opaquely.

mod section;
mod streaming;

pub use section::Section;
pub use streaming::streaming_section;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress status of an agent log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    #[default]
    Processing,
    Done,
    Error,
}

/// One agent progress log line, shown in the chat panel during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunLog {
    pub message: String,
    pub status: LogStatus,
}

impl RunLog {
    /// Create a log entry in the `processing` state.
    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: LogStatus::Processing,
        }
    }

    /// Mark this entry as done.
    pub fn finish(&mut self) {
        self.status = LogStatus::Done;
    }
}

/// Top-level state of a research session.
///
/// Replaced wholesale (or through an updater closure) on every agent update;
/// consumers never mutate it in place. `Default` is the uninitialized marker,
/// distinguishable from "has data" via [`ResearchState::is_empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResearchState {
    /// Report title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Proposed report structure awaiting user approval (agent-defined shape).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal: Option<Value>,

    /// Approved outline (agent-defined shape).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Value>,

    /// Report sections in document order. Absent until the agent writes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,

    /// Agent progress logs, append-only from the agent's perspective.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<RunLog>,

    /// Collected footnotes for the report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnotes: Option<String>,

    /// Source metadata keyed by URL (agent-defined shape).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Value>,

    /// Any other agent-defined fields, passed through untouched so a
    /// snapshot round-trip never drops data.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ResearchState {
    /// True for the uninitialized marker: no field has ever been set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.proposal.is_none()
            && self.outline.is_none()
            && self.sections.is_none()
            && self.logs.is_empty()
            && self.footnotes.is_none()
            && self.sources.is_none()
            && self.extra.is_empty()
    }

    /// Sections in document order; a missing `sections` field is an empty
    /// sequence.
    pub fn sections(&self) -> &[Section] {
        self.sections.as_deref().unwrap_or_default()
    }

    /// Parse a serialized state, treating malformed data as absent.
    ///
    /// Used when loading the durable snapshot: stored garbage must yield an
    /// empty session, never an error.
    pub fn from_json_lenient(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
