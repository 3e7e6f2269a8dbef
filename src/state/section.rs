//! Report section type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of generated report content.
///
/// Sections arrive from the agent incrementally: content grows across state
/// updates until the agent marks the section complete. Ids are unique within
/// a session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Section {
    /// Unique ID for this section.
    pub id: String,
    /// Position assigned by the approved outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<u32>,
    /// Section heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Markdown content, possibly partial while the agent is still writing.
    pub content: String,
    /// Per-section footnotes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Whether the agent has finished writing this section.
    pub complete: bool,
    /// When content last changed. Agent payloads may omit this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Section {
    /// Create an empty, in-progress section with a fresh UUID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Append streamed content and touch the update time.
    pub fn append(&mut self, text: &str) {
        self.content.push_str(text);
        self.updated_at = Some(Utc::now());
    }

    /// Mark the section as fully written.
    pub fn finish(&mut self) {
        self.complete = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section() {
        let section = Section::new("Background");
        assert!(!section.id.is_empty(), "ID should be generated");
        assert_eq!(section.title.as_deref(), Some("Background"));
        assert_eq!(section.content, "");
        assert!(!section.complete);
        assert!(section.updated_at.is_none());
    }

    #[test]
    fn test_append_accumulates_and_touches() {
        let mut section = Section::new("Findings");
        section.append("First ");
        section.append("draft");
        assert_eq!(section.content, "First draft");
        assert!(section.updated_at.is_some());
    }

    #[test]
    fn test_finish() {
        let mut section = Section::new("Summary");
        assert!(!section.complete);
        section.finish();
        assert!(section.complete);
    }

    #[test]
    fn test_sparse_agent_payload_parses() {
        // The agent only guarantees an id; everything else is optional.
        let section: Section = serde_json::from_str(r#"{"id":"a","content":"x"}"#).unwrap();
        assert_eq!(section.id, "a");
        assert_eq!(section.content, "x");
        assert!(!section.complete);
        assert!(section.idx.is_none());
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Section::new("A");
        let b = Section::new("B");
        assert_ne!(a.id, b.id);
    }
}
