//! Derivation of the section the agent is currently writing.

use super::{ResearchState, Section};

/// Pick the section currently being streamed by the agent, if any.
///
/// Recomputed on every state change, so this stays O(sections) and borrows
/// rather than clones. Among incomplete sections the most recently updated
/// wins; absent or equal timestamps fall back to the latest position in
/// document order. Returns `None` when every section is complete, when there
/// are no sections, or when the agent never sent a `sections` field.
pub fn streaming_section(state: &ResearchState) -> Option<&Section> {
    let mut current: Option<&Section> = None;
    for section in state.sections() {
        if section.complete {
            continue;
        }
        match current {
            Some(best) if best.updated_at > section.updated_at => {}
            _ => current = Some(section),
        }
    }
    current
}
