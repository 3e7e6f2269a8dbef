//! Operator commands for inspecting and maintaining stored sessions.

use crate::db::SnapshotRepository;
use crate::state::{streaming_section, LogStatus, ResearchState};
use crate::store::SNAPSHOT_KEY;

/// How many trailing log entries `show` prints.
const LOG_TAIL: usize = 8;

fn load_state(repo: &SnapshotRepository) -> anyhow::Result<ResearchState> {
    let state = repo
        .get(SNAPSHOT_KEY)?
        .and_then(|raw| ResearchState::from_json_lenient(&raw))
        .unwrap_or_default();
    Ok(state)
}

/// Print a human summary of the stored research session.
pub fn show(repo: &SnapshotRepository) -> anyhow::Result<()> {
    let state = load_state(repo)?;

    if state.is_empty() {
        println!("  No stored research session.");
        return Ok(());
    }

    if let Some(title) = &state.title {
        println!("\n\x1b[1m📋 {}\x1b[0m\n", title);
    }

    let streaming_id = streaming_section(&state).map(|s| s.id.clone());
    for section in state.sections() {
        let marker = if Some(&section.id) == streaming_id.as_ref() {
            "✍️ "
        } else if section.complete {
            "✓"
        } else {
            "…"
        };
        println!(
            "  {} \x1b[1m{}\x1b[0m ({} chars)",
            marker,
            section.title.as_deref().unwrap_or(&section.id),
            section.content.chars().count()
        );
    }

    if !state.logs.is_empty() {
        println!("\n\x1b[2mRecent activity:\x1b[0m");
        let skip = state.logs.len().saturating_sub(LOG_TAIL);
        for log in &state.logs[skip..] {
            let marker = match log.status {
                LogStatus::Done => "✓",
                LogStatus::Processing => "⏳",
                LogStatus::Error => "✗",
            };
            println!("  {} {}", marker, log.message);
        }
    }
    println!();

    Ok(())
}

/// Dump the raw snapshot JSON to stdout.
pub fn export(repo: &SnapshotRepository) -> anyhow::Result<()> {
    match repo.get(SNAPSHOT_KEY)? {
        Some(raw) => println!("{raw}"),
        None => println!("null"),
    }
    Ok(())
}

/// Delete the stored snapshot.
pub fn clear(repo: &SnapshotRepository) -> anyhow::Result<()> {
    repo.delete(SNAPSHOT_KEY)?;
    println!("🗑️  Stored research session cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, SnapshotRepository) {
        let tmp = TempDir::new().unwrap();
        let db = Database::open_at(tmp.path().join("test.db")).unwrap();
        db.migrate().unwrap();
        (tmp, SnapshotRepository::new(db))
    }

    #[test]
    fn test_load_state_missing_snapshot() {
        let (_tmp, repo) = setup_repo();
        assert!(load_state(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_load_state_malformed_snapshot() {
        let (_tmp, repo) = setup_repo();
        repo.set(SNAPSHOT_KEY, "not json at all").unwrap();
        assert!(load_state(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_load_state_round_trip() {
        let (_tmp, repo) = setup_repo();
        repo.set(SNAPSHOT_KEY, r#"{"title":"Stored"}"#).unwrap();
        assert_eq!(
            load_state(&repo).unwrap().title.as_deref(),
            Some("Stored")
        );
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let (_tmp, repo) = setup_repo();
        repo.set(SNAPSHOT_KEY, r#"{"title":"Stored"}"#).unwrap();
        clear(&repo).unwrap();
        assert!(repo.get(SNAPSHOT_KEY).unwrap().is_none());
    }
}
