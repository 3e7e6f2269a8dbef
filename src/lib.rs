//! Dossier Library
//!
//! State core for an AI research-assistant UI. The agent backend is an
//! opaque producer of [`ResearchState`] JSON; the rendering layer is an
//! opaque consumer. This crate owns what sits between the two.
//!
//! ## Main Components
//!
//! - [`state`] - Research session state ([`ResearchState`], [`Section`],
//!   logs) and the streaming-section derivation
//! - [`store`] - Session store: reducer-style updates, subscriber
//!   notification, durable-snapshot reconciliation
//! - [`db`] - SQLite-backed snapshot persistence
//! - [`cli`] - Operator commands over stored sessions
//!
//! ## Quick Start
//!
//! ```ignore
//! use dossier::{ResearchStore, streaming_section};
//!
//! let store = ResearchStore::open()?;
//! let handle = store.handle();
//!
//! handle.update(|prev| merge_agent_delta(prev, delta))?;
//!
//! let state = handle.state()?;
//! if let Some(section) = streaming_section(&state) {
//!     render_live(section);
//! }
//! ```

pub mod cli;
pub mod db;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use db::{Database, DbError, MemoryStorage, SnapshotRepository, SnapshotStorage};
pub use state::{streaming_section, LogStatus, ResearchState, RunLog, Section};
pub use store::{
    Reconciliation, ResearchStore, StoreError, StoreEvent, StoreHandle, StoreWatcher, WatchError,
    SNAPSHOT_KEY,
};
