//! Dashboard engine for Nebula.
//!
//! Owns the live [`AppState`](nebula_types::AppState) and routes every change
//! through the rules in [`nebula_core`], then hands snapshots to the
//! [`PersistenceCoordinator`] for debounced write-behind.
//!
//! Startup order: [`load_initial_state`] picks remote, cache or defaults;
//! only then is the coordinator spawned, so the loaded state is never echoed
//! back to storage.

mod dashboard;
mod load;
mod persistence;
mod session;

pub use dashboard::Dashboard;
pub use load::{LoadSource, LoadedState, load_initial_state};
pub use persistence::{FlushReport, PersistenceCoordinator};
pub use session::{Session, SessionError, Tiers, open, start};

pub use nebula_core;
pub use nebula_storage;
pub use nebula_types;
