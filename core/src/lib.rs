//! Mutation rules for Nebula.
//!
//! Pure, synchronous logic over the [`nebula_types`] model: the password
//! gate, the transformations it applies, drag reordering, import/export
//! validation and the read-only view helpers (filter, search, icons).
//! Nothing here performs IO.

pub mod errors;
pub mod filter;
pub mod gate;
pub mod icon;
pub mod mutate;
pub mod reorder;
pub mod search;
pub mod transfer;

pub use errors::{GateError, ImportError};
pub use filter::{filter_categories, is_drag_enabled};
pub use gate::{Confirmed, GateState, MutationGate};
pub use icon::{IconSource, resolve_category_icon, resolve_link_icon, resolve_symbol};
pub use mutate::{Applied, fresh_id};
pub use reorder::{DragMove, apply_drag, reorder};
pub use search::{SearchEngine, SearchTarget, UnknownEngine, route_query};
pub use transfer::{EXPORT_FILE_NAME, ImportPlan, export_categories, parse_import, validate_import};
