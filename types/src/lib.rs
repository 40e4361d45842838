//! Core domain types for Nebula.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod action;
mod defaults;
mod ids;
mod model;
mod secret;

pub use action::PendingAction;
pub use defaults::default_categories;
pub use ids::{CategoryId, LinkId};
pub use model::{AppState, Category, DEFAULT_LOGO_TEXT, Link};
pub use secret::Secret;
