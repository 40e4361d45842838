//! Shared infrastructure utilities for Nebula.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename) used by
//!   the on-disk local cache.

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, PersistMode, atomic_write, atomic_write_with_options,
    remove_if_exists,
};
