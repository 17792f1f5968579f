#![forbid(unsafe_code)]
//! sortmerge-core: rows, join keys, schemas, configuration, manifests and
//! hashing shared by every other sortmerge crate.
//!
//! Pure data only. Right-side stores live in `sortmerge-io`, the join state
//! machine in `sortmerge-operators`.

pub mod config;
pub mod error;
pub mod hash;
pub mod key;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

/// Engine version recorded in manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
