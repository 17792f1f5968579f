//! Convenient re-exports for downstream crates.

pub use crate::config::{JoinConfig, JoinMode, SourceLocator};
pub use crate::error::{Error, Result};
pub use crate::key::{JoinKey, KeyField, KeySpec};
pub use crate::manifest::{JoinManifest, JoinStats};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Row, Scalar};
