//! Join configuration that downstream crates can serialize/deserialize.
//!
//! Only immutable configuration lives here. In-flight cursor state is never
//! serialized: a join shipped to another process restarts its streams.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::hash_serde;
use crate::key::KeySpec;

/// Default initial capacity of the buffer holding one left key run.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// How the right side is advanced when a left run needs a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Plain sequential scan of the right side.
    #[default]
    Dense,
    /// Seek near the left key before scanning.
    Sparse,
}

impl FromStr for JoinMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "merge" => Ok(JoinMode::Dense),
            "sparse" | "merge-sparse" => Ok(JoinMode::Sparse),
            other => Err(Error::Config(format!("unknown join mode '{other}'"))),
        }
    }
}

/// Where the right side lives and how to bind it to this join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocator {
    /// Path or `file://` URL of the sorted store.
    pub location: String,

    /// Optional pre-built sparse index used to accelerate seeks.
    pub index_file: Option<String>,

    /// Context signature binding this source to one join instance.
    pub signature: Option<String>,
}

impl SourceLocator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            index_file: None,
            signature: None,
        }
    }

    pub fn with_index_file(mut self, index_file: impl Into<String>) -> Self {
        self.index_file = Some(index_file.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    pub mode: JoinMode,

    /// Key projection for left rows.
    pub left_key: KeySpec,

    /// Key projection for right rows, applied after any right-side transform.
    pub right_key: KeySpec,

    pub right: SourceLocator,

    /// Initial capacity of the left run buffer.
    pub buffer_capacity: usize,

    /// Explicit context signature; derived from the config hash when unset.
    pub signature: Option<String>,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            mode: JoinMode::Dense,
            left_key: KeySpec::default(),
            right_key: KeySpec::default(),
            right: SourceLocator::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            signature: None,
        }
    }
}

impl JoinConfig {
    pub fn new(left_key: KeySpec, right_key: KeySpec, right: SourceLocator) -> Self {
        Self {
            left_key,
            right_key,
            right,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: JoinMode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply environment overrides on top of this config.
    ///
    /// Environment variables:
    /// - `SORTMERGE_JOIN_MODE`: `dense` or `sparse`
    /// - `SORTMERGE_BUFFER_CAPACITY`: initial left run buffer capacity
    /// - `SORTMERGE_INDEX_FILE`: index file hint for the right side
    /// - `SORTMERGE_SIGNATURE`: explicit context signature
    pub fn from_env(self) -> Self {
        self.with_overrides(|k| std::env::var(k).ok())
    }

    /// Same as [`JoinConfig::from_env`] with an injectable lookup.
    /// Unparseable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(s) = lookup("SORTMERGE_JOIN_MODE") {
            if let Ok(mode) = s.parse::<JoinMode>() {
                self.mode = mode;
            }
        }

        if let Some(s) = lookup("SORTMERGE_BUFFER_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                self.buffer_capacity = v;
            }
        }

        if let Some(s) = lookup("SORTMERGE_INDEX_FILE") {
            self.right.index_file = Some(s);
        }

        if let Some(s) = lookup("SORTMERGE_SIGNATURE") {
            self.signature = Some(s);
        }

        self
    }

    /// Context signature for this join instance.
    pub fn signature(&self) -> Result<String> {
        match &self.signature {
            Some(sig) => Ok(sig.clone()),
            None => Ok(hash_serde(self)?.to_hex()),
        }
    }

    /// Right-side locator with the context signature filled in.
    pub fn bound_locator(&self) -> Result<SourceLocator> {
        let mut locator = self.right.clone();
        locator.signature = Some(self.signature()?);
        Ok(locator)
    }

    pub fn validate(&self) -> Result<()> {
        if self.left_key.fields.is_empty() || self.right_key.fields.is_empty() {
            return Err(Error::Config("join keys must name at least one column".into()));
        }
        if self.left_key.types() != self.right_key.types() {
            return Err(Error::Config(format!(
                "left key types {:?} do not match right key types {:?}",
                self.left_key.types(),
                self.right_key.types()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;
    use std::collections::HashMap;

    fn sample() -> JoinConfig {
        JoinConfig::new(
            KeySpec::column(0, DataType::Int64),
            KeySpec::column(1, DataType::Int64),
            SourceLocator::new("/data/right.csv"),
        )
    }

    #[test]
    fn overrides_apply_and_ignore_garbage() {
        let env: HashMap<&str, &str> = [
            ("SORTMERGE_JOIN_MODE", "sparse"),
            ("SORTMERGE_BUFFER_CAPACITY", "not-a-number"),
            ("SORTMERGE_INDEX_FILE", "/data/right.idx"),
        ]
        .into_iter()
        .collect();
        let cfg = sample().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.mode, JoinMode::Sparse);
        assert_eq!(cfg.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(cfg.right.index_file.as_deref(), Some("/data/right.idx"));
    }

    #[test]
    fn derived_signature_is_stable_and_explicit_wins() {
        let a = sample().signature().unwrap();
        let b = sample().signature().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sample().with_mode(JoinMode::Sparse).signature().unwrap());

        let mut cfg = sample();
        cfg.signature = Some("job-7".into());
        assert_eq!(cfg.bound_locator().unwrap().signature.as_deref(), Some("job-7"));
    }

    #[test]
    fn validate_rejects_mismatched_key_types() {
        let mut cfg = sample();
        assert!(cfg.validate().is_ok());
        cfg.right_key = KeySpec::column(1, DataType::Utf8);
        assert!(cfg.validate().is_err());
        cfg.right_key = KeySpec::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn join_mode_parses_aliases() {
        assert_eq!("merge-sparse".parse::<JoinMode>().unwrap(), JoinMode::Sparse);
        assert_eq!("Dense".parse::<JoinMode>().unwrap(), JoinMode::Dense);
        assert!("hash".parse::<JoinMode>().is_err());
    }
}
