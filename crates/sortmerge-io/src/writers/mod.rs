//! Streaming writers for joined rows.

pub mod csv;
pub mod jsonl;
