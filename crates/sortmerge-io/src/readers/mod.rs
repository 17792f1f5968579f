//! Streaming row readers.
//!
//! Left inputs and right-side stores both decode typed rows from CSV, so the
//! record parser lives here and is shared.

pub mod csv;
