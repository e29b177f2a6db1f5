//! Outbound (driven) adapters.

pub mod media;
pub mod persistence;
