//! Concrete music asset/player implementations.
//!
//! - [`memory`] - records commands without producing sound (always available)
//! - [`rodio`] - real output through rodio (`streaming` feature)

pub mod memory;

#[cfg(feature = "streaming")]
pub mod rodio;
