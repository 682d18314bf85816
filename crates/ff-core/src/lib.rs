//! ff-core: stable foundation for fickflow.
//!
//! Contains:
//! - numeric (Real + validation and sampling helpers)
//! - error (shared error types)
//! - timing (opt-in solve timers)

pub mod error;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FfError, FfResult};
pub use numeric::*;
pub use timing::Timer;
