//! Shared types for suite lifecycle coordination
//!
//! Contains the types that cross the boundary between the lifecycle library,
//! the runner binary and anything reporting on a suite: test descriptions,
//! failures, outcomes and the final run summary.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
