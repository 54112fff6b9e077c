//! Core domain models for the authority layer.
//!
//! These are the value types callers serialize into account data. The trust
//! scalar itself lives in the external power-levels state object; models
//! here only mirror it.

pub mod member;
pub mod role;

pub use member::*;
pub use role::*;
