//! # commune-common
//!
//! Shared types, configuration, error handling, and permission primitives
//! for the Commune authority layer. This is the foundation crate — pure
//! data and total functions, no remote calls.

pub mod catalog;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod permissions;
pub mod validation;
