//! # qodana-common
//!
//! Shared types, error definitions, and constants used across the
//! qodana-runner workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives (bindings, environment
//! parameters, canonical paths) that the resolver, builder, and task graph
//! are written against.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod constants;
pub mod error;
pub mod paths;
pub mod types;
