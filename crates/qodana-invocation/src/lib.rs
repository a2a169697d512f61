//! # qodana-invocation
//!
//! Side-effect-free construction of container runtime invocations.
//!
//! Task nodes resolve their settings into plain snapshots ([`settings`]);
//! the [`builder`] turns a snapshot into an [`Invocation`] that the runtime
//! layer can launch. Nothing here touches the container runtime.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod builder;
pub mod invocation;
pub mod settings;

pub use invocation::{ContainerAction, Invocation};
