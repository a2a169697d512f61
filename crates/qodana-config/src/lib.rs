//! # qodana-config
//!
//! Configuration resolution for the inspection tasks.
//!
//! - **Property**: an explicit-override slot plus a lazily evaluated
//!   convention, possibly reading another task's property.
//! - **Extension**: the project-wide `qodana` block and its defaults.
//! - **Settings**: the YAML settings file and command-line layers that are
//!   merged on top of the defaults.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod extension;
pub mod property;
pub mod settings;

pub use extension::QodanaExtension;
pub use property::{Property, Provider};
