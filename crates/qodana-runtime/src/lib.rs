//! # qodana-runtime
//!
//! The boundary to the outside world: launching the container runtime and
//! removing the results directory. Both sit behind traits so the task graph
//! can be driven by fakes in tests.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cleaner;
pub mod executor;

pub use cleaner::{FsResultsCleaner, ResultsCleaner};
pub use executor::{DockerCli, ProcessExecutor, ProcessOutput};
