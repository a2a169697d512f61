//! # qodana-tasks
//!
//! The four inspection tasks and the graph that orders them.
//!
//! - **Kind**: task identities, registered names, and descriptions.
//! - **Task**: per-task settings, wired to the extension and to each other
//!   through conventions at registration time.
//! - **Lifecycle**: the container state implied by task outcomes.
//! - **Graph**: dependency edges, `only_if` predicates, and sequential
//!   execution against a [`ProcessExecutor`](qodana_runtime::ProcessExecutor).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod graph;
pub mod kind;
pub mod lifecycle;
pub mod outcome;
pub mod task;

pub use graph::TaskGraph;
pub use kind::TaskKind;
pub use lifecycle::ContainerLifecycle;
pub use outcome::{PlannedTask, TaskAction, TaskOutcome, TaskReport};
