//! Build orchestration.
//!
//! - [`state`] - per-run build state and work directory setup
//! - [`plan`] - dependency-first build ordering
//! - [`args`] - compiler argument assembly
//! - [`process`] - compiler invocation
//! - `core` - executes a plan, builds each package at most once, JIT runs

pub mod args;
mod clean;
mod core;
mod feedback;
pub mod plan;
pub mod process;
pub mod state;

pub use clean::clean;
pub use self::core::{BuildOutcome, build, build_root, run_jit};
pub use feedback::FeedbackAnalyzer;
pub use state::{BuildState, InitOptions};
