//! # Grainbox
//!
//! Headless driver for the falling-sand sandbox: layered configuration,
//! a command-driven session with brush and pause state, RON scripts, a
//! random-spawn stress mode with frame-rate statistics, and PNG snapshots.

pub mod config;
pub mod script;
pub mod session;
pub mod snapshot;
pub mod stress;

pub use config::GrainboxConfig;
pub use script::{Script, ScriptStep};
pub use session::{BrushSettings, Command, PaintSpec, RunSummary, Session};
