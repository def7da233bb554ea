//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs`: predict/session/model.
//! - `info.rs`: insights/about.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod info;
pub mod runtime;

pub use info::handle_info_commands;
pub use runtime::handle_runtime_commands;
