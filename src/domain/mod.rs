//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `patient.rs`: typed patient input with its bounds.
//! - `models.rs`: config, report and output structs.
//! - `errors.rs`: error taxonomy and JSON error codes.
//! - `constants.rs`: default paths, bounds and dataset conventions.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod constants;
pub mod errors;
pub mod models;
pub mod patient;
