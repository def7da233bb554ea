//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `features.rs`: typed feature schema and patient projection.
//! - `inference.rs`: classifier evaluation and risk labelling.
//! - `artifact.rs`: artifact load/validation and the load-once cache.
//! - `assessment.rs`: validate/transform/predict pipeline and its wording.
//! - `session.rs`: interactive form loop.
//! - `dataset.rs`: CSV loading and summary tables.
//! - `config.rs`: config file and path resolution.
//! - `logging.rs`: tracing subscriber setup.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod artifact;
pub mod assessment;
pub mod config;
pub mod dataset;
pub mod features;
pub mod inference;
pub mod logging;
pub mod output;
pub mod session;
