//! Submit form data to the document generator and stage the returned PDF.
//!
//! # Features
//!
//! - Structured JSON (`global`, `month`, optional `sort`/`validate` flags) and
//!   raw form-data request bodies
//! - Fail-fast JSON parsing of the `global` and `month` fields, before any
//!   request is sent
//! - Status display abstraction with in-progress/success/error states
//! - Pluggable artifact sinks (directory, stdout)
//! - Request tokens so that only the newest trigger drives visible state
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use abzdok_core::submit::{
//!     DirectorySink, FormPayload, MemoryStatus, SubmitAndDownload, SubmitClient, Variant,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SubmitClient::new("http://127.0.0.1:8080/")?;
//! let status = Arc::new(MemoryStatus::new());
//! let submit = SubmitAndDownload::new(
//!     client,
//!     Variant::Structured,
//!     status.clone(),
//!     Arc::new(DirectorySink::new(".")),
//! );
//!
//! let form = FormPayload::new()
//!     .with("global", std::fs::read_to_string("Global.json")?)
//!     .with("month", std::fs::read_to_string("Month.json")?)
//!     .with("sort", "true");
//! submit.trigger(&form).await;
//! println!("{}", status.message());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
pub mod payload;
mod sink;
pub mod status;

pub use client::SubmitClient;
pub use engine::{SubmitAndDownload, SubmitOutcome};
pub use error::SubmitError;
pub use payload::{FormPayload, RequestBody, Variant};
pub use sink::{ArtifactLocation, ArtifactSink, DirectorySink, ResponseArtifact, StdoutSink};
pub use status::{MemoryStatus, StatusDisplay, StatusKind, StatusSnapshot, failure_message};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, SubmitError>` explicitly in function signatures.
