//! Abzdok Core Library
//!
//! This library provides the client side of the Arbeitszeitdokumentation
//! generator: it turns time sheet data (a `Global.json`/`Month.json` pair or
//! plain form fields) into a request, posts it to the generator server and
//! stages the returned PDF.
//!
//! # Architecture
//!
//! - [`submit`] - request body construction, HTTP client, status display,
//!   artifact sinks and the [`SubmitAndDownload`] component tying them together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod submit;
mod user_agent;

// Re-export commonly used types
pub use submit::{
    ArtifactLocation, ArtifactSink, DirectorySink, FormPayload, MemoryStatus, RequestBody,
    StatusDisplay, StatusKind, StdoutSink, SubmitAndDownload, SubmitClient, SubmitError,
    SubmitOutcome, Variant,
};
