//! # Residency Pulse Common Library
//!
//! Shared code for the pulse service:
//! - Barycentric transform for triad widgets
//! - Submission model and derived analysis
//! - Submission store with file, remote list and in-memory backends
//! - Ingestion pipeline
//! - CSV export and aggregate review views
//! - Configuration loading

pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod review;
pub mod store;
pub mod submission;
pub mod triad;

pub use error::{Error, Result};
pub use ingest::{IngestReceipt, Ingestor};
pub use store::{SharedStore, SubmissionStore};
pub use submission::Submission;
