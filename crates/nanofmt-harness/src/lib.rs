//! Conformance testing harness for nanofmt.
//!
//! This crate provides:
//! - Fixture loading: JSON cases pairing a format and arguments with expected output
//! - Verification: run the engine against fixtures and compare output and return value
//! - Reporting: markdown and JSON conformance reports with fixture digests
//! - Structured logging: JSONL records for every verified case

#![forbid(unsafe_code)]

pub mod diff;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
