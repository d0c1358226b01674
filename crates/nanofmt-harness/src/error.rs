//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
    #[error("invalid argument '{0}': expected <kind>:<value> with kind one of i u c f s p, or n")]
    InvalidArg(String),
    #[error("conformance verification failed: {failed} of {total} cases")]
    VerificationFailed { failed: usize, total: usize },
}
