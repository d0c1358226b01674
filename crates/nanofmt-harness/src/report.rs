//! Report generation for conformance results.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;
use crate::fixtures::FixtureSet;
use crate::verify::VerificationSummary;

/// Identity of one fixture file that fed a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDigest {
    pub path: String,
    pub family: String,
    pub version: String,
    pub cases: usize,
    pub sha256: String,
}

impl FixtureDigest {
    /// Hash the file at `path` and record the set it parsed into.
    pub fn new(path: &Path, set: &FixtureSet) -> Result<Self, HarnessError> {
        Ok(Self {
            path: path.display().to_string(),
            family: set.family.clone(),
            version: set.version.clone(),
            cases: set.cases.len(),
            sha256: sha256_file(path)?,
        })
    }
}

/// A conformance report combining verification results and fixture provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Core features the harness was built with.
    pub features: Vec<String>,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Fixture files the results came from.
    pub fixtures: Vec<FixtureDigest>,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "- Features: {}", self.features.join(", "));
        let _ = writeln!(out, "- Timestamp: {}", self.timestamp);
        let _ = writeln!(out, "- Total: {}", self.summary.total);
        let _ = writeln!(out, "- Passed: {}", self.summary.passed);
        let _ = writeln!(out, "- Failed: {}", self.summary.failed);
        let _ = writeln!(out, "- Skipped: {}\n", self.summary.skipped);

        out.push_str("## Fixtures\n\n");
        out.push_str("| File | Family | Cases | SHA-256 |\n");
        out.push_str("|------|--------|-------|---------|\n");
        for f in &self.fixtures {
            let _ = writeln!(
                out,
                "| {} | {} | {} | `{}` |",
                f.path, f.family, f.cases, f.sha256
            );
        }

        out.push_str("\n## Results\n\n");
        out.push_str("| Case | Section | Status |\n");
        out.push_str("|------|---------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "| {} | {} | {} |", r.case_name, r.section, status);
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                let _ = writeln!(out, "\n### {}\n", r.case_name);
                let _ = writeln!(out, "```\n{}\n```", r.diff.as_deref().unwrap_or("(no diff)"));
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Features of the formatting engine compiled into this harness.
#[must_use]
pub fn enabled_features() -> Vec<String> {
    let mut features = Vec::new();
    if cfg!(feature = "float-specifiers") {
        features.push(String::from("float-specifiers"));
    }
    if cfg!(feature = "c99-specifiers") {
        features.push(String::from("c99-specifiers"));
    }
    features
}

/// Lowercase hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String, HarnessError> {
    let data = std::fs::read(path)?;
    Ok(hex_lower(&Sha256::digest(&data)))
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn result(name: &str, passed: bool) -> VerificationResult {
        VerificationResult {
            case_name: name.to_string(),
            section: String::from("C11 7.21.6.1"),
            passed,
            expected: String::from("1"),
            actual: String::from(if passed { "1" } else { "2" }),
            expected_return: Some(2),
            actual_return: 2,
            diff: (!passed).then(|| String::from("-1\n+2")),
        }
    }

    #[test]
    fn markdown_lists_results_and_failures() {
        let report = ConformanceReport {
            title: String::from("nanofmt Conformance Report"),
            features: enabled_features(),
            timestamp: String::from("2026-01-01T00:00:00.000Z"),
            fixtures: vec![FixtureDigest {
                path: String::from("printf_core.v1.json"),
                family: String::from("stdio/printf"),
                version: String::from("v1"),
                cases: 2,
                sha256: String::from("00ff"),
            }],
            summary: VerificationSummary::from_results(
                vec![result("ok", true), result("broken", false)],
                1,
            ),
        };
        let md = report.to_markdown();
        assert!(md.contains("- Failed: 1"));
        assert!(md.contains("- Skipped: 1"));
        assert!(md.contains("| ok | C11 7.21.6.1 | PASS |"));
        assert!(md.contains("### broken"));
        assert!(md.contains("`00ff`"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["summary"]["passed"], 1);
    }

    #[test]
    fn hex_digest_of_known_input() {
        assert_eq!(
            hex_lower(&Sha256::digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
