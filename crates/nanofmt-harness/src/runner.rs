//! Test execution engine.

use std::cell::Cell;

use nanofmt_core::{Counter, FormatArg, format_to_buffer, format_to_sink};

use crate::diff;
use crate::fixtures::{FixtureArg, FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// What one fixture case produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// Buffer text up to the first NUL, followed by `|n=<v>` per `%n` target.
    pub output: String,
    /// Value returned by `format_to_buffer`.
    pub returned: usize,
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Whether the features a case requires are compiled in.
    #[must_use]
    pub fn supports(&self, case: &FixtureCase) -> bool {
        case.requires.iter().all(|feature| feature_enabled(feature))
    }

    /// Run all supported fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .filter(|case| self.supports(case))
            .map(verify_case)
            .collect()
    }
}

fn feature_enabled(feature: &str) -> bool {
    match feature {
        "float-specifiers" => cfg!(feature = "float-specifiers"),
        "c99-specifiers" => cfg!(feature = "c99-specifiers"),
        _ => false,
    }
}

fn verify_case(case: &FixtureCase) -> VerificationResult {
    let run = execute_case(case);
    let output_ok = run.output == case.expected_output;
    let return_ok = case.expected_return.is_none_or(|r| r == run.returned);

    let mut notes = Vec::new();
    if !output_ok {
        notes.push(diff::render_diff(&case.expected_output, &run.output));
    }
    if let Some(expected) = case.expected_return
        && !return_ok
    {
        notes.push(format!(
            "return value mismatch: expected={expected}, actual={}",
            run.returned
        ));
    }

    VerificationResult {
        case_name: case.name.clone(),
        section: case.section.clone(),
        passed: output_ok && return_ok,
        expected: case.expected_output.clone(),
        actual: run.output,
        expected_return: case.expected_return,
        actual_return: run.returned,
        diff: (!notes.is_empty()).then(|| notes.join("\n")),
    }
}

/// Format one case into a buffer of its declared capacity, or one sized by
/// a counting pass when none is declared.
#[must_use]
pub fn execute_case(case: &FixtureCase) -> CaseRun {
    let cells: Vec<Cell<usize>> = case.args.iter().map(|_| Cell::new(0)).collect();
    let args: Vec<FormatArg<'_>> = case
        .args
        .iter()
        .zip(&cells)
        .map(|(arg, cell)| arg.as_format_arg(cell))
        .collect();
    let fmt = case.format.as_bytes();

    let capacity = case.capacity.unwrap_or_else(|| {
        let mut counter = Counter::default();
        format_to_sink(&mut counter, fmt, &args)
    });
    let mut buf = vec![0u8; capacity];
    let returned = format_to_buffer(&mut buf, fmt, &args);

    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let mut output = String::from_utf8_lossy(&buf[..end]).into_owned();
    for (arg, cell) in case.args.iter().zip(&cells) {
        if matches!(arg, FixtureArg::Count) {
            output.push_str(&format!("|n={}", cell.get()));
        }
    }

    CaseRun { output, returned }
}
