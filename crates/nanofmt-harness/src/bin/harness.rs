//! CLI entrypoint for the nanofmt conformance harness.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use nanofmt_harness::fixtures::{FixtureArg, FixtureCase, load_fixture_dir};
use nanofmt_harness::report::{self, FixtureDigest};
use nanofmt_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};
use nanofmt_harness::{ConformanceReport, HarnessError, TestRunner, VerificationSummary};

/// Conformance tooling for nanofmt.
#[derive(Debug, Parser)]
#[command(name = "nanofmt-harness")]
#[command(about = "Conformance testing harness for nanofmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown); a `.json` sibling is written too.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print the JSON report to stdout.
        #[arg(long)]
        json: bool,
        /// Write one JSONL record per case to this path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Format once and print the output and return value.
    Render {
        /// Format string.
        format: String,
        /// Arguments as `<kind>:<value>` (i u c f s p) or `n`.
        args: Vec<String>,
        /// Destination buffer size; sized to fit when omitted.
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Parse one directive and print what the parser sees.
    Parse {
        /// Directive text, starting at '%'.
        directive: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            json,
            log,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let sets = load_fixture_dir(&fixture)?;
            let runner = TestRunner::new("fixture-verify");
            let run_id = format!("{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, &runner.campaign, &run_id)?),
                None => None,
            };

            let started = Instant::now();
            let mut results = Vec::new();
            let mut skipped = 0;
            let mut digests = Vec::new();
            for (path, set) in &sets {
                digests.push(FixtureDigest::new(path, set)?);
                for case in set.cases.iter().filter(|case| !runner.supports(case)) {
                    skipped += 1;
                    if let Some(emitter) = emitter.as_mut() {
                        emitter.emit_entry(
                            LogEntry::new("", LogLevel::Info, "case_skipped")
                                .with_stream(StreamKind::Conformance)
                                .with_family(&set.family)
                                .with_case(&case.name, &case.format)
                                .with_outcome(Outcome::Skip)
                                .with_details(serde_json::json!({ "requires": case.requires })),
                        )?;
                    }
                }

                let set_results = runner.run(set);
                if let Some(emitter) = emitter.as_mut() {
                    for (result, case) in set_results
                        .iter()
                        .zip(set.cases.iter().filter(|case| runner.supports(case)))
                    {
                        let (level, outcome) = if result.passed {
                            (LogLevel::Info, Outcome::Pass)
                        } else {
                            (LogLevel::Error, Outcome::Fail)
                        };
                        emitter.emit_entry(
                            LogEntry::new("", level, "case_result")
                                .with_stream(StreamKind::Conformance)
                                .with_family(&set.family)
                                .with_case(&result.case_name, &case.format)
                                .with_outcome(outcome)
                                .with_comparison(&result.expected, &result.actual)
                                .with_returned(result.actual_return)
                                .with_artifacts(vec![path.display().to_string()]),
                        )?;
                    }
                }
                results.extend(set_results);
            }

            let summary = VerificationSummary::from_results(results, skipped);
            let report_doc = ConformanceReport {
                title: String::from("nanofmt Conformance Report"),
                features: report::enabled_features(),
                timestamp: nanofmt_harness::structured_log::now_utc(),
                fixtures: digests,
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}, skipped={}",
                report_doc.summary.total,
                report_doc.summary.passed,
                report_doc.summary.failed,
                report_doc.summary.skipped
            );

            if let Some(emitter) = emitter.as_mut() {
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "run_complete")
                        .with_stream(StreamKind::Conformance)
                        .with_duration_ms(elapsed)
                        .with_details(serde_json::json!({
                            "total": report_doc.summary.total,
                            "passed": report_doc.summary.passed,
                            "failed": report_doc.summary.failed,
                            "skipped": report_doc.summary.skipped,
                        })),
                )?;
                emitter.flush()?;
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                if let Some(parent) = report_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&report_path, report_doc.to_markdown())?;
                std::fs::write(report_path.with_extension("json"), report_doc.to_json())?;
            }
            if json {
                println!("{}", report_doc.to_json());
            }

            if !report_doc.summary.all_passed() {
                for failure in report_doc.summary.failures() {
                    eprintln!(
                        "FAIL {}\n{}",
                        failure.case_name,
                        failure.diff.as_deref().unwrap_or_default()
                    );
                }
                return Err(HarnessError::VerificationFailed {
                    failed: report_doc.summary.failed,
                    total: report_doc.summary.total,
                }
                .into());
            }
        }
        Command::Render {
            format,
            args,
            capacity,
        } => {
            let args = args
                .iter()
                .map(|raw| raw.parse::<FixtureArg>())
                .collect::<Result<Vec<_>, _>>()?;
            let case = FixtureCase {
                name: String::from("cli"),
                section: String::new(),
                format,
                args,
                capacity,
                expected_output: String::new(),
                expected_return: None,
                requires: Vec::new(),
            };
            let run = nanofmt_harness::runner::execute_case(&case);
            println!("{}", run.output);
            eprintln!("returned={}", run.returned);
        }
        Command::Parse { directive } => match nanofmt_core::parse_format_spec(directive.as_bytes())
        {
            Some((spec, consumed)) => {
                println!("{spec:#?}");
                eprintln!("consumed={consumed}");
            }
            None => {
                return Err(format!("'{directive}' is not a valid directive").into());
            }
        },
    }

    Ok(())
}
