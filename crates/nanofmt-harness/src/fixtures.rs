//! Fixture loading and management.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use nanofmt_core::FormatArg;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// One argument of a fixture case, in JSON form.
///
/// Serialized externally tagged: `{"int": -5}`, `{"str": "abc"}`, `"count"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureArg {
    Int(i64),
    Uint(u64),
    Char(u8),
    Float(f64),
    /// Raw IEEE-754 bits, for values JSON cannot spell (inf, nan, -0.0).
    FloatBits(u64),
    Str(String),
    Ptr(usize),
    /// `%n` target; the stored count is appended to the actual output.
    Count,
}

impl FixtureArg {
    /// Borrow as an engine argument. `cell` backs a `Count` slot.
    #[must_use]
    pub fn as_format_arg<'a>(&'a self, cell: &'a Cell<usize>) -> FormatArg<'a> {
        match self {
            Self::Int(v) => FormatArg::Int(*v),
            Self::Uint(v) => FormatArg::Uint(*v),
            Self::Char(c) => FormatArg::Char(*c),
            Self::Float(v) => FormatArg::Float(*v),
            Self::FloatBits(bits) => FormatArg::Float(f64::from_bits(*bits)),
            Self::Str(s) => FormatArg::Str(s.as_bytes()),
            Self::Ptr(p) => FormatArg::Ptr(*p),
            Self::Count => FormatArg::Count(cell),
        }
    }
}

/// Command-line form: `i:-5`, `u:0xff`, `c:A`, `f:1.5`, `s:text`, `p:0x1000`, `n`.
impl FromStr for FixtureArg {
    type Err = HarnessError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || HarnessError::InvalidArg(raw.to_string());
        if raw == "n" {
            return Ok(Self::Count);
        }
        let (kind, value) = raw.split_once(':').ok_or_else(invalid)?;
        let arg = match kind {
            "i" => Self::Int(parse_signed(value).ok_or_else(invalid)?),
            "u" => Self::Uint(parse_unsigned(value).ok_or_else(invalid)?),
            "c" => Self::Char(*value.as_bytes().first().ok_or_else(invalid)?),
            "f" => Self::Float(value.parse().map_err(|_| invalid())?),
            "s" => Self::Str(value.to_string()),
            "p" => Self::Ptr(parse_unsigned(value).ok_or_else(invalid)? as usize),
            _ => return Err(invalid()),
        };
        Ok(arg)
    }
}

fn parse_unsigned(raw: &str) -> Option<u64> {
    let s = raw.trim().replace('_', "");
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_signed(raw: &str) -> Option<i64> {
    match raw.trim().strip_prefix('-') {
        Some(rest) => {
            let magnitude = parse_unsigned(rest)?;
            0i64.checked_sub_unsigned(magnitude)
        }
        None => parse_unsigned(raw).and_then(|v| i64::try_from(v).ok()),
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// C standard section the behavior comes from.
    #[serde(default)]
    pub section: String,
    /// Format string handed to the engine.
    pub format: String,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Destination buffer size; sized to fit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    /// Buffer contents up to the first NUL, then `|n=<v>` per `%n` target.
    pub expected_output: String,
    /// Expected return value (would-be length including the NUL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<usize>,
    /// Cargo features of `nanofmt-core` the case depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

/// A collection of fixture cases for a conversion family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Conversion family name.
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|source| HarnessError::Fixture {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load every `*.json` fixture set in `dir`, sorted by path.
pub fn load_fixture_dir(dir: &Path) -> Result<Vec<(PathBuf, FixtureSet)>, HarnessError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(HarnessError::NoFixtures(dir.to_path_buf()));
    }

    paths
        .into_iter()
        .map(|path| {
            let set = FixtureSet::from_file(&path)?;
            Ok((path, set))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_args() {
        assert_eq!("i:-5".parse::<FixtureArg>().unwrap(), FixtureArg::Int(-5));
        assert_eq!(
            "i:-9223372036854775808".parse::<FixtureArg>().unwrap(),
            FixtureArg::Int(i64::MIN)
        );
        assert_eq!("u:0xff".parse::<FixtureArg>().unwrap(), FixtureArg::Uint(255));
        assert_eq!("c:A".parse::<FixtureArg>().unwrap(), FixtureArg::Char(b'A'));
        assert_eq!("f:1.5".parse::<FixtureArg>().unwrap(), FixtureArg::Float(1.5));
        assert_eq!(
            "s:a:b".parse::<FixtureArg>().unwrap(),
            FixtureArg::Str(String::from("a:b"))
        );
        assert_eq!("p:0x1000".parse::<FixtureArg>().unwrap(), FixtureArg::Ptr(0x1000));
        assert_eq!("n".parse::<FixtureArg>().unwrap(), FixtureArg::Count);
    }

    #[test]
    fn rejects_bad_cli_args() {
        for raw in ["", "x:1", "i", "i:abc", "c:", "u:-1", "i:9223372036854775808"] {
            assert!(
                matches!(raw.parse::<FixtureArg>(), Err(HarnessError::InvalidArg(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn fixture_args_use_tagged_json() {
        let args: Vec<FixtureArg> = serde_json::from_str(
            r#"[{"int":-1},{"uint":2},{"char":65},{"float":0.5},{"float_bits":9218868437227405312},{"str":"s"},{"ptr":16},"count"]"#,
        )
        .expect("valid args json");
        assert_eq!(args.len(), 8);
        assert_eq!(args[4], FixtureArg::FloatBits(f64::INFINITY.to_bits()));
        assert_eq!(args[7], FixtureArg::Count);
    }

    #[test]
    fn case_defaults() {
        let set = FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"stdio/printf",
                "captured_at":"2026-01-01T00:00:00Z",
                "cases":[{"name":"literal","format":"abc","expected_output":"abc"}]
            }"#,
        )
        .expect("valid fixture json");
        let case = &set.cases[0];
        assert!(case.args.is_empty());
        assert!(case.capacity.is_none());
        assert!(case.expected_return.is_none());
        assert!(case.requires.is_empty());
        assert_eq!(case.section, "");
    }
}
