//! Output formatting for JSON and text modes
//!
//! One record is printed per checked manifest, either as a JSON object per line
//! or as a human-readable status line followed by its findings.

use serde::Serialize;
use yorkshire::{Detection, Finding, ManifestKind};

/// Result of checking one manifest
#[derive(Debug, Serialize)]
pub struct DetectResult<'a> {
    pub path: &'a str,
    pub kind: ManifestKind,
    pub okay: bool,
    #[serde(skip_serializing_if = "no_findings")]
    pub findings: &'a [Finding],
}

fn no_findings(findings: &&[Finding]) -> bool {
    findings.is_empty()
}

/// A manifest that could not be checked
#[derive(Debug, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

impl<'a> DetectResult<'a> {
    pub fn new(detection: &'a Detection) -> Self {
        Self {
            path: &detection.id,
            kind: detection.report.kind,
            okay: detection.verdict(),
            findings: &detection.report.findings,
        }
    }
}

pub fn print_detection(detection: &Detection, json: bool) {
    let result = DetectResult::new(detection);
    if json {
        print_json(&result);
        return;
    }

    let status = if result.okay { "OK" } else { "FAIL" };
    println!("{} {}", status, result.path);
    for finding in result.findings {
        println!("  {}", finding);
    }
}

pub fn print_error(err: &yorkshire::DetectError, json: bool) {
    if json {
        print_json(&ErrorResult {
            error: err.to_string(),
        });
    } else {
        eprintln!("Error: {}", err);
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}
