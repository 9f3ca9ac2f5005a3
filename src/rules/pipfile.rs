//! Pipfile and Pipfile.lock: declared package indexes
//!
//! pipenv always records at least one index, so a single source is tolerated when
//! no allow-list is given. With an allow-list every source must be on it.

use super::RuleInput;
use crate::allow_list::AllowList;
use crate::error::DetectError;
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};
use serde::Deserialize;

#[derive(Deserialize)]
struct Pipfile {
    #[serde(default)]
    source: Vec<PackageIndex>,
}

#[derive(Deserialize)]
struct PipfileLock {
    #[serde(rename = "_meta")]
    meta: LockMeta,
}

#[derive(Deserialize)]
struct LockMeta {
    #[serde(default)]
    sources: Vec<PackageIndex>,
}

#[derive(Deserialize)]
struct PackageIndex {
    url: Option<String>,
}

pub(super) fn check_pipfile(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::Pipfile;
    let content = input.read(kind)?;
    let doc: Pipfile = toml::from_str(&content).map_err(|e| input.parse_error(kind, e))?;
    Ok(check_sources(input, kind, &doc.source))
}

pub(super) fn check_pipfile_lock(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::PipfileLock;
    let content = input.read(kind)?;
    let doc: PipfileLock =
        serde_json::from_str(&content).map_err(|e| input.parse_error(kind, e))?;
    Ok(check_sources(input, kind, &doc.meta.sources))
}

fn check_sources(input: &RuleInput<'_>, kind: ManifestKind, sources: &[PackageIndex]) -> Report {
    let mut report = input.report(kind);
    let unexpected = unexpected_sources(sources, input.allow);
    if unexpected.is_empty() {
        return report;
    }

    tracing::warn!(
        "File {:?} states one or multiple Python package indexes: {:?}",
        input.display,
        unexpected
    );
    for url in unexpected {
        report.push(Finding::new(SourceKind::PipfileSource, url));
    }
    report
}

fn unexpected_sources<'a>(sources: &'a [PackageIndex], allow: &AllowList) -> Vec<&'a str> {
    let url = |s: &'a PackageIndex| s.url.as_deref().unwrap_or_default();

    if allow.is_empty() {
        if sources.len() > 1 {
            return sources.iter().map(url).collect();
        }
        return Vec::new();
    }

    sources
        .iter()
        .filter(|s| !s.url.as_deref().is_some_and(|u| allow.allows(u)))
        .map(url)
        .collect()
}
