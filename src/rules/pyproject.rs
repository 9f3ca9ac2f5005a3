//! pyproject.toml: explicitly configured Poetry and PDM package sources

use super::RuleInput;
use crate::error::DetectError;
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};
use serde::Deserialize;

#[derive(Deserialize, Default)]
struct Pyproject {
    #[serde(default)]
    tool: Tool,
}

#[derive(Deserialize, Default)]
struct Tool {
    #[serde(default)]
    poetry: SourceTable,
    #[serde(default)]
    pdm: SourceTable,
}

#[derive(Deserialize, Default)]
struct SourceTable {
    #[serde(default)]
    source: Vec<IndexSource>,
}

/// A `[[tool.*.source]]` entry
#[derive(Deserialize)]
struct IndexSource {
    url: Option<String>,
}

pub(super) fn check(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::PyprojectToml;
    let content = input.read(kind)?;
    let doc: Pyproject = toml::from_str(&content).map_err(|e| input.parse_error(kind, e))?;

    let mut report = input.report(kind);
    let sections = [
        (SourceKind::PoetrySource, &doc.tool.poetry.source),
        (SourceKind::PdmSource, &doc.tool.pdm.source),
    ];

    for (source_kind, sources) in sections {
        let rejected: Vec<&IndexSource> = sources
            .iter()
            .filter(|s| !s.url.as_deref().is_some_and(|url| input.allow.allows(url)))
            .collect();
        if rejected.is_empty() {
            continue;
        }

        let urls: Vec<&str> = rejected
            .iter()
            .map(|s| s.url.as_deref().unwrap_or_default())
            .collect();
        tracing::warn!(
            "File {:?} uses an explicitly configured {}: {:?}",
            input.display,
            source_kind,
            urls
        );
        for url in urls {
            report.push(Finding::new(source_kind, url));
        }
    }

    Ok(report)
}
