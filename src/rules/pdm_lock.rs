//! pdm.lock: locked download URLs
//!
//! Locked files are pinned to exact download URLs rather than index roots, so the
//! allow-list does not apply here. Every recorded URL must point at PyPI's file
//! host.
//!
//! Two layouts are understood:
//! - legacy `[metadata.files]`: `"name version" = [{url = ..., hash = ...}]`
//! - current `[[package]]` tables with `files = [{url|file = ..., hash = ...}]`

use super::RuleInput;
use crate::error::DetectError;
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Prefix every locked download URL must start with
pub const PYPI_FILES_PREFIX: &str = "https://files.pythonhosted.org/";

#[derive(Deserialize, Default)]
struct PdmLock {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Deserialize, Default)]
struct Metadata {
    #[serde(default)]
    files: BTreeMap<String, Vec<FileEntry>>,
}

#[derive(Deserialize)]
struct LockedPackage {
    name: String,
    version: Option<String>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

/// A locked artifact; entries with only a `file` name have no download location.
#[derive(Deserialize)]
struct FileEntry {
    url: Option<String>,
}

pub(super) fn check(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::PdmLock;
    let content = input.read(kind)?;
    let doc: PdmLock = toml::from_str(&content).map_err(|e| input.parse_error(kind, e))?;

    let legacy = doc
        .metadata
        .files
        .iter()
        .map(|(name, files)| (name.clone(), files));
    let current = doc.package.iter().map(|pkg| {
        let name = match &pkg.version {
            Some(version) => format!("{} {}", pkg.name, version),
            None => pkg.name.clone(),
        };
        (name, &pkg.files)
    });

    let mut report = input.report(kind);
    for (package, files) in legacy.chain(current) {
        for url in files.iter().filter_map(|f| f.url.as_deref()) {
            if url.starts_with(PYPI_FILES_PREFIX) {
                continue;
            }
            tracing::warn!("Package {:?} is not consumed from PyPI: {}", package, url);
            report.push(Finding::new(SourceKind::LockedFile, url).with_package(package.clone()));
        }
    }

    Ok(report)
}
