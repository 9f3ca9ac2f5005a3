//! setup.cfg: `options.dependency_links`
//!
//! The raw option value is compared against the allow-list as a whole. A value
//! listing several URLs only passes when that exact multi-line string is
//! allow-listed.

use super::RuleInput;
use crate::error::DetectError;
use crate::ini::Ini;
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};

pub(super) fn check(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::SetupCfg;
    let content = input.read(kind)?;
    let config = Ini::parse(&content).map_err(|e| input.parse_error(kind, e))?;

    let mut report = input.report(kind);
    if let Some(links) = config.get("options", "dependency_links")
        && !input.allow.allows(links)
    {
        tracing::warn!("File {:?} uses dependency links: {}", input.display, links);
        report.push(Finding::new(SourceKind::DependencyLinks, links));
    }

    Ok(report)
}
