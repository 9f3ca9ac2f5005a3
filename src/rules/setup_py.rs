//! setup.py: `dependency_links` passed to a top-level call
//!
//! With an allow-list, a literal list of allow-listed strings passes. Any element
//! that is not a string literal is a violation, since its value is unknown without
//! running the script.

use super::RuleInput;
use crate::allow_list::AllowList;
use crate::error::DetectError;
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};
use crate::setup_script::{KeywordValue, top_level_call_keywords};

const KEYWORD: &str = "dependency_links";

/// Placeholder reported for values that cannot be read statically
const DYNAMIC_VALUE: &str = "<dynamic value>";

pub(super) fn check(input: &RuleInput<'_>) -> Result<Report, DetectError> {
    let kind = ManifestKind::SetupPy;
    let content = input.read(kind)?;
    let values =
        top_level_call_keywords(&content, KEYWORD).map_err(|e| input.parse_error(kind, e))?;

    let mut report = input.report(kind);
    for value in &values {
        let rejected = rejected_links(value, input.allow);
        if rejected.is_empty() {
            continue;
        }
        tracing::warn!(
            "File {:?} uses dependency links: {:?}",
            input.display,
            rejected
        );
        for link in rejected {
            report.push(Finding::new(SourceKind::DependencyLinks, link));
        }
    }

    Ok(report)
}

fn rejected_links(value: &KeywordValue, allow: &AllowList) -> Vec<String> {
    match value {
        KeywordValue::List(elements) => elements
            .iter()
            .filter_map(|element| match element {
                Some(link) if allow.allows(link) => None,
                Some(link) => Some(link.clone()),
                None => Some(DYNAMIC_VALUE.to_string()),
            })
            .collect(),
        KeywordValue::Expression => vec![DYNAMIC_VALUE.to_string()],
    }
}
