//! Per-format detection rules
//!
//! Each manifest kind has one rule that extracts explicitly declared package
//! sources and checks them against the allow-list:
//! - pyproject.toml: Poetry and PDM `source` tables
//! - setup.cfg / setup.py: `dependency_links`
//! - Pipfile / Pipfile.lock: package indexes
//! - requirements.txt / requirements.in: `--extra-index-url` and `--find-links`
//! - pdm.lock: locked download URLs outside PyPI

mod pdm_lock;
mod pipfile;
mod pyproject;
mod requirements;
mod setup_cfg;
mod setup_py;

use crate::allow_list::AllowList;
use crate::error::{DetectError, ParseFailure};
use crate::manifest::{ManifestKind, Report};
use std::fs;
use std::path::Path;

/// Inputs shared by every rule.
pub(crate) struct RuleInput<'a> {
    /// File to read
    pub path: &'a Path,
    /// Location reported in diagnostics; differs from `path` for downloaded copies
    pub display: &'a str,
    pub allow: &'a AllowList,
}

impl RuleInput<'_> {
    fn read(&self, kind: ManifestKind) -> Result<String, DetectError> {
        fs::read_to_string(self.path).map_err(|e| self.parse_error(kind, e))
    }

    fn parse_error(&self, kind: ManifestKind, source: impl Into<ParseFailure>) -> DetectError {
        DetectError::FileParse {
            kind: kind.file_name(),
            path: self.display.to_string(),
            source: source.into(),
        }
    }

    fn report(&self, kind: ManifestKind) -> Report {
        Report::new(self.display, kind)
    }

    fn location(&self) -> &str {
        match Path::new(self.display).parent().and_then(|p| p.to_str()) {
            Some(dir) if !dir.is_empty() => dir,
            _ => ".",
        }
    }
}

/// Check a manifest of a known kind.
///
/// `display` names the file in diagnostics and in the returned [`Report`].
pub fn check(
    kind: ManifestKind,
    path: &Path,
    display: &str,
    allow: &AllowList,
) -> Result<Report, DetectError> {
    let input = RuleInput {
        path,
        display,
        allow,
    };
    tracing::info!(
        "Performing detection in {} file located at {:?}",
        kind,
        input.location()
    );

    match kind {
        ManifestKind::PyprojectToml => pyproject::check(&input),
        ManifestKind::SetupCfg => setup_cfg::check(&input),
        ManifestKind::SetupPy => setup_py::check(&input),
        ManifestKind::Pipfile => pipfile::check_pipfile(&input),
        ManifestKind::PipfileLock => pipfile::check_pipfile_lock(&input),
        ManifestKind::RequirementsTxt | ManifestKind::RequirementsIn => {
            requirements::check(&input, kind)
        }
        ManifestKind::PdmLock => pdm_lock::check(&input),
    }
}
