//! Manifest kinds and detection results

use serde::Serialize;
use std::fmt;

/// Supported Python dependency manifests, keyed by exact file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum ManifestKind {
    PyprojectToml,
    SetupCfg,
    SetupPy,
    Pipfile,
    PipfileLock,
    RequirementsTxt,
    RequirementsIn,
    PdmLock,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 8] = [
        ManifestKind::PyprojectToml,
        ManifestKind::SetupCfg,
        ManifestKind::SetupPy,
        ManifestKind::Pipfile,
        ManifestKind::PipfileLock,
        ManifestKind::RequirementsTxt,
        ManifestKind::RequirementsIn,
        ManifestKind::PdmLock,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ManifestKind::PyprojectToml => "pyproject.toml",
            ManifestKind::SetupCfg => "setup.cfg",
            ManifestKind::SetupPy => "setup.py",
            ManifestKind::Pipfile => "Pipfile",
            ManifestKind::PipfileLock => "Pipfile.lock",
            ManifestKind::RequirementsTxt => "requirements.txt",
            ManifestKind::RequirementsIn => "requirements.in",
            ManifestKind::PdmLock => "pdm.lock",
        }
    }

    /// Look up a manifest kind by base file name (case-sensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    pub fn supported_file_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.file_name()).collect()
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl From<ManifestKind> for &'static str {
    fn from(kind: ManifestKind) -> Self {
        kind.file_name()
    }
}

/// The construct a declared source was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PoetrySource,
    PdmSource,
    DependencyLinks,
    PipfileSource,
    ExtraIndexUrl,
    FindLinks,
    LockedFile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::PoetrySource => "Poetry source",
            SourceKind::PdmSource => "PDM source",
            SourceKind::DependencyLinks => "dependency_links",
            SourceKind::PipfileSource => "package index",
            SourceKind::ExtraIndexUrl => "extra-index-url",
            SourceKind::FindLinks => "find-links",
            SourceKind::LockedFile => "locked file URL",
        };
        f.write_str(label)
    }
}

/// A declared source that is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub source: SourceKind,
    pub value: String,
    /// Locked package the value belongs to, for lockfiles that record one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl Finding {
    pub fn new(source: SourceKind, value: impl Into<String>) -> Self {
        Self {
            source,
            value: value.into(),
            package: None,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{} for {}: {}", self.source, package, self.value),
            None => write!(f, "{}: {}", self.source, self.value),
        }
    }
}

/// Outcome of checking a single manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub path: String,
    pub kind: ManifestKind,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn new(path: impl Into<String>, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            kind,
            findings: Vec::new(),
        }
    }

    /// The verdict: `true` when no disallowed source was declared.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn values(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.value.as_str()).collect()
    }
}
