//! Detection entry points
//!
//! [`inspect_file`] maps a file name to its rule and runs it. [`detect`] accepts a
//! directory, a regular file or an `http(s)://` URL and yields one result per
//! recognized manifest, computed only when the iterator is advanced.

use crate::allow_list::AllowList;
use crate::download;
use crate::error::DetectError;
use crate::manifest::{ManifestKind, Report};
use crate::rules;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use walkdir::WalkDir;

/// Final path component, split on `/` so URLs behave like paths.
fn base_name(path: &str) -> &str {
    path.rsplit(['/', MAIN_SEPARATOR]).next().unwrap_or(path)
}

/// Check a single manifest and return everything it declares that is not allowed.
///
/// `real_path` names the file in diagnostics when `path` is only a local copy (for
/// example a downloaded manifest); the manifest kind is taken from its base name.
pub fn inspect_file(
    path: &Path,
    real_path: Option<&str>,
    allow: &AllowList,
) -> Result<Report, DetectError> {
    let display = match real_path {
        Some(real) => real.to_string(),
        None => path.to_string_lossy().into_owned(),
    };
    let file_name = base_name(&display);

    let Some(kind) = ManifestKind::from_file_name(file_name) else {
        return Err(DetectError::UnknownFile {
            file_name: file_name.to_string(),
            supported: ManifestKind::supported_file_names(),
        });
    };

    rules::check(kind, path, &display, allow)
}

/// Whether the manifest at `path` is free of disallowed package sources.
pub fn detect_file(path: impl AsRef<Path>, allow: &AllowList) -> Result<bool, DetectError> {
    Ok(inspect_file(path.as_ref(), None, allow)?.is_clean())
}

/// Like [`detect_file`], reporting `real_path` instead of `path`.
pub fn detect_file_as(
    path: impl AsRef<Path>,
    real_path: &str,
    allow: &AllowList,
) -> Result<bool, DetectError> {
    Ok(inspect_file(path.as_ref(), Some(real_path), allow)?.is_clean())
}

/// Result for one manifest found by [`detect`].
#[derive(Debug, Clone)]
pub struct Detection {
    /// File path, or the URL without query and fragment
    pub id: String,
    pub report: Report,
}

impl Detection {
    pub fn verdict(&self) -> bool {
        self.report.is_clean()
    }
}

enum Target {
    Directory {
        root: PathBuf,
        walker: walkdir::IntoIter,
    },
    File(Option<PathBuf>),
    Url(Option<String>),
}

/// Lazily produced detection results; see [`detect`].
pub struct Detections {
    target: Target,
    allow: AllowList,
}

/// Detect possible dependency confusion in a directory tree, a file or a URL.
///
/// Directories are walked recursively in a stable order: siblings sorted by file
/// name, a subdirectory's manifests reported where the subdirectory sorts. Only
/// files with a recognized manifest name are checked. An element error does not end
/// a directory walk.
pub fn detect(path: &str, allow: &AllowList) -> Result<Detections, DetectError> {
    let fs_path = Path::new(path);
    let target = if fs_path.is_dir() {
        tracing::debug!("Listing files in directory {:?}", path);
        Target::Directory {
            root: fs_path.to_path_buf(),
            walker: WalkDir::new(fs_path)
                .follow_links(false)
                .contents_first(true)
                .sort_by_file_name()
                .into_iter(),
        }
    } else if fs_path.is_file() {
        tracing::debug!("Checking file {:?}", path);
        Target::File(Some(fs_path.to_path_buf()))
    } else if download::is_url(path) {
        Target::Url(Some(path.to_string()))
    } else {
        return Err(DetectError::UnknownPath {
            path: path.to_string(),
        });
    };

    Ok(Detections {
        target,
        allow: allow.clone(),
    })
}

impl Detections {
    fn next_in_directory(&mut self) -> Option<Result<Detection, DetectError>> {
        let Target::Directory { root, walker } = &mut self.target else {
            return None;
        };

        for entry in walker.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.clone());
                    return Some(Err(DetectError::Walk { path, source }));
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            let recognized = entry
                .file_name()
                .to_str()
                .is_some_and(|name| ManifestKind::from_file_name(name).is_some());
            if !recognized {
                continue;
            }
            return Some(check_local(entry.path(), &self.allow));
        }
        None
    }
}

fn check_local(path: &Path, allow: &AllowList) -> Result<Detection, DetectError> {
    let report = inspect_file(path, None, allow)?;
    Ok(Detection {
        id: path.to_string_lossy().into_owned(),
        report,
    })
}

fn check_remote(url: &str, allow: &AllowList) -> Result<Detection, DetectError> {
    let display = download::display_url(url);
    let scratch = download::fetch_to_scratch(url, &display)?;
    let report = inspect_file(scratch.path(), Some(&display), allow);
    drop(scratch);
    Ok(Detection {
        id: display,
        report: report?,
    })
}

impl Iterator for Detections {
    type Item = Result<Detection, DetectError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.target, Target::Directory { .. }) {
            return self.next_in_directory();
        }

        match &mut self.target {
            Target::Directory { .. } => None,
            Target::File(path) => {
                let path = path.take()?;
                Some(check_local(&path, &self.allow))
            }
            Target::Url(url) => {
                let url = url.take()?;
                Some(check_remote(&url, &self.allow))
            }
        }
    }
}
