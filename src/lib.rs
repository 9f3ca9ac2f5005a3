//! Detect dependency confusion in Python dependency manifests
//!
//! Checks requirements files, lockfiles and build configuration for package
//! sources other than the default index that are not explicitly allow-listed.
//!
//! ```no_run
//! use yorkshire::{AllowList, detect_file};
//!
//! let allow = AllowList::new(["https://pypi.internal.example/simple"]);
//! let okay = detect_file("requirements.txt", &allow)?;
//! # Ok::<(), yorkshire::DetectError>(())
//! ```

pub mod allow_list;
pub mod detect;
pub mod download;
pub mod error;
pub mod ini;
pub mod manifest;
pub mod rules;
pub mod setup_script;

pub use allow_list::AllowList;
pub use detect::{Detection, Detections, detect, detect_file, detect_file_as, inspect_file};
pub use error::{DetectError, ParseFailure};
pub use manifest::{Finding, ManifestKind, Report, SourceKind};
