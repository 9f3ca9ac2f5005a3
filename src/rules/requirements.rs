//! requirements.txt / requirements.in: `--extra-index-url` and `--find-links`
//!
//! Files pulled in with `-r/--requirement` or `-c/--constraint` are read as
//! well, relative to the file that references them.

use super::RuleInput;
use crate::error::{DetectError, ParseFailure};
use crate::manifest::{Finding, ManifestKind, Report, SourceKind};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Source-related options found on one logical line
#[derive(Debug, Default, PartialEq, Eq)]
struct OptionLine {
    extra_index_urls: Vec<String>,
    find_links: Vec<String>,
}

pub(super) fn check(input: &RuleInput<'_>, kind: ManifestKind) -> Result<Report, DetectError> {
    let content = input.read(kind)?;
    let mut visited = HashSet::new();
    visited.insert(canonical(input.path));

    let mut lines = Vec::new();
    collect_options(input.path, &content, &mut visited, &mut lines)
        .map_err(|e| input.parse_error(kind, e))?;

    let mut report = input.report(kind);
    for line in &lines {
        let groups = [
            (SourceKind::ExtraIndexUrl, &line.extra_index_urls),
            (SourceKind::FindLinks, &line.find_links),
        ];
        for (source_kind, urls) in groups {
            let rejected: Vec<&String> = urls
                .iter()
                .filter(|url| !input.allow.allows(url))
                .collect();
            if rejected.is_empty() {
                continue;
            }
            tracing::warn!(
                "File {:?} states one or multiple {} options: {:?}",
                input.display,
                source_kind,
                rejected
            );
            for url in rejected {
                report.push(Finding::new(source_kind, url.as_str()));
            }
        }
    }

    Ok(report)
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Gather option lines from `content` and every file it includes.
fn collect_options(
    path: &Path,
    content: &str,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<OptionLine>,
) -> Result<(), ParseFailure> {
    for line in logical_lines(content) {
        if !line.starts_with('-') {
            continue;
        }
        let tokens = tokenize(&line);
        let parsed = parse_options(&tokens);

        for include in &parsed.includes {
            if include.starts_with("http://") || include.starts_with("https://") {
                tracing::debug!("Not following remote include {:?} in {:?}", include, path);
                continue;
            }
            let nested = path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(include);
            if !visited.insert(canonical(&nested)) {
                tracing::debug!("Skipping already included file {:?}", nested);
                continue;
            }
            let nested_content =
                fs::read_to_string(&nested).map_err(|e| ParseFailure::Requirements {
                    path: nested.clone(),
                    message: e.to_string(),
                })?;
            collect_options(&nested, &nested_content, visited, out)?;
        }

        if !parsed.line.extra_index_urls.is_empty() || !parsed.line.find_links.is_empty() {
            out.push(parsed.line);
        }
    }
    Ok(())
}

/// Join backslash continuations and drop comments and blank lines.
///
/// A comment line never continues; it ends any pending continuation.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();

    for raw in content.lines() {
        let is_comment = raw.trim_start().starts_with('#');
        if !is_comment && let Some(head) = raw.strip_suffix('\\') {
            pending.push_str(head);
            continue;
        }
        if is_comment {
            pending.push(' ');
        }
        pending.push_str(raw);
        let line = strip_comment(&pending).trim().to_string();
        pending.clear();
        if !line.is_empty() {
            lines.push(line);
        }
    }

    let line = strip_comment(&pending).trim().to_string();
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Remove a `#` comment at line start or preceded by whitespace.
fn strip_comment(line: &str) -> &str {
    let mut prev_ws = true;
    for (idx, c) in line.char_indices() {
        if c == '#' && prev_ws {
            return &line[..idx];
        }
        prev_ws = c.is_whitespace();
    }
    line
}

/// Split on whitespace, honouring single and double quotes.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

#[derive(Debug, Default)]
struct ParsedOptions {
    line: OptionLine,
    includes: Vec<String>,
}

#[derive(Clone, Copy)]
enum Opt {
    ExtraIndexUrl,
    FindLinks,
    Include,
}

/// Long options pip accepts in requirements files. Only the ones carrying a
/// source or an include are acted on; the rest take part in prefix matching.
static LONG_OPTIONS: [(&str, Option<Opt>); 18] = [
    ("--index-url", None),
    ("--extra-index-url", Some(Opt::ExtraIndexUrl)),
    ("--no-index", None),
    ("--constraint", Some(Opt::Include)),
    ("--requirement", Some(Opt::Include)),
    ("--editable", None),
    ("--find-links", Some(Opt::FindLinks)),
    ("--no-binary", None),
    ("--only-binary", None),
    ("--prefer-binary", None),
    ("--require-hashes", None),
    ("--pre", None),
    ("--trusted-host", None),
    ("--use-feature", None),
    ("--install-option", None),
    ("--global-option", None),
    ("--hash", None),
    ("--config-settings", None),
];

const SHORT_OPTIONS: [(&str, Opt); 3] = [
    ("-f", Opt::FindLinks),
    ("-r", Opt::Include),
    ("-c", Opt::Include),
];

fn parse_options(tokens: &[String]) -> ParsedOptions {
    let mut parsed = ParsedOptions::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        let Some((opt, inline)) = match_option(token) else {
            continue;
        };
        let value = match inline {
            Some(value) => Some(value.to_string()),
            None => iter.next().cloned(),
        };
        let Some(value) = value else {
            continue;
        };
        match opt {
            Opt::ExtraIndexUrl => parsed.line.extra_index_urls.push(value),
            Opt::FindLinks => parsed.line.find_links.push(value),
            Opt::Include => parsed.includes.push(value),
        }
    }

    parsed
}

/// Match a token against known options, returning any value attached to it.
fn match_option(token: &str) -> Option<(Opt, Option<&str>)> {
    if token.starts_with("--") {
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        return resolve_long(name).map(|opt| (opt, inline));
    }
    for (name, opt) in SHORT_OPTIONS {
        if token == name {
            return Some((opt, None));
        }
        if let Some(value) = token.strip_prefix(name) {
            let value = value.strip_prefix('=').unwrap_or(value);
            return Some((opt, Some(value)));
        }
    }
    None
}

/// Resolve a possibly abbreviated long option the way optparse does: an exact
/// name wins, otherwise the prefix must select a single option.
fn resolve_long(name: &str) -> Option<Opt> {
    if let Some((_, opt)) = LONG_OPTIONS.iter().find(|(long, _)| *long == name) {
        return *opt;
    }
    let mut candidates = LONG_OPTIONS.iter().filter(|(long, _)| long.starts_with(name));
    match (candidates.next(), candidates.next()) {
        (Some((_, opt)), None) => *opt,
        (Some(_), Some(_)) => {
            tracing::debug!("Ignoring ambiguous option {:?}", name);
            None
        }
        _ => None,
    }
}
