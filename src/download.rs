//! Retrieval of remote manifests
//!
//! A manifest given as an `http(s)://` URL is fetched with a blocking GET and
//! written to a scratch file that lives only as long as the returned handle.

use crate::error::DetectError;
use std::io::Write;
use tempfile::NamedTempFile;

/// Hosts whose 403 responses signal API rate limiting
const RATE_LIMITED_HOSTS: [&str; 2] = ["github.com", "githubusercontent.com"];

pub fn is_url(path: &str) -> bool {
    path.starts_with("https://") || path.starts_with("http://")
}

/// Strip query, fragment and `;params` from a URL for display.
pub fn display_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let url = &url[..end];

    let path_start = url
        .find("://")
        .map(|i| i + 3)
        .and_then(|start| url[start..].find('/').map(|i| start + i));
    match path_start {
        Some(path_start) => {
            let last_segment = url[path_start..].rfind('/').map_or(path_start, |i| path_start + i);
            match url[last_segment..].find(';') {
                Some(i) => url[..last_segment + i].to_string(),
                None => url.to_string(),
            }
        }
        None => url.to_string(),
    }
}

/// Host part of a URL, without userinfo or port.
fn host(url: &str) -> Option<&str> {
    let rest = url.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let authority = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = match authority.strip_prefix('[') {
        Some(v6) => v6.split(']').next()?,
        None => authority.split(':').next()?,
    };
    Some(host)
}

fn is_rate_limited_host(url: &str) -> bool {
    let Some(host) = host(url) else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    RATE_LIMITED_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
}

/// Map a non-success HTTP status to an error.
fn status_error(url: &str, display: &str, status: u16, body: String) -> DetectError {
    if status == 403 && is_rate_limited_host(url) {
        return DetectError::GithubRateLimit {
            url: display.to_string(),
            status,
            body,
        };
    }
    if status == 404 {
        return DetectError::DownloadNotFound {
            url: display.to_string(),
            body,
        };
    }
    DetectError::Download {
        url: display.to_string(),
        status,
        body,
    }
}

/// Download `url` into a scratch file.
///
/// The file is deleted when the returned handle is dropped.
pub fn fetch_to_scratch(url: &str, shown: &str) -> Result<NamedTempFile, DetectError> {
    tracing::debug!("Downloading from {:?}", shown);

    let mut response = ureq::get(url)
        .config()
        .http_status_as_error(false)
        .build()
        .call()
        .map_err(|e| DetectError::DownloadTransport {
            url: shown.to_string(),
            source: Box::new(e),
        })?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| DetectError::DownloadTransport {
            url: shown.to_string(),
            source: Box::new(e),
        })?;

    if status != 200 {
        return Err(status_error(url, shown, status, body));
    }

    let scratch_error = |source| DetectError::ScratchFile {
        url: shown.to_string(),
        source,
    };
    let mut file = tempfile::Builder::new()
        .prefix("yorkshire-")
        .tempfile()
        .map_err(scratch_error)?;
    file.write_all(body.as_bytes()).map_err(scratch_error)?;
    file.flush().map_err(scratch_error)?;
    Ok(file)
}
