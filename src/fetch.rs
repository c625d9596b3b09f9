use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::record::RawRow;

/// Reads CSV rows from `-` (stdin), an `http(s)://` URL or a file path.
///
/// The header row is still part of the result.
pub fn fetch_rows(source: &str) -> Result<Vec<RawRow>> {
    let text = read_source(source)?;
    let rows = parse_csv(&text);
    if rows.is_empty() {
        return Err(Error::InvalidInput(format!("{source}: no header row")));
    }
    tracing::debug!(source, rows = rows.len(), "read genealogy sheet");
    Ok(rows)
}

pub fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| Error::Io {
                path: "<stdin>".into(),
                source,
            })?;
        return Ok(buf);
    }
    if is_url(source) {
        return fetch_url(source);
    }
    let path = Path::new(source);
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn is_url(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(feature = "fetch")]
fn fetch_url(url: &str) -> Result<String> {
    let fail = |reason: String| Error::Fetch {
        url: url.to_string(),
        reason,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|err| fail(err.to_string()))?;
    let response = client.get(url).send().map_err(|err| fail(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::InvalidInput(format!("{url}: HTTP {status}")));
    }
    response.text().map_err(|err| fail(err.to_string()))
}

#[cfg(not(feature = "fetch"))]
fn fetch_url(url: &str) -> Result<String> {
    Err(Error::Fetch {
        url: url.to_string(),
        reason: "built without the `fetch` feature".to_string(),
    })
}
