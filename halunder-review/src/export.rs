//! Export adapter
//!
//! Pulls a fresh CSV snapshot from the remote store. Local state is never
//! consulted, so an export reflects the store at request time.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::client::CorpusStore;
use crate::error::{ReviewError, Result};

/// A downloaded snapshot ready to be written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl NamedFile {
    /// Write into `dir` (created if missing); returns the full path
    pub fn save_into(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Saved export");
        Ok(path)
    }
}

/// Fallback name when the store sends no filename hint; `date` is the UTC date
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("halunder_corpus_{}.csv", date.format("%Y-%m-%d"))
}

/// Extract `filename` from a `Content-Disposition` header value
///
/// Accepts both `filename=foo.csv` and `filename="foo.csv"`; a quoted value
/// may itself contain `;`. Any path components are stripped so the result is
/// always a bare file name.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let value = disposition_params(header).into_iter().find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| unquote(value.trim()))
    })?;

    let name = value.rsplit(['/', '\\']).next().unwrap_or(value.as_str()).trim();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

/// Split a header value on `;` outside quoted strings
fn disposition_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

/// Strip surrounding quotes and backslash escapes from a quoted-string
fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .map(|v| v.strip_suffix('"').unwrap_or(v))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Request a full-corpus CSV snapshot
pub async fn export_snapshot<S: CorpusStore + ?Sized>(store: &S) -> Result<NamedFile> {
    let payload = store.export_csv().await.map_err(|e| {
        warn!(error = %e, "Export request failed");
        ReviewError::Export(e)
    })?;

    let filename = payload
        .filename_hint
        .unwrap_or_else(|| default_export_filename(chrono::Utc::now().date_naive()));

    info!(filename = %filename, bytes = payload.bytes.len(), "Export snapshot received");
    Ok(NamedFile {
        filename,
        bytes: payload.bytes,
    })
}
