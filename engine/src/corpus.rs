use crate::index::{DocId, Document};
use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref URL_LINE: Regex = Regex::new(r"\[url\]:\s+(.*)").expect("valid regex");
}

/// Load every `.txt` page under `dir` as one corpus, wholesale. Files are
/// taken in sorted path order so ids stay stable across rebuilds of an
/// unchanged directory; ids start at 1 in ingestion order.
///
/// One unreadable entry is logged and skipped, never aborting the load.
/// Malformed bytes degrade to replacement characters rather than failing.
pub fn load_corpus<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        anyhow::bail!("corpus directory {} does not exist", dir.display());
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable corpus entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some("txt")
        {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    let mut corpus = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable page");
                continue;
            }
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let id = corpus.len() as DocId + 1;
        corpus.push(Document { id, text });
    }
    Ok(corpus)
}

/// Title and source link parsed from a stored page. Crawled pages carry an
/// optional `[url]: <link>` line; the first other non-blank line is the
/// title.
#[derive(Debug, Clone, Default)]
pub struct PageDetails {
    pub url: Option<String>,
    pub title: String,
}

pub fn page_details(text: &str) -> PageDetails {
    let url = URL_LINE
        .captures(text)
        .map(|caps| caps[1].trim().to_string());
    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !URL_LINE.is_match(line))
        .unwrap_or_default()
        .to_string();
    PageDetails { url, title }
}
