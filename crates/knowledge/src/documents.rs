//! Free-text document ingestion.
//!
//! Extra knowledge can be supplied as `.txt` or `.md` files (or directories
//! of them). Each file is split into overlapping windows; every window
//! becomes one retrievable unit.

use crate::chunker::split_text;
use crate::types::RetrievableUnit;
use civic_core::{AppResult, RetrievalSettings};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DOCUMENT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Expand the configured paths into a sorted list of document files.
///
/// Missing paths are logged and skipped.
pub fn collect_documents(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_document(e.path()))
                    .map(|e| e.into_path()),
            );
        } else {
            tracing::warn!("Document path does not exist: {:?}", path);
        }
    }

    files.sort();
    files.dedup();
    files
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read every document and window it into retrievable units.
///
/// Unreadable files are skipped with a warning.
pub fn document_units(
    paths: &[PathBuf],
    settings: &RetrievalSettings,
) -> AppResult<Vec<RetrievableUnit>> {
    let mut units = Vec::new();

    for file in collect_documents(paths) {
        let text = match std::fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping unreadable document {:?}: {}", file, e);
                continue;
            }
        };

        let windows = split_text(&text, settings.window_size, settings.window_overlap)?;
        tracing::debug!("{:?}: {} windows", file, windows.len());

        let name = file.display().to_string();
        units.extend(
            windows
                .into_iter()
                .enumerate()
                .map(|(i, window)| RetrievableUnit::new(window, format!("{}#{}", name, i + 1))),
        );
    }

    Ok(units)
}
