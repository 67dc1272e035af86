//! Splits free text into overlapping windows.

use civic_core::{AppError, AppResult};
use text_splitter::{ChunkConfig, TextSplitter};

/// Split text into windows of at most `window_size` characters.
///
/// Consecutive windows share up to `overlap` characters. Boundaries prefer
/// paragraph, sentence and word breaks over raw character cuts.
pub fn split_text(text: &str, window_size: usize, overlap: usize) -> AppResult<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let config = ChunkConfig::new(window_size)
        .with_overlap(overlap)
        .map_err(|e| AppError::Knowledge(format!("Invalid window configuration: {}", e)))?;
    let splitter = TextSplitter::new(config);

    Ok(splitter.chunks(text).map(str::to_string).collect())
}
