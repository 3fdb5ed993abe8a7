//! Reading team preference files.
//!
//! Each line is whitespace-delimited: a team identifier followed by the
//! structures it prefers, in order. A team with no structures is kept (it
//! just never pairs). A team repeated on a later line has its structures
//! replaced but keeps its original position.

use crate::types::PreferenceMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse preference text into a `PreferenceMap`.
///
/// Blank lines are skipped.
pub fn parse_preferences(text: &str) -> PreferenceMap {
    let mut preferences = PreferenceMap::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(team) = tokens.next() else {
            continue;
        };
        let structures: Vec<String> = tokens.map(str::to_string).collect();

        if structures.is_empty() {
            debug!(team, line = line_no + 1, "team listed no structures");
        }
        if preferences.insert(team, structures).is_some() {
            warn!(team, line = line_no + 1, "duplicate team, later line replaces earlier");
        }
    }

    preferences
}

/// Read and parse a preference file
pub fn load_preferences(path: impl AsRef<Path>) -> Result<PreferenceMap, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let preferences = parse_preferences(&text);
    debug!(path = %path.display(), teams = preferences.len(), "loaded preferences");
    Ok(preferences)
}
