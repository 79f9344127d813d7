// Input file discovery in a data directory (usually ~/Downloads).

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::UserDirs;

/// Default data directory: the user's Downloads folder.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .context("could not locate the Downloads directory; pass --data-dir")
}

/// Roster exports, e.g. `Texas_Roster.csv`.
pub const ROSTER_PATTERN: &str = "*[Rr]oster.csv";
/// Recruiting board exports, e.g. `recruiting_2025.csv`.
pub const RECRUITING_PATTERN: &str = "*[Rr]ecruiting*.csv";

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn compile(pattern: &str) -> anyhow::Result<glob::Pattern> {
    glob::Pattern::new(pattern).with_context(|| format!("invalid file pattern {pattern:?}"))
}

fn name_matches(pattern: &glob::Pattern, name: &str) -> bool {
    pattern.matches_with(name, MATCH_OPTIONS)
}

/// Files directly in `dir` whose names match `pattern`, sorted by name.
pub fn find_files(dir: &Path, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = compile(pattern)?;
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name_matches(&pattern, name));
        if matches && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
