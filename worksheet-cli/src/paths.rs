//! Platform-specific directory paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "worksheet";
const APPLICATION: &str = "worksheet";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs and other regenerable data.
///
/// - Linux: `$XDG_CACHE_HOME/worksheet` or `~/.cache/worksheet`
/// - macOS: `~/Library/Caches/dev.worksheet.worksheet`
/// - Windows: `C:\Users\<User>\AppData\Local\worksheet\worksheet\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
