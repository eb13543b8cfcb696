use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

static USER_SECRETS_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<UserSecretsId>\s*([^<]+?)\s*</UserSecretsId>").expect("pattern is valid")
});

/// Scans `dir` for `.csproj` files and returns the first non-empty
/// `<UserSecretsId>` value found. Files are visited in name order so the
/// result is deterministic; unreadable project files are skipped with a
/// warning.
pub fn find_user_secrets_id(dir: &Path) -> Option<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not scan {} for project files: {e}", dir.display());
            return None;
        }
    };

    let mut project_files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csproj"))
        })
        .collect();
    project_files.sort();

    for path in project_files {
        match fs::read_to_string(&path) {
            Ok(content) => {
                if let Some(caps) = USER_SECRETS_ID.captures(&content) {
                    let id = caps[1].trim();
                    if !id.is_empty() {
                        return Some(id.to_string());
                    }
                }
            }
            Err(e) => warn!("Could not read {}: {e}", path.display()),
        }
    }
    None
}
