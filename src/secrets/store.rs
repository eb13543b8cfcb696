use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;

use crate::errors::SyncError;

/// Resolves the user-secrets file for an id, mirroring the dotnet tooling
/// layout: `%APPDATA%/Microsoft/UserSecrets/{id}/secrets.json` on Windows,
/// `~/.microsoft/usersecrets/{id}/secrets.json` elsewhere.
#[cfg(windows)]
pub fn secrets_path(user_secrets_id: &str) -> Result<PathBuf, SyncError> {
    let base = dirs::config_dir()
        .ok_or_else(|| SyncError::Config("could not determine the APPDATA directory".to_string()))?;
    Ok(base
        .join("Microsoft")
        .join("UserSecrets")
        .join(user_secrets_id)
        .join("secrets.json"))
}

#[cfg(not(windows))]
pub fn secrets_path(user_secrets_id: &str) -> Result<PathBuf, SyncError> {
    let home = dirs::home_dir()
        .ok_or_else(|| SyncError::Config("could not determine the home directory".to_string()))?;
    Ok(home
        .join(".microsoft")
        .join("usersecrets")
        .join(user_secrets_id)
        .join("secrets.json"))
}

/// Reads the existing secrets mapping.
///
/// A missing store is a first run, not an error: the parent directory is
/// created for the later write and an empty mapping is returned. Blank
/// content also yields an empty mapping. A store that exists but does not
/// parse is recovered as an empty mapping with a warning; whatever it held
/// is replaced on the next save.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>, SyncError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            return Ok(BTreeMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&content) {
        Ok(secrets) => Ok(secrets),
        Err(e) => {
            warn!(
                "Could not read existing secrets file {}: {e}",
                path.display()
            );
            Ok(BTreeMap::new())
        }
    }
}

/// Serializes the full mapping over the store, creating parent directories
/// as needed. Always a complete overwrite, never an append or patch.
pub fn save(path: &Path, secrets: &BTreeMap<String, String>) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(secrets).map_err(|source| SyncError::Decode {
        context: "secrets mapping".to_string(),
        source,
    })?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn missing_store_loads_empty_and_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("some-id").join("secrets.json");

        let secrets = load(&path).unwrap();

        assert!(secrets.is_empty());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn blank_store_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, "  \n\t ").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_store_is_recovered_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("secrets.json");
        let secrets = mapping(&[("ConnectionStrings:Db", "Server=x"), ("ApiKey", "k")]);

        save(&path, &secrets).unwrap();

        assert_eq!(load(&path).unwrap(), secrets);
    }

    #[test]
    fn save_overwrites_in_full() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        save(&path, &mapping(&[("OLD", "1"), ("KEEP", "2")])).unwrap();

        save(&path, &mapping(&[("KEEP", "2")])).unwrap();

        assert_eq!(load(&path).unwrap(), mapping(&[("KEEP", "2")]));
    }

    #[test]
    fn secrets_path_ends_with_id_and_file() {
        let path = secrets_path("aaaa-bbbb").unwrap();
        assert!(path.ends_with(Path::new("aaaa-bbbb").join("secrets.json")));
    }
}
