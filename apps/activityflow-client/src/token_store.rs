use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

pub const STORE_ENV: &str = "ACTIVITYFLOW_TOKEN_STORE";
const STORE_FILE: &str = "tokens.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Tokens persisted as a small JSON file between invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$ACTIVITYFLOW_TOKEN_STORE`, else `tokens.json` in the user's config directory.
    pub fn default_location() -> Self {
        if let Some(path) = std::env::var_os(STORE_ENV).filter(|p| !p.is_empty()) {
            return Self::new(path);
        }
        let path = ProjectDirs::from("", "", "activityflow")
            .map(|dirs| dirs.config_dir().join(STORE_FILE))
            .unwrap_or_else(|| PathBuf::from(".activityflow").join(STORE_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as empty.
    pub fn load(&self) -> ClientResult<StoredTokens> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(StoredTokens::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, tokens: &StoredTokens) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        let mut file = owner_only(OpenOptions::new().write(true).create(true).truncate(true)).open(&self.path)?;
        restrict(&file)?;
        file.write_all(contents.as_bytes())?;
        tracing::debug!("Saved tokens to {}", self.path.display());
        Ok(())
    }

    pub fn set(&self, auth_token: &str, refresh_token: &str) -> ClientResult<()> {
        self.save(&StoredTokens {
            auth_token: Some(auth_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
        })
    }

    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn token(&self) -> ClientResult<Option<String>> {
        Ok(self.load()?.auth_token)
    }

    pub fn refresh_token(&self) -> ClientResult<Option<String>> {
        Ok(self.load()?.refresh_token)
    }
}

/// Token files are readable by their owner only.
#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(TOKEN_FILE_MODE)
}

/// `mode` only applies on creation; files written by older versions keep theirs.
#[cfg(unix)]
fn restrict(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(TOKEN_FILE_MODE))
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

#[cfg(not(unix))]
fn restrict(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nope.json"));
        assert_eq!(store.load().unwrap(), StoredTokens::default());
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn uses_camel_case_keys_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested/tokens.json"));
        store.set("access", "refresh").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "access");
        assert_eq!(raw["refreshToken"], "refresh");
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("refresh"));
    }

    #[test]
    fn clear_removes_tokens_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        store.set("a", "r").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        store.set("access", "refresh").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn saving_tightens_an_existing_token_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        TokenStore::new(&path).set("access", "refresh").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{not json").unwrap();
        assert!(TokenStore::new(path).load().is_err());
    }
}
