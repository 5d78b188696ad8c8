//! API credential and its storage.
//!
//! The credential is read at request time, never cached by the session.

use std::fmt;
use std::sync::Mutex;

use crate::error::{MentorError, MentorResult};

/// Key the credential is stored under.
pub const STORAGE_KEY: &str = "openai-key";

/// Opaque API secret. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret. Surrounding whitespace is dropped; blank input yields `None`.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Persistent home of the single API credential.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    fn load(&self) -> MentorResult<Option<Credential>>;

    /// Replaces the stored credential.
    fn save(&self, credential: &Credential) -> MentorResult<()>;

    /// Removes the stored credential.
    fn clear(&self) -> MentorResult<()>;
}

/// Process-local store, used by tests and the wasm bindings.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> MentorResult<Option<Credential>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| MentorError::storage("credential lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, credential: &Credential) -> MentorResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| MentorError::storage("credential lock poisoned"))?;
        *slot = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> MentorResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| MentorError::storage("credential lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(feature = "client")]
pub use file::FileCredentialStore;

#[cfg(feature = "client")]
mod file {
    use std::path::{Path, PathBuf};

    use serde_json::{Map, Value};

    use super::{Credential, CredentialStore, STORAGE_KEY};
    use crate::error::{MentorError, MentorResult};

    /// JSON-object file store. Keys other than [`STORAGE_KEY`] are left untouched.
    #[derive(Debug, Clone)]
    pub struct FileCredentialStore {
        path: PathBuf,
    }

    impl FileCredentialStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `{config_dir}/uimentor/storage.json`.
        pub fn default_location() -> MentorResult<Self> {
            let dir = dirs::config_dir()
                .ok_or_else(|| MentorError::storage("no config directory on this platform"))?;
            Ok(Self::new(dir.join("uimentor").join("storage.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_map(&self) -> MentorResult<Map<String, Value>> {
            if !self.path.exists() {
                return Ok(Map::new());
            }
            let text = std::fs::read_to_string(&self.path)?;
            if text.trim().is_empty() {
                return Ok(Map::new());
            }
            match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => Ok(map),
                _ => Err(MentorError::storage(format!(
                    "{} does not contain a JSON object",
                    self.path.display()
                ))),
            }
        }

        fn write_map(&self, map: Map<String, Value>) -> MentorResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let text = serde_json::to_string_pretty(&Value::Object(map))?;
            std::fs::write(&self.path, text)?;
            Ok(())
        }
    }

    impl CredentialStore for FileCredentialStore {
        fn load(&self) -> MentorResult<Option<Credential>> {
            let map = self.read_map()?;
            Ok(map
                .get(STORAGE_KEY)
                .and_then(Value::as_str)
                .and_then(Credential::new))
        }

        fn save(&self, credential: &Credential) -> MentorResult<()> {
            let mut map = self.read_map()?;
            map.insert(
                STORAGE_KEY.to_string(),
                Value::String(credential.expose().to_string()),
            );
            self.write_map(map)?;
            log::debug!("Saved credential to {}", self.path.display());
            Ok(())
        }

        fn clear(&self) -> MentorResult<()> {
            let mut map = self.read_map()?;
            if map.remove(STORAGE_KEY).is_some() {
                self.write_map(map)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_trip_survives_new_instance() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("storage.json");

            let store = FileCredentialStore::new(&path);
            assert_eq!(store.load().unwrap(), None);

            store.save(&Credential::new("sk-test").unwrap()).unwrap();

            let reopened = FileCredentialStore::new(&path);
            assert_eq!(reopened.load().unwrap().unwrap().expose(), "sk-test");
        }

        #[test]
        fn test_preserves_other_keys() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("storage.json");
            std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

            let store = FileCredentialStore::new(&path);
            store.save(&Credential::new("sk-1").unwrap()).unwrap();
            store.clear().unwrap();

            let value: Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(value, serde_json::json!({ "theme": "dark" }));
            assert_eq!(store.load().unwrap(), None);
        }

        #[test]
        fn test_rejects_non_object_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("storage.json");
            std::fs::write(&path, "[1, 2]").unwrap();

            let err = FileCredentialStore::new(&path).load().unwrap_err();
            assert!(matches!(err, MentorError::Storage(_)));
        }
    }
}
