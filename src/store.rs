//! Persisted preference store
//!
//! A small string key-value store holding the two pieces of state that
//! survive across invocations: the display language and the per-session
//! completion marks. The store is passed explicitly wherever it is needed
//! so tests can inject an in-memory implementation; nothing reaches for
//! ambient storage. An unreadable or corrupted store is treated as empty
//! ("no marks yet"), never as a fatal error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::StoreError;
use crate::i18n::Language;
use crate::models::CompletionMark;

/// Store key for the two-letter display language code
pub const LANGUAGE_KEY: &str = "language";

/// Store key for the session-id to completion-mark map
pub const COMPLETION_MARKS_KEY: &str = "completion_marks";

/// String key-value persistence, injectable for tests
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one flat JSON object of string values
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, treating a missing or unreadable file as
    /// an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    warn!(path = %path.display(), %err, "preference store unreadable, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self { path, values }
    }

    /// Default store location under the user's home directory
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".raceday")
            .join("preferences.json")
    }

    fn persist(&self) -> Result<(), StoreError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&self.values)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            fs::write(&self.path, content)
        };

        write().map_err(|err| StoreError::WriteFailed {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Read the persisted display language, falling back to the default for a
/// missing or unknown code
pub fn language<S: PreferenceStore + ?Sized>(store: &S) -> Language {
    store
        .get(LANGUAGE_KEY)
        .and_then(|code| Language::from_code(&code))
        .unwrap_or_default()
}

/// Persist the display language
pub fn set_language<S: PreferenceStore + ?Sized>(
    store: &mut S,
    lang: Language,
) -> Result<(), StoreError> {
    store.set(LANGUAGE_KEY, lang.code())
}

/// Read all completion marks; an absent or corrupted entry means no marks
pub fn completion_marks<S: PreferenceStore + ?Sized>(store: &S) -> HashMap<String, CompletionMark> {
    let Some(raw) = store.get(COMPLETION_MARKS_KEY) else {
        return HashMap::new();
    };

    match serde_json::from_str(&raw) {
        Ok(marks) => marks,
        Err(err) => {
            warn!(%err, "completion marks unreadable, treating as none");
            HashMap::new()
        }
    }
}

/// Set one session's completion mark, persisting the full map
pub fn set_completion_mark<S: PreferenceStore + ?Sized>(
    store: &mut S,
    session_id: &str,
    mark: CompletionMark,
) -> Result<(), StoreError> {
    let mut marks = completion_marks(store);
    if mark == CompletionMark::Pending {
        marks.remove(session_id);
    } else {
        marks.insert(session_id.to_string(), mark);
    }

    let raw = serde_json::to_string(&marks).map_err(|err| StoreError::InvalidValue {
        key: COMPLETION_MARKS_KEY.to_string(),
        reason: err.to_string(),
    })?;
    store.set(COMPLETION_MARKS_KEY, &raw)
}
