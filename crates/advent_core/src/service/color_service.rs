//! Recently used editor colors.
//!
//! # Responsibility
//! - Keep one most-recently-used color list per color category.
//! - Persist lists through an injected [`PreferenceStore`].
//!
//! # Invariants
//! - Lists hold at most [`MAX_RECENT_COLORS`] entries, newest first.
//! - A color appears at most once per list.

use crate::repo::memory_repo::{RepoError, RepoResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Mutex;

pub const MAX_RECENT_COLORS: usize = 8;

/// Read/write access to persisted preference lists.
pub trait PreferenceStore {
    /// Returns the stored list, or an empty list when the key is unset.
    fn load(&self, key: &str) -> RepoResult<Vec<String>>;
    fn save(&self, key: &str, values: &[String]) -> RepoResult<()>;
}

/// Process-local store, used by tests and single-shot tools.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<HashMap<String, Vec<String>>>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self, key: &str) -> RepoResult<Vec<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| RepoError::InvalidData("preference store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, values: &[String]) -> RepoResult<()> {
        let mut stored = self
            .values
            .lock()
            .map_err(|_| RepoError::InvalidData("preference store lock poisoned".to_string()))?;
        stored.insert(key.to_string(), values.to_vec());
        Ok(())
    }
}

/// Which color picker a list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    Text,
    Background,
}

impl ColorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Background => "background",
        }
    }

    fn preference_key(self) -> String {
        format!("recent_colors.{}", self.as_str())
    }
}

impl FromStr for ColorCategory {
    type Err = PreferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "background" => Ok(Self::Background),
            other => Err(PreferenceError::UnknownCategory(other.to_string())),
        }
    }
}

/// Service error for preference use-cases.
#[derive(Debug)]
pub enum PreferenceError {
    UnknownCategory(String),
    /// Blank color values are never recorded.
    EmptyColor,
    Repo(RepoError),
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCategory(value) => write!(f, "unknown color category: `{value}`"),
            Self::EmptyColor => write!(f, "color cannot be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PreferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PreferenceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Recent-colors facade over an injected store.
pub struct RecentColors<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> RecentColors<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the list for `category`, newest first.
    pub fn recent_colors(&self, category: ColorCategory) -> Result<Vec<String>, PreferenceError> {
        let mut colors = self.store.load(&category.preference_key())?;
        colors.truncate(MAX_RECENT_COLORS);
        Ok(colors)
    }

    /// Moves `color` to the front of the list for `category` and persists it.
    pub fn record_color(
        &self,
        category: ColorCategory,
        color: &str,
    ) -> Result<Vec<String>, PreferenceError> {
        let color = color.trim();
        if color.is_empty() {
            return Err(PreferenceError::EmptyColor);
        }

        let key = category.preference_key();
        let current = self.store.load(&key)?;
        let updated = push_recent(current, color);
        self.store.save(&key, &updated)?;
        debug!(
            "event=recent_color_record module=service status=ok category={} size={}",
            category.as_str(),
            updated.len()
        );
        Ok(updated)
    }
}

fn push_recent(current: Vec<String>, color: &str) -> Vec<String> {
    let mut updated = Vec::with_capacity(MAX_RECENT_COLORS);
    updated.push(color.to_string());
    updated.extend(current.into_iter().filter(|existing| existing != color));
    updated.truncate(MAX_RECENT_COLORS);
    updated
}
