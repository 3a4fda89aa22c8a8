use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicKeyError {
    #[error("topic key is empty")]
    Empty,
}

/// Identifier of a question topic, e.g. `capitals`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicKey(String);

impl TopicKey {
    /// Creates a `TopicKey` from trimmed, non-empty text.
    ///
    /// # Errors
    ///
    /// Returns `TopicKeyError::Empty` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TopicKeyError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TopicKeyError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicKey({})", self.0)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TopicKey {
    type Err = TopicKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TopicKey {
    type Error = TopicKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicKey> for String {
    fn from(key: TopicKey) -> Self {
        key.0
    }
}

/// A selectable topic and the source file backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    key: TopicKey,
    label: String,
    file_name: String,
}

impl Topic {
    #[must_use]
    pub fn new(key: TopicKey, label: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            file_name: file_name.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &TopicKey {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Ordered set of topics offered on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl TopicCatalog {
    #[must_use]
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// The four topics shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |key: &str, label: &str| {
            Topic::new(TopicKey(key.to_owned()), label, format!("{key}.json"))
        };
        Self::new(vec![
            entry("capitals", "Capitals"),
            entry("general", "General knowledge"),
            entry("idioms", "Idioms"),
            entry("nonsense", "Nonsense"),
        ])
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn get(&self, key: &TopicKey) -> Option<&Topic> {
        self.topics.iter().find(|t| t.key() == key)
    }
}

impl Default for TopicCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_key_trims_and_rejects_blank() {
        let key: TopicKey = "  capitals ".parse().unwrap();
        assert_eq!(key.as_str(), "capitals");
        assert_eq!(key.to_string(), "capitals");
        assert_eq!("   ".parse::<TopicKey>(), Err(TopicKeyError::Empty));
    }

    #[test]
    fn builtin_catalog_maps_keys_to_files() {
        let catalog = TopicCatalog::builtin();
        let keys: Vec<_> = catalog.topics().iter().map(|t| t.key().as_str()).collect();
        assert_eq!(keys, vec!["capitals", "general", "idioms", "nonsense"]);

        let idioms = catalog.get(&TopicKey::new("idioms").unwrap()).unwrap();
        assert_eq!(idioms.file_name(), "idioms.json");
        assert_eq!(idioms.label(), "Idioms");
    }

    #[test]
    fn unknown_key_is_absent() {
        let catalog = TopicCatalog::builtin();
        assert!(catalog.get(&TopicKey::new("weather").unwrap()).is_none());
    }

    #[test]
    fn topic_key_serde_validates() {
        let key: TopicKey = serde_json::from_str("\"general\"").unwrap();
        assert_eq!(key.as_str(), "general");
        assert!(serde_json::from_str::<TopicKey>("\"\"").is_err());
    }
}
