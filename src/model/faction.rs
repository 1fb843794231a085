use serde::{Deserialize, Serialize};

/// Rating system used by factions that do not define their own.
pub const STANDARD_RATING_LEVELS: &[&str] = &["F", "D", "C", "B", "A"];

/// A faction as seen by the table provider. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRecord {
    pub key: String,
    pub name: String,
    /// Rating labels from worst to best. Empty means the standard system.
    #[serde(default)]
    pub rating_levels: Vec<String>,
    /// Keys of parent factions, nearest first.
    #[serde(default)]
    pub parent_factions: Vec<String>,
    /// Other codes this faction answers to (e.g. older or campaign-side keys).
    #[serde(default)]
    pub alternative_codes: Vec<String>,
}

impl FactionRecord {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            rating_levels: Vec::new(),
            parent_factions: Vec::new(),
            alternative_codes: Vec::new(),
        }
    }

    pub fn with_rating_levels(mut self, levels: &[&str]) -> Self {
        self.rating_levels = levels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_parents(mut self, parents: &[&str]) -> Self {
        self.parent_factions = parents.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_alternative_codes(mut self, codes: &[&str]) -> Self {
        self.alternative_codes = codes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// The labels quality indices map onto: the faction's own levels, or the
    /// standard system when it defines none.
    pub fn rating_level_system(&self) -> Vec<&str> {
        if self.rating_levels.is_empty() {
            STANDARD_RATING_LEVELS.to_vec()
        } else {
            self.rating_levels.iter().map(String::as_str).collect()
        }
    }

    pub fn answers_to(&self, code: &str) -> bool {
        self.key == code || self.alternative_codes.iter().any(|c| c == code)
    }
}
