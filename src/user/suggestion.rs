use std::collections::HashSet;

use serde::{Deserialize, Serialize};

const SEED_SUGGESTIONS: &str = include_str!("../../seed/suggestions.json");

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Topic,
    Celebrity,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Linked {
    Movie(String),
    Celebrity(String),
}

impl Linked {
    pub fn id(&self) -> &str {
        match self {
            Self::Movie(id) | Self::Celebrity(id) => id,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub kind: SuggestionKind,
    #[serde(default)]
    pub is_fanned: bool,
    #[serde(default)]
    pub linked: Option<Linked>,
}

/// The fannable entities, owned by whoever drives the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions(Vec<Suggestion>);

impl Suggestions {
    #[cfg(test)]
    pub fn new(list: Vec<Suggestion>) -> Self {
        Self(list)
    }

    pub fn seed() -> Result<Self, serde_json::Error> {
        Ok(Self(serde_json::from_str(SEED_SUGGESTIONS)?))
    }

    /// Flip `is_fanned`. Returns the new value, or `None` for an unknown id.
    pub fn toggle_fan(&mut self, id: &str) -> Option<bool> {
        let suggestion = self.0.iter_mut().find(|s| s.id == id)?;
        suggestion.is_fanned = !suggestion.is_fanned;
        Some(suggestion.is_fanned)
    }

    /// Mark the given ids as fanned and everything else as not.
    pub fn restore_fanned(&mut self, fanned: &HashSet<String>) {
        for suggestion in self.0.iter_mut() {
            suggestion.is_fanned = fanned.contains(&suggestion.id);
        }
    }

    pub fn fanned(&self) -> impl Iterator<Item = &Suggestion> {
        self.0.iter().filter(|s| s.is_fanned)
    }

    pub fn unfanned(&self) -> impl Iterator<Item = &Suggestion> {
        self.0.iter().filter(|s| !s.is_fanned)
    }

    /// Movie and celebrity ids reachable from fanned suggestions.
    pub fn fanned_links(&self) -> HashSet<&str> {
        self.fanned()
            .filter_map(|s| s.linked.as_ref().map(Linked::id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
