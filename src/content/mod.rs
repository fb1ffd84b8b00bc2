pub mod details;
pub mod seed;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use details::*;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub movie_ids: Vec<String>,
    #[serde(default)]
    pub celebrity_ids: Vec<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub fan_sayings: Vec<FanSaying>,
    pub kind: PostKind,
}

impl Post {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Increase the counter for `label`, adding it when missing.
    pub fn react(&mut self, label: &str) -> u32 {
        match self.reactions.iter_mut().find(|r| r.label == label) {
            Some(reaction) => {
                reaction.count = reaction.count.saturating_add(1);
                reaction.count
            }
            None => {
                self.reactions.push(Reaction {
                    label: label.to_string(),
                    count: 1,
                });
                1
            }
        }
    }

    /// Select or unselect a saying for `fan`. Returns `None` for an unknown phrase.
    pub fn toggle_fan_saying(&mut self, phrase: &str, fan: &str) -> Option<bool> {
        let saying = self.fan_sayings.iter_mut().find(|s| s.phrase == phrase)?;
        Some(saying.toggle(fan))
    }

    pub fn mentions_any<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        ids.into_iter().any(|id| {
            self.movie_ids.iter().any(|m| m == id) || self.celebrity_ids.iter().any(|c| c == id)
        })
    }

    pub fn has_participant(&self, fan: &str) -> bool {
        self.fan_sayings.iter().any(|s| s.selected_by(fan))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub label: String,
    pub count: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct FanSaying {
    pub phrase: String,
    #[serde(default)]
    pub fans: BTreeSet<String>,
}

impl FanSaying {
    #[cfg(test)]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            fans: BTreeSet::new(),
        }
    }

    /// Returns whether `fan` is selected after the toggle.
    pub fn toggle(&mut self, fan: &str) -> bool {
        if self.fans.remove(fan) {
            false
        } else {
            self.fans.insert(fan.to_string());
            true
        }
    }

    pub fn selected_by(&self, fan: &str) -> bool {
        self.fans.contains(fan)
    }
}

/// Decode posts one by one, dropping the ones whose payload does not match their tag.
pub fn decode_posts(items: Vec<Value>) -> Vec<Post> {
    let total = items.len();
    let posts: Vec<Post> = items
        .into_iter()
        .filter_map(|item| {
            let id = item.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(item) {
                Ok(post) => Some(post),
                Err(e) => {
                    warn!("Skipping malformed post {}: {}", id, e);
                    None
                }
            }
        })
        .collect();
    debug!("Decoded {} of {} posts", posts.len(), total);
    posts
}

/// A post before the CMS has assigned it an id.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub movie_ids: Vec<String>,
    #[serde(default)]
    pub celebrity_ids: Vec<String>,
    #[serde(default)]
    pub fan_sayings: Vec<FanSaying>,
    pub kind: PostKind,
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeZone;

    use super::*;

    pub fn post(id: &str, kind: PostKind) -> Post {
        Post {
            id: id.to_string(),
            author: "studio".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
            content: String::new(),
            movie_ids: vec![],
            celebrity_ids: vec![],
            reactions: vec![],
            fan_sayings: vec![],
            kind,
        }
    }

    pub fn trivia(id: &str) -> Post {
        post(
            id,
            PostKind::Trivia {
                movie_title: "Heat".to_string(),
                facts: vec!["Shot in 107 locations".to_string()],
            },
        )
    }

    #[test]
    fn react_creates_then_increments() {
        let mut post = trivia("p1");
        assert_eq!(post.react("🔥"), 1);
        assert_eq!(post.react("🔥"), 2);
        assert_eq!(post.react("👏"), 1);
        assert_eq!(post.reactions.len(), 2);
    }

    #[test]
    fn fan_saying_toggles_membership() {
        let mut post = trivia("p1");
        post.fan_sayings.push(FanSaying::new("Legend!"));

        assert_eq!(post.toggle_fan_saying("Legend!", "u1"), Some(true));
        assert!(post.has_participant("u1"));
        assert_eq!(post.toggle_fan_saying("Legend!", "u1"), Some(false));
        assert!(!post.has_participant("u1"));
        assert_eq!(post.toggle_fan_saying("Unknown", "u1"), None);
    }

    #[test]
    fn mentions_checks_movies_and_celebrities() {
        let mut post = trivia("p1");
        post.movie_ids.push("m1".to_string());
        post.celebrity_ids.push("c1".to_string());

        assert!(post.mentions_any(["c1"]));
        assert!(post.mentions_any(["x", "m1"]));
        assert!(!post.mentions_any(["x"]));
    }

    #[test]
    fn decode_skips_mismatched_payloads() {
        let items = vec![
            serde_json::to_value(trivia("ok")).unwrap(),
            serde_json::json!({
                "id": "bad",
                "author": "studio",
                "timestamp": "2026-10-01T12:00:00Z",
                "kind": { "type": "movieDetails", "data": { "headline": "oops" } }
            }),
        ];
        let posts = decode_posts(items);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id(), "ok");
    }
}
