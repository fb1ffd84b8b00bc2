use serde_json::Value;

use super::{decode_posts, Post};

const SEED_POSTS: &str = include_str!("../../seed/posts.json");

/// Posts shipped with the binary, shown when the CMS cannot be reached.
pub fn seed_posts() -> Result<Vec<Post>, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_str(SEED_POSTS)?;
    Ok(decode_posts(items))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn every_seed_post_decodes() {
        let raw: Vec<Value> = serde_json::from_str(SEED_POSTS).unwrap();
        let posts = seed_posts().unwrap();
        assert_eq!(posts.len(), raw.len());
    }

    #[test]
    fn seed_covers_every_kind() {
        let kinds: BTreeSet<&str> = seed_posts()
            .unwrap()
            .iter()
            .map(|post| post.kind.tag())
            .collect();
        assert_eq!(kinds.len(), 14);
    }
}
