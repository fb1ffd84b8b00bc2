use log::{error, info, warn};

use crate::{
    api::{ApiError, ContentStore},
    content::{seed::seed_posts, Post, PostDraft},
    user::UserProfile,
};

/// Posts from the CMS, or the bundled seed posts when the CMS is unreachable.
pub async fn load_posts(store: &impl ContentStore) -> Vec<Post> {
    match store.list_posts().await {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Failed to load posts ({}), showing bundled posts", e);
            seed_posts().unwrap_or_else(|e| {
                error!("Bundled posts are unreadable: {}", e);
                vec![]
            })
        }
    }
}

pub async fn react(
    store: &impl ContentStore,
    token: &str,
    posts: &mut [Post],
    post_id: &str,
    label: &str,
) -> Result<u32, ApiError> {
    optimistic(store, token, posts, post_id, |post| post.react(label)).await
}

/// Toggle `fan` on a saying. `Ok(None)` when the post has no such phrase.
pub async fn toggle_fan_saying(
    store: &impl ContentStore,
    token: &str,
    posts: &mut [Post],
    post_id: &str,
    phrase: &str,
    fan: &str,
) -> Result<Option<bool>, ApiError> {
    let post = find(posts, post_id)?;
    if !post.fan_sayings.iter().any(|s| s.phrase == phrase) {
        warn!("Post {} has no saying \"{}\"", post_id, phrase);
        return Ok(None);
    }
    optimistic(store, token, posts, post_id, |post| {
        post.toggle_fan_saying(phrase, fan)
    })
    .await
}

/// Only admins and editors may publish.
pub fn ensure_publisher(profile: &UserProfile) -> Result<(), ApiError> {
    if profile.roles.can_publish() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(profile.username.clone()))
    }
}

pub async fn publish(
    store: &impl ContentStore,
    token: &str,
    posts: &mut Vec<Post>,
    draft: &PostDraft,
) -> Result<Post, ApiError> {
    let post = store.create_post(token, draft).await?;
    info!("Published {} ({})", post.id(), post.kind.tag());
    posts.insert(0, post.clone());
    Ok(post)
}

fn find<'a>(posts: &'a mut [Post], post_id: &str) -> Result<&'a mut Post, ApiError> {
    posts
        .iter_mut()
        .find(|p| p.id == post_id)
        .ok_or_else(|| ApiError::PostNotFound(post_id.to_string()))
}

// Apply locally first; a failed write puts the post back as it was.
async fn optimistic<R>(
    store: &impl ContentStore,
    token: &str,
    posts: &mut [Post],
    post_id: &str,
    apply: impl FnOnce(&mut Post) -> R,
) -> Result<R, ApiError> {
    let post = find(posts, post_id)?;
    let snapshot = post.clone();
    let result = apply(post);

    match store.update_post(token, post_id, post).await {
        Ok(saved) => {
            *post = saved;
            Ok(result)
        }
        Err(e) => {
            error!("Failed to save post {}: {}", post_id, e);
            *post = snapshot;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{
        content::{tests::trivia, FanSaying, PostKind},
        user::Roles,
    };

    #[derive(Default)]
    struct FakeStore {
        posts: Option<Vec<Post>>,
        fail_writes: bool,
        writes: RefCell<Vec<Post>>,
        created: Cell<usize>,
    }

    impl ContentStore for FakeStore {
        async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
            self.posts.clone().ok_or(ApiError::Backend {
                status: 503,
                message: "down".to_string(),
            })
        }

        async fn create_post(&self, _token: &str, draft: &PostDraft) -> Result<Post, ApiError> {
            self.created.set(self.created.get() + 1);
            let mut post = trivia(&format!("new-{}", self.created.get()));
            post.author = draft.author.clone();
            post.content = draft.content.clone();
            post.kind = draft.kind.clone();
            Ok(post)
        }

        async fn update_post(&self, _token: &str, id: &str, post: &Post) -> Result<Post, ApiError> {
            if self.fail_writes {
                return Err(ApiError::Backend {
                    status: 500,
                    message: format!("cannot save {}", id),
                });
            }
            self.writes.borrow_mut().push(post.clone());
            Ok(post.clone())
        }
    }

    fn posts() -> Vec<Post> {
        let mut post = trivia("p1");
        post.fan_sayings.push(FanSaying::new("Legend!"));
        vec![post, trivia("p2")]
    }

    #[tokio::test]
    async fn load_uses_remote_posts() {
        let store = FakeStore {
            posts: Some(vec![trivia("remote")]),
            ..Default::default()
        };
        let posts = load_posts(&store).await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id(), "remote");
    }

    #[tokio::test]
    async fn load_falls_back_to_seed() {
        let posts = load_posts(&FakeStore::default()).await;
        assert_eq!(posts, seed_posts().unwrap());
        assert!(!posts.is_empty());
    }

    #[tokio::test]
    async fn reaction_is_written_back() {
        let store = FakeStore::default();
        let mut posts = posts();

        assert_eq!(react(&store, "t", &mut posts, "p1", "🔥").await.unwrap(), 1);
        assert_eq!(posts[0].reactions[0].count, 1);
        assert_eq!(store.writes.borrow().len(), 1);
        assert_eq!(store.writes.borrow()[0].reactions[0].label, "🔥");
    }

    #[tokio::test]
    async fn failed_write_rolls_back() {
        let store = FakeStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut posts = posts();
        let before = posts.clone();

        assert!(react(&store, "t", &mut posts, "p1", "🔥").await.is_err());
        assert!(toggle_fan_saying(&store, "t", &mut posts, "p1", "Legend!", "u1")
            .await
            .is_err());
        assert_eq!(posts, before);
    }

    #[tokio::test]
    async fn fan_saying_toggle_round_trip() {
        let store = FakeStore::default();
        let mut posts = posts();

        let on = toggle_fan_saying(&store, "t", &mut posts, "p1", "Legend!", "u1").await;
        assert_eq!(on.unwrap(), Some(true));
        assert!(posts[0].has_participant("u1"));

        let unknown = toggle_fan_saying(&store, "t", &mut posts, "p1", "Nope", "u1").await;
        assert_eq!(unknown.unwrap(), None);
        assert_eq!(store.writes.borrow().len(), 1);
    }

    #[tokio::test]
    async fn unknown_post_is_an_error() {
        let store = FakeStore::default();
        let mut posts = posts();
        let result = react(&store, "t", &mut posts, "missing", "🔥").await;
        assert!(matches!(result, Err(ApiError::PostNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn published_post_goes_first() {
        let store = FakeStore::default();
        let mut posts = posts();
        let draft = PostDraft {
            author: "editor".to_string(),
            content: "Out now".to_string(),
            movie_ids: vec![],
            celebrity_ids: vec![],
            fan_sayings: vec![],
            kind: PostKind::Trivia {
                movie_title: "Heat".to_string(),
                facts: vec![],
            },
        };

        let post = publish(&store, "t", &mut posts, &draft).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0], post);
        assert_eq!(posts[0].author, "editor");
    }

    #[test]
    fn only_admins_and_editors_publish() {
        let mut profile = UserProfile {
            id: "u1".into(),
            username: "ana".into(),
            ..Default::default()
        };
        let denied = ensure_publisher(&profile);
        assert!(matches!(denied, Err(ApiError::Forbidden(name)) if name == "ana"));
        assert!(!ensure_publisher(&profile).unwrap_err().is_unauthorized());

        profile.roles = Roles {
            admin: false,
            editor: true,
        };
        assert!(ensure_publisher(&profile).is_ok());
    }
}
