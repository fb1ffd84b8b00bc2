use crate::{config::feed_view::FeedView, content::Post, user::Suggestions};

/// All posts, newest first.
pub fn main_feed(posts: &[Post]) -> Vec<&Post> {
    let mut feed: Vec<&Post> = posts.iter().collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed
}

/// Posts linked to a movie or celebrity the user is a fan of.
pub fn favorites_feed<'a>(posts: &'a [Post], suggestions: &Suggestions) -> Vec<&'a Post> {
    let links = suggestions.fanned_links();
    if links.is_empty() {
        return vec![];
    }
    main_feed(posts)
        .into_iter()
        .filter(|post| post.mentions_any(links.iter().copied()))
        .collect()
}

/// Posts where `user_id` picked at least one fan saying.
pub fn activity_feed<'a>(posts: &'a [Post], user_id: &str) -> Vec<&'a Post> {
    main_feed(posts)
        .into_iter()
        .filter(|post| post.has_participant(user_id))
        .collect()
}

pub fn compose<'a>(
    view: FeedView,
    posts: &'a [Post],
    suggestions: &Suggestions,
    user_id: &str,
) -> Vec<&'a Post> {
    match view {
        FeedView::Main => main_feed(posts),
        FeedView::Favorites => favorites_feed(posts, suggestions),
        FeedView::Activity => activity_feed(posts, user_id),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        content::{tests::trivia, FanSaying},
        user::{Linked, Suggestion, SuggestionKind},
    };

    fn posts() -> Vec<Post> {
        let mut old = trivia("old");
        old.movie_ids.push("m1".to_string());

        let mut new = trivia("new");
        new.timestamp = old.timestamp + Duration::hours(2);
        new.celebrity_ids.push("c1".to_string());
        let mut saying = FanSaying::new("Legend!");
        saying.toggle("u1");
        new.fan_sayings.push(saying);

        let other = trivia("other");
        vec![old, new, other]
    }

    fn suggestions(fanned: &[(&str, Linked)]) -> Suggestions {
        Suggestions::new(
            fanned
                .iter()
                .map(|(id, linked)| Suggestion {
                    id: id.to_string(),
                    name: id.to_string(),
                    kind: SuggestionKind::Topic,
                    is_fanned: true,
                    linked: Some(linked.clone()),
                })
                .collect(),
        )
    }

    fn ids(feed: Vec<&Post>) -> Vec<&str> {
        feed.into_iter().map(Post::id).collect()
    }

    #[test]
    fn main_feed_is_newest_first() {
        let posts = posts();
        let feed = ids(main_feed(&posts));
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0], "new");
    }

    #[test]
    fn favorites_follow_fanned_links() {
        let posts = posts();
        let fans = suggestions(&[("s1", Linked::Movie("m1".into()))]);
        assert_eq!(ids(favorites_feed(&posts, &fans)), vec!["old"]);

        let fans = suggestions(&[
            ("s1", Linked::Movie("m1".into())),
            ("s2", Linked::Celebrity("c1".into())),
        ]);
        assert_eq!(ids(favorites_feed(&posts, &fans)), vec!["new", "old"]);
    }

    #[test]
    fn unfanned_suggestions_do_not_count() {
        let posts = posts();
        let mut fans = suggestions(&[("s1", Linked::Movie("m1".into()))]);
        fans.toggle_fan("s1");
        assert!(favorites_feed(&posts, &fans).is_empty());
    }

    #[test]
    fn activity_lists_posts_with_user_sayings() {
        let posts = posts();
        assert_eq!(ids(activity_feed(&posts, "u1")), vec!["new"]);
        assert!(activity_feed(&posts, "u2").is_empty());
    }

    #[test]
    fn compose_dispatches_on_view() {
        let posts = posts();
        let fans = Suggestions::default();
        assert_eq!(compose(FeedView::Main, &posts, &fans, "u1").len(), 3);
        assert!(compose(FeedView::Favorites, &posts, &fans, "u1").is_empty());
        assert_eq!(compose(FeedView::Activity, &posts, &fans, "u1").len(), 1);
    }
}
