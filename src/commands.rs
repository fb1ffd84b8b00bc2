use std::{error::Error, fs::File, io::BufReader};

use chrono::Local;
use log::{info, warn};

use crate::{
    api::cms::CmsClient,
    config::{feed_view::FeedView, Config, ProfileArgs, UsersCommand},
    content::{Post, PostDraft},
    engagement::{self, load_posts},
    feed::compose,
    hype::{HypeOutcome, WEEKLY_LIMIT},
    index::{build_index, display_index},
    render::render_post,
    store::LocalStore,
    unit_short,
    user::{display_users, NewUser, ProfileUpdate, Suggestions, UserProfile},
};

type CommandResult = Result<(), Box<dyn Error>>;

fn suggestions(store: &LocalStore) -> Result<Suggestions, Box<dyn Error>> {
    let mut suggestions = Suggestions::seed()?;
    suggestions.restore_fanned(&store.load_fanned()?);
    Ok(suggestions)
}

pub async fn feed(config: &Config, client: &CmsClient, view: FeedView) -> CommandResult {
    let posts: Vec<Post> = unit_short!("Loading posts", load_posts(client).await);
    let index = build_index(&posts);
    let store = LocalStore::open(config.data())?;
    let suggestions = suggestions(&store)?;

    let now = Local::now();
    let feed = compose(view, &posts, &suggestions, config.user());
    info!("{} feed: {} of {} posts", view, feed.len(), posts.len());
    if feed.is_empty() && view == FeedView::Favorites {
        info!("Become a fan of something first (see `fanz suggestions`)");
    }
    for post in feed {
        println!("<!-- {} -->", post.id());
        println!("{}", render_post(post, &index, &now));
        println!("---");
    }
    Ok(())
}

pub async fn index(client: &CmsClient) -> CommandResult {
    let posts = unit_short!("Loading posts", load_posts(client).await);
    let index = build_index(&posts);
    if index.is_empty() {
        info!("Nothing to index yet");
        return Ok(());
    }
    display_index(&index);
    Ok(())
}

pub fn list_suggestions(config: &Config) -> CommandResult {
    let store = LocalStore::open(config.data())?;
    let suggestions = suggestions(&store)?;
    if suggestions.is_empty() {
        info!("No suggestions");
        return Ok(());
    }

    info!("{} suggestions", suggestions.len());
    info!("Fan of:");
    for suggestion in suggestions.fanned() {
        info!(" + {} ({})", suggestion.name, suggestion.id);
    }
    info!("Suggested:");
    for suggestion in suggestions.unfanned() {
        info!(" - {} ({})", suggestion.name, suggestion.id);
    }
    Ok(())
}

pub fn fan(config: &Config, id: &str) -> CommandResult {
    let mut store = LocalStore::open(config.data())?;
    let mut suggestions = suggestions(&store)?;

    match suggestions.toggle_fan(id) {
        Some(true) => info!("You are now a fan of {}", id),
        Some(false) => info!("You are no longer a fan of {}", id),
        None => {
            warn!("Unknown suggestion {}", id);
            return Ok(());
        }
    }
    store.save_fanned(&suggestions)?;
    Ok(())
}

pub fn hype(config: &Config, movie: &str) -> CommandResult {
    let now = Local::now();
    let mut store = LocalStore::open(config.data())?;
    let mut tracker = store.load_tracker(now)?;

    match tracker.request_hype(movie, now) {
        HypeOutcome::Granted { remaining } => {
            info!("Hyped {} ({}/{} left this week)", movie, remaining, WEEKLY_LIMIT);
            if let Some(tier) = tracker.badge(movie, &now) {
                info!("Badge this month: {}", tier);
            }
        }
        HypeOutcome::Exhausted => {
            warn!("No hype left this week, it refills on Monday");
        }
    }
    store.save_tracker(&tracker)?;
    Ok(())
}

pub fn badges(config: &Config) -> CommandResult {
    let now = Local::now();
    let store = LocalStore::open(config.data())?;
    let tracker = store.load_tracker(now)?;

    info!("{}/{} hypes left this week", tracker.remaining_at(&now), WEEKLY_LIMIT);
    let badges = tracker.monthly_badges(&now);
    if badges.is_empty() {
        info!("No badges this month");
    }
    for (movie, tier) in badges {
        info!(" + {}: {}", movie, tier);
    }
    Ok(())
}

pub async fn react(config: &Config, client: &CmsClient, post: &str, label: &str) -> CommandResult {
    let token = config.token()?;
    let mut posts = load_posts(client).await;
    let count = engagement::react(client, token, &mut posts, post, label).await?;
    info!("{} {} on {}", label, count, post);
    Ok(())
}

pub async fn say(config: &Config, client: &CmsClient, post: &str, phrase: &str) -> CommandResult {
    let token = config.token()?;
    let mut posts = load_posts(client).await;
    let picked =
        engagement::toggle_fan_saying(client, token, &mut posts, post, phrase, config.user())
            .await?;
    match picked {
        Some(true) => info!("You said \"{}\"", phrase),
        Some(false) => info!("You took back \"{}\"", phrase),
        None => {}
    }
    Ok(())
}

pub async fn login(client: &CmsClient, username: &str, password: &str) -> CommandResult {
    let session = client.login(username, password).await?;
    display_profile(&session.profile);
    println!("{}", session.token);
    Ok(())
}

pub async fn check(config: &Config, client: &CmsClient) -> CommandResult {
    let token = config.token()?;
    if client.validate_token(token).await? {
        info!("Token is valid");
    } else {
        warn!("Token was rejected, log in again");
    }
    Ok(())
}

pub async fn profile(config: &Config, client: &CmsClient, args: ProfileArgs) -> CommandResult {
    let token = config.token()?;
    let update = ProfileUpdate::from(args);
    let profile = if update.is_empty() {
        client.get_current_user(token).await?
    } else {
        let profile = client.update_current_user(token, &update).await?;
        info!("Profile updated");
        profile
    };
    display_profile(&profile);
    Ok(())
}

fn display_profile(profile: &UserProfile) {
    info!("{} (@{})", profile.name(), profile.username);
    info!(" + Stars: {}", profile.favorite_stars.join(", "));
    info!(" + Movies: {}", profile.favorite_movies.join(", "));
    info!(" + Genres: {}", profile.favorite_genres.join(", "));
    if profile.roles.admin {
        info!(" + admin");
    }
    if profile.roles.editor {
        info!(" + editor");
    }
}

pub async fn users(config: &Config, client: &CmsClient, command: UsersCommand) -> CommandResult {
    let token = config.token()?;
    match command {
        UsersCommand::List => {
            let users = client.list_users(token).await?;
            info!("{} users", users.len());
            display_users(&users);
        }
        UsersCommand::Create {
            username,
            email,
            password,
            role,
        } => {
            let user = NewUser {
                username,
                email,
                password,
                role,
            };
            let created = client.create_user(token, &user).await?;
            info!("Created {} ({}) as {}", created.username, created.id, created.role);
        }
        UsersCommand::Role { id, role } => {
            let updated = client.update_user_role(token, &id, role).await?;
            info!("{} is now {}", updated.username, updated.role);
        }
        UsersCommand::Delete { id } => {
            client.delete_user(token, &id).await?;
            info!("Deleted {}", id);
        }
    }
    Ok(())
}

pub async fn publish(config: &Config, client: &CmsClient, file: &std::path::Path) -> CommandResult {
    let token = config.token()?;
    let profile = client.get_current_user(token).await?;
    engagement::ensure_publisher(&profile)?;

    let reader = BufReader::new(File::open(file)?);
    let draft: PostDraft = serde_json::from_reader(reader)?;
    let mut posts = load_posts(client).await;
    let post = engagement::publish(client, token, &mut posts, &draft).await?;
    info!("Post {} is live, {} posts in the feed", post.id(), posts.len());

    let index = build_index(&posts);
    println!("{}", render_post(&post, &index, &Local::now()));
    Ok(())
}
