pub mod feed_view;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::path::PathBuf;

use crate::{
    api::ApiError,
    user::{ProfileUpdate, Role},
};

use feed_view::FeedView;

#[derive(Debug, Clone, Parser)]
#[command(name = "fanz", version, about)]
pub struct Config {
    /// Base URL of the CMS REST API
    #[arg(long, env = "FANZ_API", default_value = "http://localhost:1337/api")]
    api: String,
    /// Token printed by `fanz login`
    #[arg(long, env = "FANZ_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Your user id, used for fan sayings and the activity feed
    #[arg(long, env = "FANZ_USER", default_value = "me")]
    user: String,
    /// Where hype and fan state is kept
    #[arg(long, env = "FANZ_DATA", default_value = "./fanz.db")]
    data: PathBuf,
    /// Limit request concurrency
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..))]
    limit: u16,
    /// Posts requested per page
    #[arg(long, default_value = "25")]
    page_size: u32,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a feed
    Feed {
        #[arg(long, default_value_t = FeedView::Main)]
        view: FeedView,
    },
    /// Show the movies, celebrities, genres and cast known from posts
    Index,
    /// List what you can become a fan of
    Suggestions,
    /// Become (or stop being) a fan of a suggestion
    Fan { id: String },
    /// Hype a movie, three times per week
    Hype { movie: String },
    /// Show this month's hype badges
    Badges,
    /// React to a post
    React { post: String, label: String },
    /// Pick or unpick a fan saying on a post
    Say { post: String, phrase: String },
    /// Log in and print a token
    Login {
        username: String,
        #[arg(long, env = "FANZ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check whether the token is still accepted
    Check,
    /// Show your profile, or update it when any field is given
    Profile(ProfileArgs),
    /// Manage accounts (admin only)
    #[command(subcommand)]
    Users(UsersCommand),
    /// Publish a post from a JSON draft
    Publish { file: PathBuf },
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    display_name: Option<String>,
    #[arg(long)]
    avatar_url: Option<String>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    stars: Option<Vec<String>>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    movies: Option<Vec<String>>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    genres: Option<Vec<String>>,
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        Self {
            display_name: args.display_name,
            avatar_url: args.avatar_url,
            favorite_stars: args.stars,
            favorite_movies: args.movies,
            favorite_genres: args.genres,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsersCommand {
    List,
    Create {
        username: String,
        email: String,
        #[arg(long, env = "FANZ_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value_t = Role::Member)]
        role: Role,
    },
    Role { id: String, role: Role },
    Delete { id: String },
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub fn api(&self) -> &str {
        &self.api
    }
    /// The session token, required by every write
    pub fn token(&self) -> Result<&str, ApiError> {
        self.token.as_deref().ok_or(ApiError::MissingToken)
    }
    pub fn user(&self) -> &str {
        &self.user
    }
    pub const fn data(&self) -> &PathBuf {
        &self.data
    }
    pub fn limit(&self) -> usize {
        usize::from(self.limit)
    }
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}
