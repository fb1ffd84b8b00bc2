use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
pub enum FeedView {
    /// Every post
    #[default]
    Main,
    /// Posts about fanned movies and celebrities
    Favorites,
    /// Posts where you picked a fan saying
    Activity,
}

impl fmt::Display for FeedView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Favorites => write!(f, "favorites"),
            Self::Activity => write!(f, "activity"),
        }
    }
}
