pub mod suggestion;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use suggestion::*;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub favorite_stars: Vec<String>,
    #[serde(default)]
    pub favorite_movies: Vec<String>,
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    #[serde(default)]
    pub roles: Roles,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct Roles {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub editor: bool,
}

impl Roles {
    pub const fn can_publish(&self) -> bool {
        self.admin || self.editor
    }
}

/// Partial profile sent to the CMS; unset fields are left untouched.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_stars: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_movies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_genres: Option<Vec<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Account as listed in the admin console.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Session {
    #[serde(rename = "jwt")]
    pub token: String,
    #[serde(rename = "user")]
    pub profile: UserProfile,
}

pub fn display_users(users: &[AdminUser]) {
    if log::log_enabled!(log::Level::Info) {
        let mut users = users.to_vec();
        users.sort_by(|a, b| a.username.cmp(&b.username));

        let (mut id_width, mut name_width) = (4_usize, 10_usize);
        for user in users.iter() {
            id_width = user.id.len().max(id_width);
            name_width = user.username.len().max(name_width);
        }

        log::info!(
            "+-{:-<id_width$}-+-{:-<name_width$}-+-{}------- - -",
            " Id ",
            " Username ",
            " Role "
        );
        for user in users.iter() {
            log::info!(
                "| {:id_width$} | {:name_width$} | {} {}",
                user.id,
                user.username,
                user.role,
                user.email
            );
        }
        log::info!(
            "+-{}-+-{}-+------------ - -",
            "-".repeat(id_width),
            "-".repeat(name_width)
        );
    }
}
