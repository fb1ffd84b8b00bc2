use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub runtime_minutes: Option<u32>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub known_for: Vec<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Title-only reference to a movie, as listed in a filmography.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct FilmographyItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub category: String,
    pub nominee: String,
    #[serde(default)]
    pub won: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct BoxOfficeEntry {
    pub region: String,
    pub amount: u64,
    pub currency: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ProjectStatus {
    Announced,
    PreProduction,
    Filming,
    PostProduction,
    Completed,
}

/// Payload of a post, one variant per content kind.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type", content = "data")]
pub enum PostKind {
    Image {
        media: Vec<Media>,
        #[serde(default)]
        caption: String,
    },
    #[serde(rename_all = "camelCase")]
    Announcement { headline: String, body_html: String },
    #[serde(rename_all = "camelCase")]
    ProjectAnnouncement {
        title: String,
        studio: String,
        director: String,
        status: ProjectStatus,
        #[serde(default)]
        expected_release: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Trailer {
        movie_title: String,
        video_url: String,
        #[serde(default)]
        duration_secs: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Anniversary {
        movie_title: String,
        release_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    Birthday {
        celebrity_name: String,
        birth_date: NaiveDate,
        #[serde(default)]
        photo_url: Option<String>,
    },
    MovieDetails(MovieDetails),
    #[serde(rename_all = "camelCase")]
    CharacterIntroduction {
        character_name: String,
        actor_name: String,
        movie_title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        image_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Countdown {
        movie_title: String,
        release_at: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    Filmography {
        celebrity_name: String,
        items: Vec<FilmographyItem>,
    },
    Awards {
        event: String,
        year: i32,
        awards: Vec<Award>,
    },
    Celebrity(CelebrityDetails),
    #[serde(rename_all = "camelCase")]
    BoxOffice {
        movie_title: String,
        period: String,
        entries: Vec<BoxOfficeEntry>,
    },
    #[serde(rename_all = "camelCase")]
    Trivia {
        movie_title: String,
        facts: Vec<String>,
    },
}

impl PostKind {
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Announcement { .. } => "announcement",
            Self::ProjectAnnouncement { .. } => "projectAnnouncement",
            Self::Trailer { .. } => "trailer",
            Self::Anniversary { .. } => "anniversary",
            Self::Birthday { .. } => "birthday",
            Self::MovieDetails(_) => "movieDetails",
            Self::CharacterIntroduction { .. } => "characterIntroduction",
            Self::Countdown { .. } => "countdown",
            Self::Filmography { .. } => "filmography",
            Self::Awards { .. } => "awards",
            Self::Celebrity(_) => "celebrity",
            Self::BoxOffice { .. } => "boxOffice",
            Self::Trivia { .. } => "trivia",
        }
    }
}
