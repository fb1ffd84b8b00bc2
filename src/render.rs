use std::fmt::{Display, Write};

use chrono::{DateTime, Datelike, TimeZone};
use log::warn;
use mime_guess::MimeGuess;

use crate::{
    calendar::{days_until, time_ago, years_since},
    content::{Media, MovieDetails, Post, PostKind, ProjectStatus},
    index::DerivedIndex,
};

/// Markdown for one post: header, kind-specific body, then engagement.
pub fn render_post<Tz: TimeZone>(post: &Post, index: &DerivedIndex, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    let _ = writeln!(out, "**{}** · {}", post.author, time_ago(&post.timestamp, now));
    if !post.content.is_empty() {
        let _ = writeln!(out, "\n{}", post.content);
    }
    out.push('\n');
    out.push_str(&render_kind(&post.kind, now));

    let linked: Vec<&str> = post
        .movie_ids
        .iter()
        .filter_map(|id| index.movie(id).map(|m| m.title()))
        .chain(
            post.celebrity_ids
                .iter()
                .filter_map(|id| index.celebrity(id).map(|c| c.name.as_str())),
        )
        .collect();
    if !linked.is_empty() {
        let _ = writeln!(out, "\n_About: {}_", linked.join(", "));
    }

    if !post.reactions.is_empty() {
        let reactions: Vec<String> = post
            .reactions
            .iter()
            .map(|r| format!("{} {}", r.label, r.count))
            .collect();
        let _ = writeln!(out, "\n{}", reactions.join("  "));
    }
    for saying in post.fan_sayings.iter() {
        let _ = writeln!(out, "> \"{}\" ({} fans)", saying.phrase, saying.fans.len());
    }
    out
}

fn render_kind<Tz: TimeZone>(kind: &PostKind, now: &DateTime<Tz>) -> String {
    let mut out = String::new();
    match kind {
        PostKind::Image { media, caption } => {
            for item in media {
                let _ = writeln!(out, "{}", render_media(item));
            }
            if !caption.is_empty() {
                let _ = writeln!(out, "_{}_", caption);
            }
        }
        PostKind::Announcement {
            headline,
            body_html,
        } => {
            let _ = writeln!(out, "## 📣 {}\n\n{}", headline, html_to_markdown(body_html));
        }
        PostKind::ProjectAnnouncement {
            title,
            studio,
            director,
            status,
            expected_release,
        } => {
            let _ = writeln!(out, "## 🎬 New project: {}", title);
            let _ = writeln!(out, "- Studio: {}\n- Director: {}", studio, director);
            let _ = writeln!(out, "- Status: {}", status_label(status));
            if let Some(date) = expected_release {
                let _ = writeln!(out, "- Expected: {}", date.format("%B %Y"));
            }
        }
        PostKind::Trailer {
            movie_title,
            video_url,
            duration_secs,
        } => {
            let _ = write!(out, "## ▶ {} trailer", movie_title);
            if let Some(secs) = duration_secs {
                let _ = write!(out, " ({}:{:02})", secs / 60, secs % 60);
            }
            let _ = writeln!(out, "\n\n[Watch]({})", video_url);
        }
        PostKind::Anniversary {
            movie_title,
            release_date,
        } => {
            let years = years_since(*release_date, now);
            let _ = writeln!(
                out,
                "## 🎉 {} years of {}\n\nReleased {}",
                years,
                movie_title,
                release_date.format("%B %-d, %Y")
            );
        }
        PostKind::Birthday {
            celebrity_name,
            birth_date,
            photo_url,
        } => {
            let age = years_since(*birth_date, now);
            let today = now.date_naive();
            let _ = if (today.month(), today.day()) == (birth_date.month(), birth_date.day()) {
                writeln!(out, "## 🎂 Happy birthday, {}! ({} today)", celebrity_name, age)
            } else {
                writeln!(
                    out,
                    "## 🎂 {}\n\nBorn {} (age {})",
                    celebrity_name,
                    birth_date.format("%B %-d, %Y"),
                    age
                )
            };
            if let Some(url) = photo_url {
                let _ = writeln!(out, "\n![{}]({})", celebrity_name, url);
            }
        }
        PostKind::MovieDetails(details) => out.push_str(&render_movie(details)),
        PostKind::CharacterIntroduction {
            character_name,
            actor_name,
            movie_title,
            description,
            image_url,
        } => {
            let _ = writeln!(
                out,
                "## Meet {}\n\nPlayed by {} in _{}_",
                character_name, actor_name, movie_title
            );
            if !description.is_empty() {
                let _ = writeln!(out, "\n{}", description);
            }
            if let Some(url) = image_url {
                let _ = writeln!(out, "\n![{}]({})", character_name, url);
            }
        }
        PostKind::Countdown {
            movie_title,
            release_at,
        } => {
            let days = days_until(release_at, now);
            let _ = match days {
                d if d > 1 => writeln!(out, "## ⏳ {} days until {}", d, movie_title),
                1 => writeln!(out, "## ⏳ {} opens tomorrow", movie_title),
                0 => writeln!(out, "## 🍿 {} opens today", movie_title),
                _ => writeln!(out, "## 🍿 {} is out now", movie_title),
            };
        }
        PostKind::Filmography {
            celebrity_name,
            items,
        } => {
            let _ = writeln!(out, "## Filmography of {}", celebrity_name);
            let mut items = items.clone();
            items.sort_by(|a, b| b.year.cmp(&a.year));
            for item in items {
                let year = item.year.map(|y| y.to_string()).unwrap_or_else(|| "TBA".into());
                let _ = write!(out, "- {} · {}", year, item.title);
                if let Some(role) = item.role {
                    let _ = write!(out, " ({})", role);
                }
                out.push('\n');
            }
        }
        PostKind::Awards {
            event,
            year,
            awards,
        } => {
            let _ = writeln!(out, "## 🏆 {} {}", event, year);
            for award in awards {
                let mark = if award.won { "🏆" } else { "·" };
                let _ = writeln!(out, "- {} {}: {}", mark, award.category, award.nominee);
            }
        }
        PostKind::Celebrity(details) => {
            let _ = writeln!(out, "## ⭐ {}", details.name);
            if !details.profession.is_empty() {
                let _ = writeln!(out, "_{}_", details.profession);
            }
            if !details.bio.is_empty() {
                let _ = writeln!(out, "\n{}", details.bio);
            }
            if !details.known_for.is_empty() {
                let _ = writeln!(out, "\nKnown for: {}", details.known_for.join(", "));
            }
        }
        PostKind::BoxOffice {
            movie_title,
            period,
            entries,
        } => {
            let _ = writeln!(out, "## 💰 {} box office ({})", movie_title, period);
            for entry in entries {
                let _ = writeln!(
                    out,
                    "- {}: {} {}",
                    entry.region,
                    group_thousands(entry.amount),
                    entry.currency
                );
            }
        }
        PostKind::Trivia { movie_title, facts } => {
            let _ = writeln!(out, "## 💡 Did you know? ({})", movie_title);
            for fact in facts {
                let _ = writeln!(out, "- {}", fact);
            }
        }
    }
    out
}

fn render_movie(details: &MovieDetails) -> String {
    let mut out = String::new();
    let _ = write!(out, "## {}", details.title);
    if let Some(date) = details.release_date {
        let _ = write!(out, " ({})", date.format("%Y"));
    }
    out.push('\n');
    if let Some(rating) = details.rating {
        let _ = writeln!(out, "⭐ {:.1}/10", rating);
    }
    if !details.director.is_empty() {
        let _ = writeln!(out, "- Director: {}", details.director);
    }
    if !details.cast.is_empty() {
        let _ = writeln!(out, "- Cast: {}", details.cast.join(", "));
    }
    if !details.genres.is_empty() {
        let _ = writeln!(out, "- Genres: {}", details.genres.join(" / "));
    }
    if let Some(minutes) = details.runtime_minutes {
        let _ = writeln!(out, "- Runtime: {}h {:02}m", minutes / 60, minutes % 60);
    }
    if !details.synopsis.is_empty() {
        let _ = writeln!(out, "\n{}", details.synopsis);
    }
    out
}

fn render_media(media: &Media) -> String {
    let mime = MimeGuess::from_path(media.url.split('?').next().unwrap_or(&media.url))
        .first_or_octet_stream();
    match mime.type_() {
        mime_guess::mime::VIDEO => format!("[▶ {}]({})", label(&media.alt, "video"), media.url),
        _ => format!("![{}]({})", media.alt, media.url),
    }
}

fn label<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

fn html_to_markdown(html: &str) -> String {
    match htmd::convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            warn!("Failed to convert announcement body: {}", e);
            html.to_string()
        }
    }
}

const fn status_label(status: &ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Announced => "announced",
        ProjectStatus::PreProduction => "pre-production",
        ProjectStatus::Filming => "filming",
        ProjectStatus::PostProduction => "post-production",
        ProjectStatus::Completed => "completed",
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
