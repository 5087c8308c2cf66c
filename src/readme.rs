// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Renders a [`ProfileSnapshot`] into a Markdown template.
///
/// Templates reference sections through `{{ KEY }}` placeholders. Rendering
/// is a pure function of the snapshot, the context and the template text;
/// an unknown key fails the whole render instead of leaving the placeholder
/// in the output.
use std::{fs, path::Path};

use regex::Regex;
use tracing::{debug, info};

use crate::{
    badge,
    config::SocialLinks,
    error::{self, Error},
    insights::{self, ChartEntry, DEFAULT_CHART_LANGUAGES, EMPTY_CHART},
    model::{Achievements, ProfileSnapshot}
};

const PLACEHOLDER_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}";

/// Presentation settings that are not part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub header_image: Option<String>,
    pub social:       SocialLinks
}

/// Replaces every placeholder in `template`.
///
/// # Errors
///
/// Returns [`Error::Template`] when the template references an unknown key.
///
/// # Example
///
/// ```no_run
/// use profile_dynamo::{ProfileSnapshot, RenderContext, render_readme};
///
/// # fn example(snapshot: &ProfileSnapshot) -> Result<(), profile_dynamo::Error> {
/// let rendered = render_readme(snapshot, "# Hi, {{ USERNAME }}", &RenderContext::default())?;
/// assert!(rendered.starts_with("# Hi, "));
/// # Ok(())
/// # }
/// ```
pub fn render_readme(snapshot: &ProfileSnapshot, template: &str, context: &RenderContext) -> Result<String, Error> {
    let pattern =
        Regex::new(PLACEHOLDER_PATTERN).map_err(|e| Error::template(format!("invalid placeholder pattern: {e}")))?;

    let mut rendered = String::with_capacity(template.len() * 2);
    let mut last = 0;
    for captures in pattern.captures_iter(template) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&render_section(key.as_str(), snapshot, context)?);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    Ok(rendered)
}

/// Reads the template at `template_path`, renders it and writes the result to
/// `output_path`.
///
/// # Errors
///
/// Returns [`Error::TemplateIo`] when either file cannot be accessed and
/// [`Error::Template`] when rendering fails.
pub fn write_readme(
    snapshot: &ProfileSnapshot,
    template_path: &Path,
    output_path: &Path,
    context: &RenderContext
) -> Result<(), Error> {
    info!("Reading template from {}", template_path.display());
    let template =
        fs::read_to_string(template_path).map_err(|source| error::template_io_error(template_path, source))?;

    let rendered = render_readme(snapshot, &template, context)?;

    if let Some(parent) = output_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| error::template_io_error(parent, source))?;
    }
    fs::write(output_path, rendered).map_err(|source| error::template_io_error(output_path, source))?;

    info!("Wrote {}", output_path.display());
    Ok(())
}

fn render_section(key: &str, snapshot: &ProfileSnapshot, context: &RenderContext) -> Result<String, Error> {
    debug!("Rendering {}", key);
    let username = snapshot.username.as_str();

    let section = match key {
        "USERNAME" => username.to_owned(),
        "HEADER_IMAGE" => context
            .header_image
            .as_deref()
            .map(|url| format!("![Header]({url})"))
            .unwrap_or_default(),
        "BIO" => snapshot.header.bio.clone(),
        "STATS" => stats_section(snapshot),
        "LANGUAGES" => languages_section(snapshot),
        "LANGUAGE_CHART" => language_chart_section(snapshot),
        "TECH_STACK" => snapshot
            .tech_stack
            .iter()
            .map(|technology| badge::tech_badge(technology))
            .collect::<Vec<_>>()
            .join(" "),
        "SPOTLIGHT" => spotlight_section(snapshot),
        "RECENT_ACTIVITY" => recent_activity_section(snapshot),
        "WAKATIME" => wakatime_section(snapshot),
        "ACHIEVEMENTS" => achievements_section(snapshot.achievements),
        "STREAK_MESSAGE" => snapshot.highlights.streak_message.clone(),
        "MOTIVATIONAL_QUOTE" => format!("> {}", snapshot.highlights.motivational_quote),
        "SOCIAL_LINKS" => context
            .social
            .entries()
            .into_iter()
            .map(|(platform, url)| badge::social_badge(platform, url))
            .collect::<Vec<_>>()
            .join(" "),
        "STATS_CARD" => format!("![GitHub stats]({})", badge::stats_card_url(username)),
        "STREAK_STATS" => format!("![GitHub streak]({})", badge::streak_stats_url(username)),
        "TOP_LANGUAGES_CARD" => format!("![Top languages]({})", badge::top_languages_card_url(username)),
        "TROPHIES" => format!("![Trophies]({})", badge::trophies_url(username)),
        other => return Err(Error::template(format!("unknown placeholder {other}")))
    };

    Ok(section)
}

fn stats_section(snapshot: &ProfileSnapshot) -> String {
    let stats = &snapshot.stats;
    [
        badge::count_badge("Stars", stats.stars, "f1c40f"),
        badge::count_badge("Commits", stats.commits, "2ecc71"),
        badge::count_badge("Pull Requests", stats.pull_requests, "9b59b6"),
        badge::count_badge("Issues", stats.issues, "e67e22"),
        badge::count_badge("Contributed To", stats.contributed_to, "1abc9c"),
        badge::count_badge("Followers", stats.followers, "3498db"),
        badge::count_badge("Public Repos", stats.public_repos, "34495e"),
        badge::count_badge("Contributions", stats.total_contributions, "e74c3c")
    ]
    .join(" ")
}

fn languages_section(snapshot: &ProfileSnapshot) -> String {
    if snapshot.languages.is_empty() {
        return EMPTY_CHART.to_owned();
    }

    snapshot
        .languages
        .entries()
        .iter()
        .map(|share| badge::percentage_badge(&share.name, &share.percentage))
        .collect::<Vec<_>>()
        .join(" ")
}

fn language_chart_section(snapshot: &ProfileSnapshot) -> String {
    let entries: Vec<ChartEntry> = snapshot
        .wakatime
        .as_ref()
        .map(|summary| {
            summary
                .languages
                .iter()
                .map(|language| ChartEntry {
                    name:       language.name.clone(),
                    seconds:    language.seconds,
                    percentage: language.exact_percent
                })
                .collect()
        })
        .unwrap_or_default();

    format!(
        "```text\n{}\n```",
        insights::language_bar_chart(&entries, DEFAULT_CHART_LANGUAGES)
    )
}

fn spotlight_section(snapshot: &ProfileSnapshot) -> String {
    let spotlight = &snapshot.spotlight;
    format!(
        "### [{}]({})\n\n{}\n\n⭐ {} · {}",
        spotlight.name,
        spotlight.url,
        spotlight.description,
        insights::format_number(spotlight.stars),
        spotlight.language
    )
}

fn recent_activity_section(snapshot: &ProfileSnapshot) -> String {
    let activity = &snapshot.recent_activity;
    let active_days = activity.recent_commits.len();
    let recent_contributions: u64 = activity.recent_commits.iter().map(|day| day.count).sum();

    let mut lines = vec![format!(
        "**{}** commits this year, {} contributions across {} recent active days",
        insights::format_number(activity.total_commits),
        insights::format_number(recent_contributions),
        active_days
    )];
    lines.push(String::new());
    for repository in &activity.recent_repos {
        lines.push(format!(
            "- [{}](https://github.com/{}/{}) · {} · {}",
            repository.name,
            snapshot.username,
            repository.name,
            repository.language,
            repository.pushed_at.format("%Y-%m-%d")
        ));
    }

    lines.join("\n").trim_end().to_owned()
}

fn wakatime_section(snapshot: &ProfileSnapshot) -> String {
    let Some(summary) = snapshot.wakatime.as_ref() else {
        return "_Coding activity is not available._".to_owned();
    };

    let mut lines = vec![format!(
        "**{} hrs** coded this week, mostly in **{}**",
        summary.total_hours, summary.top_language
    )];
    lines.push(String::new());
    for language in &summary.languages {
        lines.push(format!(
            "- {}: {}% ({} hrs)",
            language.name, language.percent, language.hours
        ));
    }

    lines.join("\n").trim_end().to_owned()
}

fn achievements_section(achievements: Achievements) -> String {
    let earned: Vec<&str> = [
        (achievements.night_owl, "🦉 Night Owl"),
        (achievements.polyglot, "🌍 Polyglot"),
        (achievements.on_fire, "🔥 On Fire"),
        (achievements.oss_champion, "🏆 OSS Champion")
    ]
    .into_iter()
    .filter_map(|(earned, title)| earned.then_some(title))
    .collect();

    if earned.is_empty() {
        return "_No achievements unlocked yet._".to_owned();
    }
    earned.join(" · ")
}
