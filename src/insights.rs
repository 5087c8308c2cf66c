// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Derived metrics computed from already-fetched data.
//!
//! Everything here is pure. Thresholds are strict where noted; the quote
//! selector receives its random source from the caller so runs can be made
//! reproducible.

use chrono::{DateTime, Timelike, Utc};
use rand::Rng;

/// Width of the language bar chart in block characters.
pub const BAR_WIDTH: usize = 20;
/// Default number of languages drawn by [`language_bar_chart`].
pub const DEFAULT_CHART_LANGUAGES: usize = 5;
/// Text returned by [`language_bar_chart`] when there is nothing to draw.
pub const EMPTY_CHART: &str = "No language data available";

const NIGHT_OWL_LAST_HOUR: u32 = 5;
const POLYGLOT_MIN_LANGUAGES: usize = 4;
const ON_FIRE_DAYS: usize = 7;

/// Fixed pool used by [`select_quote`].
pub const QUOTES: [&str; 10] = [
    "🚀 Code is poetry written in logic",
    "💡 Every bug is a feature waiting to be discovered",
    "⚡ Innovation happens at the intersection of creativity and code",
    "🎯 The best code is the code that solves real problems",
    "🌟 Turning coffee into code, one commit at a time",
    "🔧 Building tomorrow's solutions today",
    "💻 Code never lies, comments sometimes do",
    "🚀 From idea to implementation, one line at a time",
    "⚡ Debugging is like being a detective in a crime movie",
    "🎨 Code is art, and every developer is an artist"
];

/// Formats a duration given in seconds as `"H hrs M mins"`.
///
/// Zero or negative input yields `"0 mins"`. Each part is shown only when it
/// is nonzero, except that minutes are shown when hours are zero.
///
/// # Examples
///
/// ```
/// use profile_dynamo::format_duration;
///
/// assert_eq!(format_duration(0), "0 mins");
/// assert_eq!(format_duration(3661), "1 hrs 1 mins");
/// assert_eq!(format_duration(7200), "2 hrs");
/// assert_eq!(format_duration(120), "2 mins");
/// ```
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0 mins".to_owned();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 && minutes > 0 {
        format!("{hours} hrs {minutes} mins")
    } else if hours > 0 {
        format!("{hours} hrs")
    } else {
        format!("{minutes} mins")
    }
}

/// Formats an integer with comma thousands separators.
pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Row drawn by [`language_bar_chart`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartEntry {
    /// Language name.
    pub name:       String,
    /// Coding seconds; also determines ordering and bar length.
    pub seconds:    u64,
    /// Share of the total, drawn with one decimal.
    pub percentage: f64
}

/// Draws a fixed-width text bar chart of the top `max_languages` entries.
///
/// Entries are sorted by seconds descending. Each bar is
/// `floor(seconds / max_seconds * BAR_WIDTH)` filled blocks padded with empty
/// blocks to [`BAR_WIDTH`].
pub fn language_bar_chart(entries: &[ChartEntry], max_languages: usize) -> String {
    let mut sorted: Vec<&ChartEntry> = entries.iter().collect();
    sorted.sort_by(|left, right| right.seconds.cmp(&left.seconds));
    sorted.truncate(max_languages);

    let Some(first) = sorted.first() else {
        return EMPTY_CHART.to_owned();
    };
    let max_seconds = u128::from(first.seconds);

    let mut lines = Vec::with_capacity(sorted.len());
    for entry in sorted {
        let filled = if max_seconds > 0 {
            (u128::from(entry.seconds) * BAR_WIDTH as u128 / max_seconds) as usize
        } else {
            0
        };
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        let duration = format_duration(i64::try_from(entry.seconds).unwrap_or(i64::MAX));
        lines.push(format!(
            "{:<12} {bar} {:.1}% ({duration})",
            entry.name, entry.percentage
        ));
    }

    lines.join("\n")
}

/// Returns `true` when more than 30% of push events happened between 00:00
/// and 05:59 UTC. At least one push event is required.
pub fn is_night_owl(push_times: &[DateTime<Utc>]) -> bool {
    if push_times.is_empty() {
        return false;
    }

    let night = push_times
        .iter()
        .filter(|time| time.hour() <= NIGHT_OWL_LAST_HOUR)
        .count();

    night * 10 > push_times.len() * 3
}

/// Returns `true` when the time-tracking source reported at least four
/// languages.
pub fn is_polyglot(language_count: usize) -> bool {
    language_count >= POLYGLOT_MIN_LANGUAGES
}

/// Returns `true` when each of the last seven calendar days has a nonzero
/// contribution count.
///
/// `daily_counts` is the flattened contribution calendar in chronological
/// order. Calendars shorter than seven days never qualify.
pub fn is_on_fire(daily_counts: &[u64]) -> bool {
    if daily_counts.len() < ON_FIRE_DAYS {
        return false;
    }

    daily_counts[daily_counts.len() - ON_FIRE_DAYS..]
        .iter()
        .all(|count| *count > 0)
}

/// Returns `true` when at least one merged pull request targeted a
/// repository owned by someone other than `username`.
///
/// Repository names are expected in `owner/name` form; owners are compared
/// ASCII-case-insensitively.
pub fn is_oss_champion<'a, I>(merged_pull_request_repositories: I, username: &str) -> bool
where
    I: IntoIterator<Item = &'a str>
{
    merged_pull_request_repositories.into_iter().any(|repository| {
        let owner = repository.split('/').next().unwrap_or_default();
        !owner.eq_ignore_ascii_case(username)
    })
}

/// Message shown when no contributions were recorded or the count is
/// unavailable.
pub const STREAK_STARTING_MESSAGE: &str = "🌟 Ready to start my coding journey!";

/// Picks the streak message tier for the yearly contribution total.
pub fn streak_message(total_contributions: u64) -> String {
    if total_contributions == 0 {
        return STREAK_STARTING_MESSAGE.to_owned();
    }

    let formatted = format_number(total_contributions);
    if total_contributions > 365 {
        format!("🔥 On fire! {formatted} contributions this year")
    } else if total_contributions > 100 {
        format!("🚀 Consistent coder with {formatted} contributions")
    } else if total_contributions > 50 {
        format!("💪 Building momentum with {formatted} contributions")
    } else {
        format!("🌱 Growing my coding footprint with {formatted} contributions")
    }
}

/// Selects a motivational quote from [`QUOTES`].
///
/// Threshold rules are checked in order: more than 500 contributions picks
/// the first quote, more than 10 000 coding seconds the second, more than 20
/// pull requests the third. Otherwise a quote is drawn uniformly from `rng`.
pub fn select_quote<R>(
    total_contributions: u64,
    coding_seconds: u64,
    pull_requests: u64,
    rng: &mut R
) -> &'static str
where
    R: Rng + ?Sized
{
    if total_contributions > 500 {
        QUOTES[0]
    } else if coding_seconds > 10_000 {
        QUOTES[1]
    } else if pull_requests > 20 {
        QUOTES[2]
    } else {
        QUOTES[rng.gen_range(0..QUOTES.len())]
    }
}
