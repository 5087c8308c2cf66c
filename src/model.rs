// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Data model assembled by the aggregator and consumed by the renderer.
//!
//! Every record here is transient: a [`ProfileSnapshot`] is built once per
//! invocation, handed to the renderer, and dropped. All fields are always
//! populated; sources that fail contribute their documented defaults instead
//! of leaving gaps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Complete, always-populated profile data handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    /// Account identifier the snapshot was built for.
    pub username:        String,
    /// Header section containing the generated bio.
    pub header:          Header,
    /// Aggregate account statistics.
    pub stats:           GithubStats,
    /// Top languages by byte share, descending.
    pub languages:       LanguageBreakdown,
    /// Technologies inferred from the language list.
    pub tech_stack:      Vec<String>,
    /// Most recently pushed repository.
    pub spotlight:       ProjectSpotlight,
    /// Recent contribution days and pushed repositories.
    pub recent_activity: RecentActivity,
    /// Time-tracking summary; `None` when the feature is unavailable.
    #[serde(rename = "wakatimeData")]
    pub wakatime:        Option<WakaTimeSummary>,
    /// Achievement flags derived from recent activity.
    pub achievements:    Achievements,
    /// Streak message and motivational quote.
    pub highlights:      Highlights
}

/// Header section of the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// One-sentence bio.
    pub bio: String
}

/// Aggregate account statistics.
///
/// Each counter defaults to zero independently when its source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStats {
    pub stars:               u64,
    pub commits:             u64,
    pub pull_requests:       u64,
    pub issues:              u64,
    pub contributed_to:      u64,
    pub followers:           u64,
    pub following:           u64,
    pub public_repos:        u64,
    pub total_contributions: u64
}

/// Share of a single language across all owned repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageShare {
    /// Language name as reported by the hosting service.
    pub name:       String,
    /// Total bytes across every repository.
    pub bytes:      u64,
    /// Percentage of all bytes, formatted with exactly two decimals.
    pub percentage: String
}

/// Ordered language breakdown, serialized as a `name -> percentage` map that
/// preserves descending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageBreakdown {
    entries: Vec<LanguageShare>
}

impl LanguageBreakdown {
    /// Wraps already-ordered shares.
    pub fn new(entries: Vec<LanguageShare>) -> Self {
        Self {
            entries
        }
    }

    /// Returns the shares in descending order.
    pub fn entries(&self) -> &[LanguageShare] {
        &self.entries
    }

    /// Iterates over language names in descending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|share| share.name.as_str())
    }

    /// Looks up the formatted percentage of a language.
    pub fn percentage(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|share| share.name == name)
            .map(|share| share.percentage.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for LanguageBreakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for share in &self.entries {
            map.serialize_entry(&share.name, &share.percentage)?;
        }
        map.end()
    }
}

/// Highlighted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSpotlight {
    pub name:        String,
    pub description: String,
    pub stars:       u64,
    pub language:    String,
    pub url:         String
}

/// A single day with recorded contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionDay {
    pub date:  NaiveDate,
    pub count: u64
}

/// Repository recently pushed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRepository {
    pub name:      String,
    pub pushed_at: DateTime<Utc>,
    pub language:  String
}

/// Recent activity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    /// Commit contributions in the current collection window.
    pub total_commits:  u64,
    /// Up to 30 most recent non-zero days, oldest first.
    pub recent_commits: Vec<ContributionDay>,
    /// Up to 5 most recently pushed repositories.
    pub recent_repos:   Vec<RecentRepository>
}

/// Time-tracking summary; only ever constructed complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakaTimeSummary {
    pub total_hours:  u64,
    pub top_language: String,
    pub languages:    Vec<WakaTimeLanguageSummary>
}

/// Per-language time-tracking entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WakaTimeLanguageSummary {
    pub name:          String,
    /// Rounded share of coding time.
    pub percent:       u64,
    /// Rounded coding hours.
    pub hours:         u64,
    /// Raw coding seconds, kept for the bar chart.
    pub seconds:       u64,
    /// Unrounded share, drawn with one decimal by the bar chart.
    #[serde(skip)]
    pub exact_percent: f64
}

/// Achievement flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    pub night_owl:    bool,
    pub polyglot:     bool,
    pub on_fire:      bool,
    pub oss_champion: bool
}

/// Short messages derived from the aggregate statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub streak_message:     String,
    pub motivational_quote: String
}
