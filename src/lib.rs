//! Data aggregation and rendering for a self-updating profile README.
//!
//! The library pulls account data from three external sources (repository
//! hosting, time tracking and generative text), merges it with static
//! defaults into an always fully populated [`ProfileSnapshot`], and renders
//! that snapshot into a Markdown template. Each source sits behind a trait so
//! the [`Aggregator`] can be driven by any implementation; every source
//! failure except a missing spotlight repository degrades to a documented
//! default instead of aborting the run.

mod aggregator;
mod badge;
mod config;
mod error;
mod fallback;
mod github;
mod insights;
mod languages;
mod llm;
mod model;
mod readme;
mod wakatime;

pub use aggregator::{
    Aggregator, AggregatorOptions, DEFAULT_LATEST_REPOSITORY, DEFAULT_TOP_LANGUAGE, FALLBACK_PROJECT_DESCRIPTION,
    MULTIPLE_LANGUAGES, SourceData
};
pub use badge::{
    Badge, BadgeStyle, count_badge, percentage_badge, social_badge, stats_card_url, streak_stats_url, tech_badge,
    top_languages_card_url, trophies_url
};
pub use config::{
    Capabilities, Credentials, FeatureFlags, LlmSettings, OutputPaths, ProfileConfig, SocialLinks, load_config,
    parse_config
};
pub use error::{Error, io_error, template_io_error};
pub use fallback::{SourceResult, describe, optional, with_fallback};
pub use github::{
    ActivityTotals, CalendarDay, ContentEntry, ContributionCalendar, ContributionData, ContributionWeek, EventPayload,
    EventRepository, GitHubClient, PublicEvent, PullRequestPayload, RECENT_REPOSITORY_LIMIT, Repository,
    RepositorySource, UserProfile
};
pub use insights::{
    BAR_WIDTH, ChartEntry, DEFAULT_CHART_LANGUAGES, EMPTY_CHART, QUOTES, STREAK_STARTING_MESSAGE, format_duration,
    format_number, is_night_owl, is_on_fire, is_oss_champion, is_polyglot, language_bar_chart, select_quote,
    streak_message
};
pub use languages::{TOP_LANGUAGE_LIMIT, compute_language_shares, merge_language_bytes};
pub use llm::{
    BioInput, DEFAULT_MODEL, GEMINI_API_URL, GeminiClient, GenerationRequest, ProjectInput, TextGenerator,
    generate_bio, generate_project_description, generate_tech_stack, parse_structured
};
pub use model::{
    Achievements, ContributionDay, GithubStats, Header, Highlights, LanguageBreakdown, LanguageShare, ProfileSnapshot,
    ProjectSpotlight, RecentActivity, RecentRepository, WakaTimeLanguageSummary, WakaTimeSummary
};
pub use readme::{RenderContext, render_readme, write_readme};
pub use wakatime::{
    CodingStats, StatsRange, TimeTrackingSource, WAKATIME_API_URL, WakaTimeClient, WakaTimeLanguage, WakaTimeStats
};
