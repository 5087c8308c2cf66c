// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Orchestration of the source adapters into one [`ProfileSnapshot`].
//!
//! Aggregation runs in two phases. The fetch phase issues every independent
//! source call concurrently and captures each outcome separately, so a
//! failing source never cancels its siblings. The derive phase turns those
//! outcomes into snapshot fields, issuing the dependent calls (per-repository
//! languages, repository contents, text generation) on the way. Every field
//! except the project spotlight degrades to a documented default.

use std::collections::BTreeMap;

use futures::{StreamExt, stream};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    fallback::{SourceResult, describe, optional, with_fallback},
    github::{ActivityTotals, ContributionData, PublicEvent, Repository, RepositorySource, UserProfile},
    insights,
    languages::{TOP_LANGUAGE_LIMIT, compute_language_shares, merge_language_bytes},
    llm::{self, BioInput, ProjectInput, TextGenerator},
    model::{
        Achievements, ContributionDay, GithubStats, Header, Highlights, LanguageBreakdown, ProfileSnapshot,
        ProjectSpotlight, RecentActivity, RecentRepository, WakaTimeLanguageSummary, WakaTimeSummary
    },
    wakatime::{CodingStats, StatsRange, TimeTrackingSource, WakaTimeStats}
};

/// Top language used for the bio when no time-tracking data is available.
pub const DEFAULT_TOP_LANGUAGE: &str = "JavaScript";
/// Repository named in the bio when the recent listing is unavailable.
pub const DEFAULT_LATEST_REPOSITORY: &str = "profile-dynamo";
/// Spotlight description used when generation fails.
pub const FALLBACK_PROJECT_DESCRIPTION: &str = "An amazing project showcasing modern development practices.";
/// Language label for recent repositories without a primary language.
pub const MULTIPLE_LANGUAGES: &str = "Multiple Languages";

const RECENT_WEEKS: usize = 12;
const RECENT_CONTRIBUTION_DAYS: usize = 30;
const RECENT_REPOSITORIES: usize = 5;
const WAKATIME_LANGUAGE_LIMIT: usize = 6;
const LANGUAGE_FETCH_CONCURRENCY: usize = 8;

/// Per-invocation settings of the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorOptions {
    /// Account the snapshot is built for.
    pub username:             String,
    /// Time-tracking summary switch; the source must also be configured.
    pub wakatime_enabled:     bool,
    /// Achievement flags switch.
    pub achievements_enabled: bool,
    /// Seed for the random quote branch; entropy when `None`.
    pub quote_seed:           Option<u64>
}

impl AggregatorOptions {
    /// Options with every feature enabled and an entropy-seeded quote.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username:             username.into(),
            wakatime_enabled:     true,
            achievements_enabled: true,
            quote_seed:           None
        }
    }
}

/// Outcome of every independent source call of one invocation.
#[derive(Debug)]
pub struct SourceData {
    /// Kept as a result: the spotlight reports a failed listing as an error.
    pub recent_repositories: SourceResult<Vec<Repository>>,
    pub all_repositories:    Option<Vec<Repository>>,
    pub contributions:       Option<ContributionData>,
    pub profile:             Option<UserProfile>,
    pub activity_totals:     Option<ActivityTotals>,
    /// `last_7_days` stats; `None` when unavailable or disabled.
    pub weekly_coding:       Option<WakaTimeStats>,
    /// `last_30_days` stats, fetched only for achievements.
    pub monthly_coding:      Option<WakaTimeStats>,
    /// Fetched only for achievements.
    pub public_events:       Option<Vec<PublicEvent>>
}

/// Builds [`ProfileSnapshot`] values from the three source adapters.
#[derive(Debug)]
pub struct Aggregator<R, T, G> {
    repositories:  R,
    time_tracking: T,
    generator:     G,
    options:       AggregatorOptions
}

impl<R, T, G> Aggregator<R, T, G>
where
    R: RepositorySource,
    T: TimeTrackingSource,
    G: TextGenerator
{
    pub fn new(repositories: R, time_tracking: T, generator: G, options: AggregatorOptions) -> Self {
        Self {
            repositories,
            time_tracking,
            generator,
            options
        }
    }

    pub fn options(&self) -> &AggregatorOptions {
        &self.options
    }

    /// Produces the snapshot for the configured account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account has no repositories and
    /// [`Error::Service`] when the repository listing needed for the project
    /// spotlight fails. Every other failure is replaced by its default.
    pub async fn aggregate(&self) -> Result<ProfileSnapshot, Error> {
        info!("Collecting profile data for {}", self.options.username);
        let sources = self.fetch_sources().await;

        let recent = sources.recent_repositories.as_deref().unwrap_or(&[]);
        let all = sources.all_repositories.as_deref().unwrap_or(&[]);
        let weekly = sources.weekly_coding.as_ref();

        info!("Deriving profile sections");
        let (header, (languages, tech_stack), spotlight) = tokio::join!(
            self.header_and_bio(weekly, recent),
            async {
                let languages = self.languages(all).await;
                let tech_stack = self.tech_stack(&languages).await;
                (languages, tech_stack)
            },
            self.spotlight(&sources.recent_repositories)
        );

        let stats = Self::stats(
            sources.all_repositories.as_deref(),
            sources.contributions.as_ref(),
            sources.profile.as_ref(),
            sources.activity_totals.as_ref()
        );
        let highlights = self.highlights(&stats, weekly);
        let achievements = self.achievements(&sources);

        Ok(ProfileSnapshot {
            username: self.options.username.clone(),
            header,
            stats,
            languages,
            tech_stack,
            spotlight: spotlight?,
            recent_activity: Self::recent_activity(sources.contributions.as_ref(), recent),
            wakatime: Self::wakatime_summary(weekly),
            achievements,
            highlights
        })
    }

    /// Issues every independent source call concurrently.
    pub async fn fetch_sources(&self) -> SourceData {
        let username = self.options.username.as_str();
        let achievements = self.options.achievements_enabled;

        let (
            recent_repositories,
            all_repositories,
            contributions,
            profile,
            activity_totals,
            weekly_coding,
            monthly_coding,
            public_events
        ) = tokio::join!(
            self.repositories.recent_repositories(username),
            optional("repository listing", self.repositories.all_repositories(username)),
            optional("contribution calendar", self.repositories.contributions(username)),
            optional("user profile", self.repositories.user_profile(username)),
            optional("pull request and issue totals", self.repositories.activity_totals(username)),
            self.coding_stats(StatsRange::Last7Days, true),
            self.coding_stats(StatsRange::Last30Days, achievements),
            async {
                if achievements {
                    optional("public events", self.repositories.public_events(username)).await
                } else {
                    None
                }
            }
        );

        if let Err(error) = &recent_repositories {
            warn!("recent repositories failed, using fallback: {}", describe(error));
        }

        SourceData {
            recent_repositories,
            all_repositories,
            contributions,
            profile,
            activity_totals,
            weekly_coding,
            monthly_coding,
            public_events
        }
    }

    async fn coding_stats(&self, range: StatsRange, wanted: bool) -> Option<WakaTimeStats> {
        if !wanted || !self.wakatime_active() {
            return None;
        }

        let label = format!("coding stats ({})", range.as_str());
        optional(&label, self.time_tracking.coding_stats(range))
            .await
            .and_then(CodingStats::into_available)
    }

    fn wakatime_active(&self) -> bool {
        self.options.wakatime_enabled && self.time_tracking.is_configured()
    }

    /// Generates the bio from the top language, coding hours and latest
    /// repository, substituting defaults for whichever input is missing.
    pub async fn header_and_bio(&self, weekly: Option<&WakaTimeStats>, recent: &[Repository]) -> Header {
        let input = BioInput {
            top_language: weekly
                .and_then(|stats| stats.languages.first())
                .map(|language| language.name.trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_TOP_LANGUAGE)
                .to_owned(),
            latest_repo:  recent
                .first()
                .map_or(DEFAULT_LATEST_REPOSITORY, |repository| repository.name.as_str())
                .to_owned(),
            total_hours:  weekly.map_or(0, |stats| round_hours(stats.total_seconds)),
            username:     self.options.username.clone()
        };

        let bio = with_fallback("bio generation", llm::generate_bio(&self.generator, &input), || {
            fallback_bio(&input)
        })
        .await;

        Header {
            bio
        }
    }

    /// Sums language bytes over `repositories`, skipping repositories whose
    /// language fetch fails, and keeps the top languages.
    pub async fn languages(&self, repositories: &[Repository]) -> LanguageBreakdown {
        let owner = self.options.username.as_str();

        let per_repository: Vec<BTreeMap<String, u64>> = stream::iter(repositories)
            .map(|repository| async move {
                match self.repositories.repository_languages(owner, &repository.name).await {
                    Ok(languages) => Some(languages),
                    Err(error) => {
                        warn!("Skipping languages of {}: {}", repository.name, describe(&error));
                        None
                    }
                }
            })
            .buffer_unordered(LANGUAGE_FETCH_CONCURRENCY)
            .filter_map(|languages| async move { languages })
            .collect()
            .await;

        debug!(
            "Merged languages from {} of {} repositories",
            per_repository.len(),
            repositories.len()
        );
        compute_language_shares(&merge_language_bytes(per_repository), TOP_LANGUAGE_LIMIT)
    }

    /// Enriches the language list into a tech stack, or returns the raw
    /// language names when generation fails.
    pub async fn tech_stack(&self, languages: &LanguageBreakdown) -> Vec<String> {
        let names: Vec<String> = languages.names().map(str::to_owned).collect();
        if names.is_empty() {
            debug!("No languages detected, tech stack is empty");
            return names;
        }

        with_fallback(
            "tech stack generation",
            llm::generate_tech_stack(&self.generator, &names),
            || names.clone()
        )
        .await
    }

    /// Assembles aggregate statistics; each counter is zero when its source
    /// failed.
    pub fn stats(
        repositories: Option<&[Repository]>,
        contributions: Option<&ContributionData>,
        profile: Option<&UserProfile>,
        totals: Option<&ActivityTotals>
    ) -> GithubStats {
        GithubStats {
            stars:               repositories.map_or(0, |repositories| {
                repositories
                    .iter()
                    .map(|repository| repository.stargazers_count)
                    .sum()
            }),
            commits:             contributions.map_or(0, |data| data.total_commit_contributions),
            pull_requests:       totals.map_or(0, |totals| totals.pull_requests),
            issues:              totals.map_or(0, |totals| totals.issues),
            contributed_to:      contributions.map_or(0, |data| data.total_repositories_with_contributed_commits),
            followers:           profile.map_or(0, |profile| profile.followers),
            following:           profile.map_or(0, |profile| profile.following),
            public_repos:        profile.map_or(0, |profile| profile.public_repos),
            total_contributions: contributions.map_or(0, |data| data.contribution_calendar.total_contributions)
        }
    }

    /// Highlights the most recently pushed repository.
    ///
    /// A stored non-blank description is used verbatim. Otherwise one is
    /// generated from the repository metadata.
    ///
    /// # Errors
    ///
    /// Fails when the listing failed or returned no repositories.
    pub async fn spotlight(&self, listing: &SourceResult<Vec<Repository>>) -> Result<ProjectSpotlight, Error> {
        let repositories = listing
            .as_ref()
            .map_err(|e| {
                Error::service(format!(
                    "failed to list repositories for the spotlight: {}",
                    describe(e)
                ))
            })?;
        let repository = repositories.first().ok_or_else(|| {
            Error::not_found(format!("no repositories found for {}", self.options.username))
        })?;

        let language = repository
            .language
            .as_deref()
            .unwrap_or(DEFAULT_TOP_LANGUAGE)
            .to_owned();

        let description = match repository.description.as_deref() {
            Some(stored) if !stored.trim().is_empty() => stored.to_owned(),
            _ => self.describe_repository(repository, &language).await
        };

        Ok(ProjectSpotlight {
            name: repository.name.clone(),
            description,
            stars: repository.stargazers_count,
            language,
            url: repository.html_url.clone()
        })
    }

    async fn describe_repository(&self, repository: &Repository, language: &str) -> String {
        let contents = with_fallback(
            "repository contents",
            self.repositories
                .repository_contents(&self.options.username, &repository.name),
            Vec::new
        )
        .await;

        let input = ProjectInput {
            repo_name: repository.name.clone(),
            language: language.to_owned(),
            stars: repository.stargazers_count,
            has_readme: contents
                .iter()
                .any(|entry| entry.name.to_lowercase().contains("readme")),
            file_count: contents.len() as u64
        };

        with_fallback(
            "project description generation",
            llm::generate_project_description(&self.generator, &input),
            || FALLBACK_PROJECT_DESCRIPTION.to_owned()
        )
        .await
    }

    /// Selects recent contribution days and recently pushed repositories.
    ///
    /// Days come from the last twelve calendar weeks only; zero days are
    /// dropped and the newest thirty kept in chronological order.
    /// Repositories without a push timestamp are excluded.
    pub fn recent_activity(contributions: Option<&ContributionData>, recent: &[Repository]) -> RecentActivity {
        let recent_commits = contributions.map_or_else(Vec::new, |data| {
            let weeks = &data.contribution_calendar.weeks;
            let days: Vec<ContributionDay> = weeks[weeks.len().saturating_sub(RECENT_WEEKS)..]
                .iter()
                .flat_map(|week| week.contribution_days.iter())
                .filter(|day| day.contribution_count > 0)
                .map(|day| ContributionDay {
                    date:  day.date,
                    count: day.contribution_count
                })
                .collect();
            days[days.len().saturating_sub(RECENT_CONTRIBUTION_DAYS)..].to_vec()
        });

        let mut recent_repos: Vec<RecentRepository> = recent
            .iter()
            .filter_map(|repository| {
                repository.pushed_at.map(|pushed_at| RecentRepository {
                    name: repository.name.clone(),
                    pushed_at,
                    language: repository
                        .language
                        .clone()
                        .unwrap_or_else(|| MULTIPLE_LANGUAGES.to_owned())
                })
            })
            .collect();
        recent_repos.sort_by(|left, right| right.pushed_at.cmp(&left.pushed_at));
        recent_repos.truncate(RECENT_REPOSITORIES);

        RecentActivity {
            total_commits: contributions.map_or(0, |data| data.total_commit_contributions),
            recent_commits,
            recent_repos
        }
    }

    /// Converts weekly stats into the summary; `None` stays `None`.
    pub fn wakatime_summary(weekly: Option<&WakaTimeStats>) -> Option<WakaTimeSummary> {
        weekly.map(|stats| WakaTimeSummary {
            total_hours:  round_hours(stats.total_seconds),
            top_language: stats
                .languages
                .first()
                .map_or_else(|| DEFAULT_TOP_LANGUAGE.to_owned(), |language| language.name.clone()),
            languages:    stats
                .languages
                .iter()
                .take(WAKATIME_LANGUAGE_LIMIT)
                .map(|language| WakaTimeLanguageSummary {
                    name:          language.name.clone(),
                    percent:       round_non_negative(language.percent),
                    hours:         round_hours(language.total_seconds),
                    seconds:       round_non_negative(language.total_seconds),
                    exact_percent: if language.percent.is_finite() {
                        language.percent.max(0.0)
                    } else {
                        0.0
                    }
                })
                .collect()
        })
    }

    /// Evaluates the achievement heuristics. A flag whose input is missing
    /// is `false`.
    pub fn achievements(&self, sources: &SourceData) -> Achievements {
        if !self.options.achievements_enabled {
            return Achievements::default();
        }

        let events = sources.public_events.as_deref().unwrap_or(&[]);
        let push_times: Vec<_> = events
            .iter()
            .filter(|event| event.is_push())
            .map(|event| event.created_at)
            .collect();
        let merged = events
            .iter()
            .filter(|event| event.is_merged_pull_request())
            .map(|event| event.repo.name.as_str());
        let daily_counts = sources
            .contributions
            .as_ref()
            .map(|data| data.contribution_calendar.daily_counts())
            .unwrap_or_default();

        Achievements {
            night_owl:    insights::is_night_owl(&push_times),
            polyglot:     insights::is_polyglot(
                sources
                    .monthly_coding
                    .as_ref()
                    .map_or(0, |stats| stats.languages.len())
            ),
            on_fire:      insights::is_on_fire(&daily_counts),
            oss_champion: insights::is_oss_champion(merged, &self.options.username)
        }
    }

    /// Streak message and motivational quote for the final statistics.
    pub fn highlights(&self, stats: &GithubStats, weekly: Option<&WakaTimeStats>) -> Highlights {
        let mut rng = match self.options.quote_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };
        let coding_seconds = weekly.map_or(0, |stats| round_non_negative(stats.total_seconds));

        Highlights {
            streak_message:     insights::streak_message(stats.total_contributions),
            motivational_quote: insights::select_quote(
                stats.total_contributions,
                coding_seconds,
                stats.pull_requests,
                &mut rng
            )
            .to_owned()
        }
    }
}

fn fallback_bio(input: &BioInput) -> String {
    format!(
        "{} is a passionate {} developer, currently building {}.",
        input.username, input.top_language, input.latest_repo
    )
}

fn round_hours(seconds: f64) -> u64 {
    round_non_negative(seconds / 3600.0)
}

fn round_non_negative(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicUsize, Ordering}
    };

    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use masterror::AppError;

    use super::*;
    use crate::{
        github::{
            CalendarDay, ContentEntry, ContributionCalendar, ContributionWeek, EventPayload, EventRepository,
            PullRequestPayload
        },
        llm::GenerationRequest,
        wakatime::WakaTimeLanguage
    };

    #[derive(Default)]
    struct MockRepositories {
        profile:        Option<UserProfile>,
        recent:         Option<Vec<Repository>>,
        all:            Option<Vec<Repository>>,
        languages:      BTreeMap<String, BTreeMap<String, u64>>,
        contents:       Option<Vec<ContentEntry>>,
        contributions:  Option<ContributionData>,
        totals:         Option<ActivityTotals>,
        events:         Option<Vec<PublicEvent>>,
        contents_calls: AtomicUsize,
        events_calls:   AtomicUsize
    }

    fn unavailable<T>(value: &Option<T>, name: &str) -> SourceResult<T>
    where
        T: Clone
    {
        value
            .clone()
            .ok_or_else(|| AppError::service(format!("{name} unavailable")))
    }

    impl RepositorySource for MockRepositories {
        async fn user_profile(&self, _username: &str) -> SourceResult<UserProfile> {
            unavailable(&self.profile, "profile")
        }

        async fn recent_repositories(&self, _username: &str) -> SourceResult<Vec<Repository>> {
            unavailable(&self.recent, "recent repositories")
        }

        async fn all_repositories(&self, _username: &str) -> SourceResult<Vec<Repository>> {
            unavailable(&self.all, "all repositories")
        }

        async fn repository_languages(
            &self,
            _owner: &str,
            repository: &str
        ) -> SourceResult<BTreeMap<String, u64>> {
            self.languages
                .get(repository)
                .cloned()
                .ok_or_else(|| AppError::service("languages unavailable"))
        }

        async fn repository_contents(&self, _owner: &str, _repository: &str) -> SourceResult<Vec<ContentEntry>> {
            self.contents_calls.fetch_add(1, Ordering::SeqCst);
            unavailable(&self.contents, "contents")
        }

        async fn contributions(&self, _username: &str) -> SourceResult<ContributionData> {
            unavailable(&self.contributions, "contributions")
        }

        async fn activity_totals(&self, _username: &str) -> SourceResult<ActivityTotals> {
            unavailable(&self.totals, "activity totals")
        }

        async fn public_events(&self, _username: &str) -> SourceResult<Vec<PublicEvent>> {
            self.events_calls.fetch_add(1, Ordering::SeqCst);
            unavailable(&self.events, "public events")
        }
    }

    #[derive(Default)]
    struct MockTimeTracking {
        configured: bool,
        stats:      Option<WakaTimeStats>,
        calls:      AtomicUsize
    }

    impl TimeTrackingSource for MockTimeTracking {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn coding_stats(&self, _range: StatsRange) -> SourceResult<CodingStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            unavailable(&self.stats, "coding stats").map(CodingStats::Available)
        }
    }

    #[derive(Default)]
    struct MockGenerator {
        failing:           bool,
        description_calls: AtomicUsize,
        calls:             AtomicUsize
    }

    impl TextGenerator for MockGenerator {
        async fn generate_text(&self, request: &GenerationRequest) -> SourceResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(AppError::service("generation unavailable"));
            }

            match request.response_schema["required"][0].as_str() {
                Some("bio") => Ok(r#"{ "bio": "Generated bio." }"#.to_owned()),
                Some("description") => {
                    self.description_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(r#"{ "description": "Generated description." }"#.to_owned())
                }
                Some("techStack") => Ok(r#"{ "techStack": ["Tokio", "Serde"] }"#.to_owned()),
                other => Err(AppError::validation(format!("unexpected schema {other:?}")))
            }
        }
    }

    fn pushed(days_ago: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            - Duration::days(days_ago)
    }

    fn repository(name: &str, description: Option<&str>, stars: u64, days_ago: Option<i64>) -> Repository {
        Repository {
            name:             name.to_owned(),
            description:      description.map(str::to_owned),
            stargazers_count: stars,
            language:         Some("Rust".to_owned()),
            html_url:         format!("https://github.com/octocat/{name}"),
            pushed_at:        days_ago.map(pushed)
        }
    }

    fn calendar(weeks: usize, count_for: impl Fn(usize, usize) -> u64) -> ContributionData {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).expect("valid date");
        let weeks = (0..weeks)
            .map(|week| ContributionWeek {
                contribution_days: (0..7)
                    .map(|day| CalendarDay {
                        contribution_count: count_for(week, day),
                        date:               start + Duration::days((week * 7 + day) as i64)
                    })
                    .collect()
            })
            .collect();

        ContributionData {
            total_commit_contributions:                 120,
            total_repositories_with_contributed_commits: 4,
            contribution_calendar:                      ContributionCalendar {
                total_contributions: 150,
                weeks
            }
        }
    }

    fn weekly_stats() -> WakaTimeStats {
        let language = |name: &str, seconds: f64, percent: f64| WakaTimeLanguage {
            name:          name.to_owned(),
            total_seconds: seconds,
            percent
        };

        WakaTimeStats {
            total_seconds: 36_000.0,
            languages:     vec![
                language("Rust", 18_000.0, 50.4),
                language("TypeScript", 7_200.0, 20.0),
                language("YAML", 3_600.0, 10.0),
                language("Markdown", 1_800.0, 5.0),
                language("Bash", 1_800.0, 5.0),
                language("TOML", 1_800.0, 5.0),
                language("JSON", 1_800.0, 4.6)
            ]
        }
    }

    fn event(kind: &str, repo: &str, hour: u32, merged: bool) -> PublicEvent {
        PublicEvent {
            kind:       Some(kind.to_owned()),
            repo:       EventRepository {
                name: repo.to_owned()
            },
            created_at: Utc.with_ymd_and_hms(2025, 5, 30, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
            payload:    EventPayload {
                action:       Some("closed".to_owned()),
                pull_request: Some(PullRequestPayload {
                    merged
                })
            }
        }
    }

    fn healthy_repositories() -> MockRepositories {
        let recent = vec![
            repository("dynamo", Some("A tool"), 10, Some(1)),
            repository("older", None, 2, Some(5)),
        ];
        let mut all = recent.clone();
        all.push(repository("archive", None, 3, None));

        MockRepositories {
            profile: Some(UserProfile {
                followers:    42,
                following:    7,
                public_repos: 3
            }),
            recent: Some(recent),
            all: Some(all),
            languages: BTreeMap::from([
                ("dynamo".to_owned(), BTreeMap::from([("Rust".to_owned(), 3_000)])),
                (
                    "older".to_owned(),
                    BTreeMap::from([("Rust".to_owned(), 1_000), ("Shell".to_owned(), 1_000)])
                ),
                ("archive".to_owned(), BTreeMap::from([("Go".to_owned(), 5_000)])),
            ]),
            contents: Some(vec![ContentEntry {
                name: "README.md".to_owned(),
                kind: Some("file".to_owned())
            }]),
            contributions: Some(calendar(20, |_, _| 1)),
            totals: Some(ActivityTotals {
                pull_requests: 9,
                issues:        4
            }),
            events: Some(vec![
                event("PushEvent", "octocat/dynamo", 2, false),
                event("PullRequestEvent", "rust-lang/rust", 14, true),
            ]),
            ..MockRepositories::default()
        }
    }

    fn configured_time_tracking() -> MockTimeTracking {
        MockTimeTracking {
            configured: true,
            stats: Some(weekly_stats()),
            ..MockTimeTracking::default()
        }
    }

    fn options() -> AggregatorOptions {
        AggregatorOptions {
            quote_seed: Some(7),
            ..AggregatorOptions::new("octocat")
        }
    }

    fn aggregator(
        repositories: MockRepositories,
        time_tracking: MockTimeTracking,
        generator: MockGenerator
    ) -> Aggregator<MockRepositories, MockTimeTracking, MockGenerator> {
        Aggregator::new(repositories, time_tracking, generator, options())
    }

    #[tokio::test]
    async fn healthy_sources_populate_every_field() {
        let aggregator = aggregator(
            healthy_repositories(),
            configured_time_tracking(),
            MockGenerator::default()
        );

        let snapshot = aggregator.aggregate().await.expect("snapshot");

        assert_eq!(snapshot.header.bio, "Generated bio.");
        assert_eq!(snapshot.stats.stars, 15);
        assert_eq!(snapshot.stats.commits, 120);
        assert_eq!(snapshot.stats.contributed_to, 4);
        assert_eq!(snapshot.stats.followers, 42);
        assert_eq!(snapshot.stats.pull_requests, 9);
        assert_eq!(snapshot.stats.issues, 4);
        assert_eq!(snapshot.stats.total_contributions, 150);
        assert_eq!(snapshot.languages.names().collect::<Vec<_>>(), vec!["Go", "Rust", "Shell"]);
        assert_eq!(snapshot.languages.percentage("Go"), Some("50.00"));
        assert_eq!(snapshot.tech_stack, vec!["Tokio", "Serde"]);
        assert_eq!(snapshot.spotlight.description, "A tool");
        assert!(snapshot.achievements.night_owl);
        assert!(snapshot.achievements.on_fire);
        assert!(snapshot.achievements.oss_champion);
        assert!(snapshot.achievements.polyglot);
        assert_eq!(
            snapshot.highlights.streak_message,
            "🚀 Consistent coder with 150 contributions"
        );
        assert_eq!(snapshot.highlights.motivational_quote, insights::QUOTES[1]);
    }

    #[tokio::test]
    async fn failing_sources_fall_back_to_defaults() {
        let repositories = MockRepositories {
            recent: Some(vec![repository("dynamo", Some("A tool"), 1, Some(1))]),
            ..MockRepositories::default()
        };
        let generator = MockGenerator {
            failing: true,
            ..MockGenerator::default()
        };
        let aggregator = aggregator(repositories, MockTimeTracking::default(), generator);

        let snapshot = aggregator.aggregate().await.expect("spotlight still resolves");

        assert_eq!(
            snapshot.header.bio,
            "octocat is a passionate JavaScript developer, currently building dynamo."
        );
        assert_eq!(snapshot.stats, GithubStats::default());
        assert!(snapshot.languages.is_empty());
        assert!(snapshot.tech_stack.is_empty());
        assert_eq!(snapshot.recent_activity.total_commits, 0);
        assert!(snapshot.recent_activity.recent_commits.is_empty());
        assert_eq!(snapshot.wakatime, None);
        assert_eq!(snapshot.achievements, Achievements::default());
        assert!(!snapshot.highlights.motivational_quote.is_empty());
    }

    #[tokio::test]
    async fn tech_stack_falls_back_to_raw_languages() {
        let generator = MockGenerator {
            failing: true,
            ..MockGenerator::default()
        };
        let aggregator = aggregator(healthy_repositories(), MockTimeTracking::default(), generator);

        let snapshot = aggregator.aggregate().await.expect("snapshot");
        assert_eq!(snapshot.tech_stack, vec!["Go", "Rust", "Shell"]);
    }

    #[tokio::test]
    async fn repositories_with_failing_language_fetch_are_skipped() {
        let mut repositories = healthy_repositories();
        repositories.languages.remove("archive");
        let aggregator = aggregator(repositories, MockTimeTracking::default(), MockGenerator::default());

        let all = healthy_repositories().all.expect("repositories");
        let languages = aggregator.languages(&all).await;

        assert_eq!(languages.names().collect::<Vec<_>>(), vec!["Rust", "Shell"]);
        assert_eq!(languages.percentage("Rust"), Some("80.00"));
    }

    #[tokio::test]
    async fn stored_description_is_used_without_generation() {
        let aggregator = aggregator(
            healthy_repositories(),
            MockTimeTracking::default(),
            MockGenerator::default()
        );
        let listing = Ok(vec![repository("dynamo", Some("A tool"), 3, Some(1))]);

        let spotlight = aggregator.spotlight(&listing).await.expect("spotlight");

        assert_eq!(spotlight.description, "A tool");
        assert_eq!(aggregator.generator.description_calls.load(Ordering::SeqCst), 0);
        assert_eq!(aggregator.repositories.contents_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_description_is_generated() {
        let aggregator = aggregator(
            healthy_repositories(),
            MockTimeTracking::default(),
            MockGenerator::default()
        );
        let listing = Ok(vec![repository("dynamo", Some("  "), 3, Some(1))]);

        let spotlight = aggregator.spotlight(&listing).await.expect("spotlight");

        assert_eq!(spotlight.description, "Generated description.");
        assert_eq!(spotlight.url, "https://github.com/octocat/dynamo");
        assert_eq!(aggregator.generator.description_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_generation_uses_static_description() {
        let generator = MockGenerator {
            failing: true,
            ..MockGenerator::default()
        };
        let aggregator = aggregator(MockRepositories::default(), MockTimeTracking::default(), generator);
        let mut bare = repository("bare", None, 0, Some(1));
        bare.language = None;

        let spotlight = aggregator.spotlight(&Ok(vec![bare])).await.expect("spotlight");

        assert_eq!(spotlight.description, FALLBACK_PROJECT_DESCRIPTION);
        assert_eq!(spotlight.language, "JavaScript");
    }

    #[tokio::test]
    async fn spotlight_without_repositories_is_not_found() {
        let aggregator = aggregator(
            MockRepositories {
                recent: Some(Vec::new()),
                ..MockRepositories::default()
            },
            MockTimeTracking::default(),
            MockGenerator::default()
        );

        match aggregator.aggregate().await {
            Err(Error::NotFound {
                ..
            }) => {}
            other => panic!("expected not found, got {other:?}")
        }
    }

    #[tokio::test]
    async fn spotlight_listing_failure_is_an_error() {
        let aggregator = aggregator(
            MockRepositories::default(),
            MockTimeTracking::default(),
            MockGenerator::default()
        );

        match aggregator.aggregate().await {
            Err(Error::Service {
                message
            }) => assert!(message.contains("recent repositories unavailable"), "{message}"),
            other => panic!("expected service error, got {other:?}")
        }
    }

    #[test]
    fn recent_activity_uses_only_last_twelve_weeks() {
        // Weeks 0..8 carry a marker count of 99; only weeks 8..20 may appear.
        let data = calendar(20, |week, day| match (week, day % 2) {
            (0..8, _) => 99,
            (_, 0) => 0,
            _ => 1
        });

        let activity =
            Aggregator::<MockRepositories, MockTimeTracking, MockGenerator>::recent_activity(Some(&data), &[]);

        let cutoff = data.contribution_calendar.weeks[8].contribution_days[0].date;
        assert_eq!(activity.recent_commits.len(), 30);
        assert!(activity.recent_commits.iter().all(|day| day.count == 1));
        assert!(activity.recent_commits.iter().all(|day| day.date >= cutoff));
        assert!(
            activity
                .recent_commits
                .windows(2)
                .all(|pair| pair[0].date < pair[1].date)
        );
        let last_day = data.contribution_calendar.weeks[19].contribution_days[5].date;
        assert_eq!(activity.recent_commits.last().map(|day| day.date), Some(last_day));
    }

    #[test]
    fn recent_repositories_skip_missing_push_and_sort_descending() {
        let mut untyped = repository("untyped", None, 0, Some(0));
        untyped.language = None;
        let repositories = vec![
            repository("older", None, 0, Some(9)),
            repository("never", None, 0, None),
            untyped,
            repository("middle", None, 0, Some(3)),
        ];

        let activity =
            Aggregator::<MockRepositories, MockTimeTracking, MockGenerator>::recent_activity(None, &repositories);

        let names: Vec<_> = activity
            .recent_repos
            .iter()
            .map(|repository| repository.name.as_str())
            .collect();
        assert_eq!(names, vec!["untyped", "middle", "older"]);
        assert_eq!(activity.recent_repos[0].language, MULTIPLE_LANGUAGES);
    }

    #[test]
    fn wakatime_summary_rounds_and_limits_languages() {
        let summary =
            Aggregator::<MockRepositories, MockTimeTracking, MockGenerator>::wakatime_summary(Some(&weekly_stats()))
                .expect("summary");

        assert_eq!(summary.total_hours, 10);
        assert_eq!(summary.top_language, "Rust");
        assert_eq!(summary.languages.len(), 6);
        assert_eq!(summary.languages[0].percent, 50);
        assert!((summary.languages[0].exact_percent - 50.4).abs() < f64::EPSILON);
        assert_eq!(summary.languages[0].hours, 5);
        assert_eq!(summary.languages[3].hours, 1);
    }

    #[tokio::test]
    async fn unconfigured_time_tracking_is_never_called() {
        let time_tracking = MockTimeTracking {
            configured: false,
            stats: Some(weekly_stats()),
            ..MockTimeTracking::default()
        };
        let aggregator = aggregator(healthy_repositories(), time_tracking, MockGenerator::default());

        let snapshot = aggregator.aggregate().await.expect("snapshot");

        assert_eq!(snapshot.wakatime, None);
        assert!(!snapshot.achievements.polyglot);
        assert_eq!(aggregator.time_tracking.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn disabled_wakatime_feature_is_never_called() {
        let aggregator = Aggregator::new(
            healthy_repositories(),
            configured_time_tracking(),
            MockGenerator::default(),
            AggregatorOptions {
                wakatime_enabled: false,
                ..options()
            }
        );

        let snapshot = aggregator.aggregate().await.expect("snapshot");

        assert_eq!(snapshot.wakatime, None);
        assert_eq!(aggregator.time_tracking.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_time_tracking_source_yields_no_summary() {
        let aggregator = Aggregator::new(
            healthy_repositories(),
            None::<MockTimeTracking>,
            MockGenerator::default(),
            options()
        );

        let snapshot = aggregator.aggregate().await.expect("snapshot");
        assert_eq!(snapshot.wakatime, None);
    }

    #[tokio::test]
    async fn time_tracking_failure_yields_no_summary() {
        let time_tracking = MockTimeTracking {
            configured: true,
            stats: None,
            ..MockTimeTracking::default()
        };
        let aggregator = aggregator(healthy_repositories(), time_tracking, MockGenerator::default());

        let snapshot = aggregator.aggregate().await.expect("snapshot");

        assert_eq!(snapshot.wakatime, None);
        assert!(!snapshot.header.bio.is_empty());
    }

    #[tokio::test]
    async fn disabled_achievements_skip_event_fetch() {
        let aggregator = Aggregator::new(
            healthy_repositories(),
            configured_time_tracking(),
            MockGenerator::default(),
            AggregatorOptions {
                achievements_enabled: false,
                ..options()
            }
        );

        let snapshot = aggregator.aggregate().await.expect("snapshot");

        assert_eq!(snapshot.achievements, Achievements::default());
        assert_eq!(aggregator.repositories.events_calls.load(Ordering::SeqCst), 0);
        assert_eq!(aggregator.time_tracking.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn identical_sources_produce_identical_snapshots() {
        let first = aggregator(
            healthy_repositories(),
            configured_time_tracking(),
            MockGenerator::default()
        )
        .aggregate()
        .await
        .expect("snapshot");
        let second = aggregator(
            healthy_repositories(),
            configured_time_tracking(),
            MockGenerator::default()
        )
        .aggregate()
        .await
        .expect("snapshot");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn seeded_quote_is_reproducible() {
        let aggregator = aggregator(
            MockRepositories::default(),
            MockTimeTracking::default(),
            MockGenerator::default()
        );
        let stats = GithubStats::default();

        let first = aggregator.highlights(&stats, None);
        let second = aggregator.highlights(&stats, None);

        assert_eq!(first, second);
        assert_eq!(first.streak_message, insights::STREAK_STARTING_MESSAGE);
    }

    #[test]
    fn rounding_clamps_negative_and_non_finite_values() {
        assert_eq!(round_non_negative(-4.0), 0);
        assert_eq!(round_non_negative(f64::NAN), 0);
        assert_eq!(round_non_negative(2.5), 3);
        assert_eq!(round_hours(5_399.0), 1);
    }
}
