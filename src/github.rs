// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository-hosting adapter backed by the GitHub REST and GraphQL APIs.
///
/// Every response is decoded into an explicit schema at this boundary; a
/// payload that does not match surfaces as a failed call rather than a
/// missing field further down. The adapter performs no retries and no
/// business logic.
use std::{collections::BTreeMap, future::Future};

use chrono::{DateTime, NaiveDate, Utc};
use masterror::AppError;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

use crate::fallback::SourceResult;

/// Page size used by the "recent repositories" listing.
pub const RECENT_REPOSITORY_LIMIT: u8 = 5;
const FULL_PAGE_SIZE: u8 = 100;
const PUBLIC_EVENT_LIMIT: u8 = 100;

const CONTRIBUTIONS_QUERY: &str = r"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      totalCommitContributions
      totalRepositoriesWithContributedCommits
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}";

const ACTIVITY_TOTALS_QUERY: &str = r"
query($username: String!) {
  user(login: $username) {
    pullRequests {
      totalCount
    }
    issues {
      totalCount
    }
  }
}";

/// Follower and repository counters of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub followers:    u64,
    pub following:    u64,
    pub public_repos: u64
}

/// Owned repository as listed by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name:             String,
    #[serde(default)]
    pub description:      Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language:         Option<String>,
    pub html_url:         String,
    #[serde(default)]
    pub pushed_at:        Option<DateTime<Utc>>
}

/// Entry of a repository's root directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>
}

/// Contribution summary of the current collection window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionData {
    pub total_commit_contributions:                 u64,
    pub total_repositories_with_contributed_commits: u64,
    pub contribution_calendar:                      ContributionCalendar
}

/// Week-by-week, day-by-day contribution counts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks:               Vec<ContributionWeek>
}

impl ContributionCalendar {
    /// Daily counts of the whole calendar in chronological order.
    pub fn daily_counts(&self) -> Vec<u64> {
        self.weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
            .map(|day| day.contribution_count)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<CalendarDay>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub contribution_count: u64,
    pub date:               NaiveDate
}

/// All-time pull request and issue counts of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityTotals {
    pub pull_requests: u64,
    pub issues:        u64
}

/// Public event from the account's activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicEvent {
    #[serde(rename = "type", default)]
    pub kind:       Option<String>,
    pub repo:       EventRepository,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payload:    EventPayload
}

impl PublicEvent {
    /// Returns `true` for `PushEvent` entries.
    pub fn is_push(&self) -> bool {
        self.kind.as_deref() == Some("PushEvent")
    }

    /// Returns `true` for a closed pull request that was merged.
    pub fn is_merged_pull_request(&self) -> bool {
        self.kind.as_deref() == Some("PullRequestEvent")
            && self.payload.action.as_deref() == Some("closed")
            && self
                .payload
                .pull_request
                .as_ref()
                .is_some_and(|pull_request| pull_request.merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventRepository {
    /// Repository in `owner/name` form.
    pub name: String
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub action:       Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub merged: bool
}

/// Operations the aggregator needs from the repository-hosting service.
#[allow(async_fn_in_trait)]
pub trait RepositorySource {
    /// Follower, following and public repository counts.
    async fn user_profile(&self, username: &str) -> SourceResult<UserProfile>;

    /// At most [`RECENT_REPOSITORY_LIMIT`] repositories, most recently pushed
    /// first.
    async fn recent_repositories(&self, username: &str) -> SourceResult<Vec<Repository>>;

    /// Every owned repository, following pagination to exhaustion.
    async fn all_repositories(&self, username: &str) -> SourceResult<Vec<Repository>>;

    /// Language name to byte count for one repository.
    async fn repository_languages(
        &self,
        owner: &str,
        repository: &str
    ) -> SourceResult<BTreeMap<String, u64>>;

    /// Root directory listing of one repository.
    async fn repository_contents(
        &self,
        owner: &str,
        repository: &str
    ) -> SourceResult<Vec<ContentEntry>>;

    /// Contribution totals and calendar.
    async fn contributions(&self, username: &str) -> SourceResult<ContributionData>;

    /// All-time pull request and issue counts.
    async fn activity_totals(&self, username: &str) -> SourceResult<ActivityTotals>;

    /// Most recent public events.
    async fn public_events(&self, username: &str) -> SourceResult<Vec<PublicEvent>>;
}

/// [`RepositorySource`] implementation backed by an authenticated
/// [`Octocrab`] client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab
}

impl GitHubClient {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the underlying HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use profile_dynamo::GitHubClient;
    ///
    /// # fn example() -> Result<(), masterror::AppError> {
    /// let client = GitHubClient::new("ghp_token")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: &str) -> SourceResult<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_owned())
            .build()
            .map_err(|e| AppError::unauthorized(format!("failed to initialize GitHub client: {e}")))?;

        Ok(Self::from_octocrab(octocrab))
    }

    /// Wraps an already configured client.
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self {
            octocrab
        }
    }

    async fn list_repositories(
        &self,
        username: &str,
        per_page: u8,
        page: u32
    ) -> SourceResult<Vec<Repository>> {
        let query = RepositoryListQuery {
            kind: "owner",
            sort: "pushed",
            direction: "desc",
            per_page,
            page
        };

        self.octocrab
            .get(format!("/users/{username}/repos"), Some(&query))
            .await
            .map_err(|e| AppError::service(format!("failed to list repositories for {username}: {e}")))
    }

    async fn user_graphql<T>(&self, operation: &str, query: &str, username: &str) -> SourceResult<T>
    where
        T: DeserializeOwned
    {
        let payload = json!({
            "query": query,
            "variables": { "username": username }
        });

        let response: GraphQlResponse<UserNode<T>> = self
            .octocrab
            .graphql(&payload)
            .await
            .map_err(|e| AppError::service(format!("{operation} query failed: {e}")))?;

        extract_user(response, operation, username)
    }
}

impl RepositorySource for GitHubClient {
    async fn user_profile(&self, username: &str) -> SourceResult<UserProfile> {
        debug!("Fetching profile for {}", username);
        self.octocrab
            .get(format!("/users/{username}"), None::<&()>)
            .await
            .map_err(|e| AppError::service(format!("failed to fetch profile for {username}: {e}")))
    }

    async fn recent_repositories(&self, username: &str) -> SourceResult<Vec<Repository>> {
        debug!("Fetching recently pushed repositories for {}", username);
        self.list_repositories(username, RECENT_REPOSITORY_LIMIT, 1).await
    }

    async fn all_repositories(&self, username: &str) -> SourceResult<Vec<Repository>> {
        let repositories = collect_pages(usize::from(FULL_PAGE_SIZE), |page| {
            debug!("Fetching repository page {} for {}", page, username);
            self.list_repositories(username, FULL_PAGE_SIZE, page)
        })
        .await?;

        debug!("Listed {} repositories for {}", repositories.len(), username);
        Ok(repositories)
    }

    async fn repository_languages(
        &self,
        owner: &str,
        repository: &str
    ) -> SourceResult<BTreeMap<String, u64>> {
        self.octocrab
            .get(format!("/repos/{owner}/{repository}/languages"), None::<&()>)
            .await
            .map_err(|e| {
                AppError::service(format!("failed to fetch languages for {owner}/{repository}: {e}"))
            })
    }

    async fn repository_contents(
        &self,
        owner: &str,
        repository: &str
    ) -> SourceResult<Vec<ContentEntry>> {
        self.octocrab
            .get(format!("/repos/{owner}/{repository}/contents/"), None::<&()>)
            .await
            .map_err(|e| {
                AppError::service(format!("failed to fetch contents for {owner}/{repository}: {e}"))
            })
    }

    async fn contributions(&self, username: &str) -> SourceResult<ContributionData> {
        debug!("Fetching contribution calendar for {}", username);
        let collection: ContributionsCollection = self
            .user_graphql("contributions", CONTRIBUTIONS_QUERY, username)
            .await?;
        Ok(collection.contributions_collection)
    }

    async fn activity_totals(&self, username: &str) -> SourceResult<ActivityTotals> {
        let counts: UserActivityCounts = self
            .user_graphql("activity totals", ACTIVITY_TOTALS_QUERY, username)
            .await?;
        Ok(ActivityTotals {
            pull_requests: counts.pull_requests.total_count,
            issues:        counts.issues.total_count
        })
    }

    async fn public_events(&self, username: &str) -> SourceResult<Vec<PublicEvent>> {
        let query = PageQuery {
            per_page: PUBLIC_EVENT_LIMIT
        };

        self.octocrab
            .get(format!("/users/{username}/events/public"), Some(&query))
            .await
            .map_err(|e| AppError::service(format!("failed to fetch public events for {username}: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct RepositoryListQuery<'a> {
    #[serde(rename = "type")]
    kind:      &'a str,
    sort:      &'a str,
    direction: &'a str,
    per_page:  u8,
    page:      u32
}

#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    data:   Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String
}

#[derive(Debug, Deserialize)]
struct UserNode<T> {
    #[serde(default = "Option::default")]
    user: Option<T>
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contributions_collection: ContributionData
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserActivityCounts {
    pull_requests: TotalCount,
    issues:        TotalCount
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64
}

/// Requests pages `1, 2, ...` until one holds fewer than `page_size` items.
///
/// A total that is an exact multiple of `page_size` costs one extra, empty
/// request. The first failing page fails the whole listing.
async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> SourceResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = SourceResult<Vec<T>>>
{
    let mut items = Vec::with_capacity(page_size);
    let mut page = 1u32;

    loop {
        let batch = fetch_page(page).await?;
        let exhausted = batch.len() < page_size;
        items.extend(batch);

        if exhausted {
            return Ok(items);
        }

        page += 1;
    }
}

fn extract_user<T>(response: GraphQlResponse<UserNode<T>>, operation: &str, username: &str) -> SourceResult<T> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .map(|error| error.message.as_str())
            .collect();
        return Err(AppError::service(format!(
            "{operation} query returned errors: {}",
            messages.join("; ")
        )));
    }

    response
        .data
        .and_then(|node| node.user)
        .ok_or_else(|| AppError::validation(format!("{operation} query returned no user for {username}")))
}
