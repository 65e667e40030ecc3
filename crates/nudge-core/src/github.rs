//! GitHub REST client implementing [`CodeHosting`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::hosting::{CodeHosting, DeveloperProfile, PushEvent};

const GITHUB_API_URL: &str = "https://api.github.com";

/// Preview media type required by the commit search endpoint.
const COMMIT_SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview";

const RECENT_REPO_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct GitHubUser {
    bio: Option<String>,
    #[serde(default)]
    public_repos: u32,
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEvent {
    #[serde(rename = "type")]
    kind: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitSearch {
    total_count: u64,
}

fn build_profile(user: GitHubUser, repos: Vec<GitHubRepo>) -> DeveloperProfile {
    let mut languages: Vec<String> = Vec::new();
    for language in repos.iter().filter_map(|r| r.language.as_ref()) {
        if !languages.contains(language) {
            languages.push(language.clone());
        }
    }

    DeveloperProfile {
        bio: user
            .bio
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| "No bio".to_string()),
        languages,
        public_repos: user.public_repos,
        recent_repos: repos
            .into_iter()
            .take(RECENT_REPO_LIMIT)
            .map(|r| r.name)
            .collect(),
    }
}

fn push_events(events: Vec<GitHubEvent>) -> Vec<PushEvent> {
    events
        .into_iter()
        .filter(|e| e.kind == "PushEvent")
        .map(|e| PushEvent {
            created_at: e.created_at,
        })
        .collect()
}

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client. Unauthenticated access works but is heavily rate limited.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("commit-nudge/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: GITHUB_API_URL.to_string(),
        })
    }

    /// Points the client at another API root (GitHub Enterprise).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        accept: Option<&str>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        trace!(url = %url, "GitHub request");

        let mut request = self.client.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }
        if let Some(accept) = accept {
            request = request.header("Accept", accept);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CodeHosting for GitHubClient {
    async fn profile(&self, username: &str) -> Result<DeveloperProfile> {
        let user_path = format!("/users/{}", username);
        let repos_path = format!("/users/{}/repos", username);
        let repos_query = [("sort", "updated".to_string()), ("per_page", "10".to_string())];

        let (user, repos) = futures::try_join!(
            self.get_json::<GitHubUser>(&user_path, &[], None),
            self.get_json::<Vec<GitHubRepo>>(&repos_path, &repos_query, None),
        )?;

        let profile = build_profile(user, repos);
        debug!(username, languages = %profile.languages_display(), "profile fetched");
        Ok(profile)
    }

    async fn recent_activity(&self, username: &str) -> Result<Vec<PushEvent>> {
        let path = format!("/users/{}/events/public", username);
        let events: Vec<GitHubEvent> = self
            .get_json(&path, &[("per_page", "100".to_string())], None)
            .await?;
        Ok(push_events(events))
    }

    async fn has_committed_on(&self, username: &str, date: NaiveDate) -> Result<bool> {
        let query = [(
            "q",
            format!("author:{} committer-date:{}", username, date.format("%Y-%m-%d")),
        )];
        let search: CommitSearch = self
            .get_json("/search/commits", &query, Some(COMMIT_SEARCH_ACCEPT))
            .await?;
        debug!(username, %date, total = search.total_count, "commit search");
        Ok(search.total_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_profile_dedups_languages_and_caps_repos() {
        let user: GitHubUser = serde_json::from_str(r#"{"bio": null, "public_repos": 31}"#).unwrap();
        let repos: Vec<GitHubRepo> = serde_json::from_str(
            r#"[
                {"name": "one", "language": "Rust"},
                {"name": "two", "language": null},
                {"name": "three", "language": "TypeScript"},
                {"name": "four", "language": "Rust"},
                {"name": "five", "language": "Go"},
                {"name": "six", "language": "Python"}
            ]"#,
        )
        .unwrap();

        let profile = build_profile(user, repos);

        assert_eq!(profile.bio, "No bio");
        assert_eq!(profile.public_repos, 31);
        assert_eq!(profile.languages, vec!["Rust", "TypeScript", "Go", "Python"]);
        assert_eq!(profile.recent_repos, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_push_events_filters_other_event_types() {
        let events: Vec<GitHubEvent> = serde_json::from_str(
            r#"[
                {"type": "PushEvent", "created_at": "2026-10-14T08:01:00Z"},
                {"type": "WatchEvent", "created_at": "2026-10-14T07:00:00Z"},
                {"type": "PushEvent", "created_at": "2026-10-13T22:10:00Z"}
            ]"#,
        )
        .unwrap();

        let pushes = push_events(events);
        assert_eq!(pushes.len(), 2);
        assert_eq!(
            pushes[1].created_at.date_naive(),
            NaiveDate::from_ymd_opt(2026, 10, 13).unwrap()
        );
    }

    #[test]
    fn test_commit_search_response() {
        let search: CommitSearch =
            serde_json::from_str(r#"{"total_count": 2, "incomplete_results": false, "items": []}"#)
                .unwrap();
        assert_eq!(search.total_count, 2);
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let client = GitHubClient::new(None).unwrap().with_base_url("https://ghe.local/api/v3/");
        assert_eq!(client.base_url, "https://ghe.local/api/v3");
    }
}
