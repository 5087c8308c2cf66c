// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Profile configuration and the explicit startup initialization step.
//!
//! The optional YAML document carries presentation settings and feature
//! switches. Credentials never live in it; they are resolved from the
//! command line or environment and validated once by
//! [`Capabilities::initialize`] before any client is built.

use std::{
    fs,
    path::{Path, PathBuf}
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Error},
    llm::DEFAULT_MODEL
};

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use profile_dynamo::ProfileConfig;
///
/// let yaml = r#"
/// username: octocat
/// features:
///   wakatime: false
/// "#;
/// let config: ProfileConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert!(!config.features.wakatime);
/// assert!(config.features.achievements);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Account to build the profile for; the command line overrides it.
    #[serde(default)]
    pub username:     Option<String>,
    /// Image shown at the top of the rendered document.
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(default)]
    pub llm:          LlmSettings,
    #[serde(default)]
    pub features:     FeatureFlags,
    #[serde(default)]
    pub social:       SocialLinks,
    #[serde(default)]
    pub output:       OutputPaths
}

impl ProfileConfig {
    /// Picks the account name, preferring `override_username` over the
    /// document's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when neither source provides a non-blank
    /// name.
    pub fn resolve_username(&self, override_username: Option<&str>) -> Result<String, Error> {
        override_username
            .and_then(non_blank)
            .or_else(|| self.username.as_deref().and_then(non_blank))
            .map(str::to_owned)
            .ok_or_else(|| Error::config("a GitHub username is required (--username or GITHUB_USERNAME)"))
    }

    fn validate(&self) -> Result<(), Error> {
        if self.llm.model.trim().is_empty() {
            return Err(Error::config("llm.model must not be blank"));
        }
        if self.output.template_path.as_os_str().is_empty() {
            return Err(Error::config("output.template_path must not be empty"));
        }
        if self.output.readme_path.as_os_str().is_empty() {
            return Err(Error::config("output.readme_path must not be empty"));
        }
        Ok(())
    }
}

/// Generative-text settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmSettings {
    #[serde(default = "default_model")]
    pub model: String
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model()
        }
    }
}

/// Optional sections of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    /// Time-tracking summary; also requires a credential.
    #[serde(default = "enabled")]
    pub wakatime:     bool,
    #[serde(default = "enabled")]
    pub achievements: bool
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            wakatime:     true,
            achievements: true
        }
    }
}

/// Social profile links rendered as badges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLinks {
    #[serde(default)]
    pub linkedin:      Option<String>,
    #[serde(default)]
    pub github:        Option<String>,
    #[serde(default)]
    pub twitter:       Option<String>,
    #[serde(default)]
    pub instagram:     Option<String>,
    #[serde(default)]
    pub stackoverflow: Option<String>,
    #[serde(default)]
    pub website:       Option<String>,
    #[serde(default)]
    pub blog:          Option<String>
}

impl SocialLinks {
    /// Non-blank links as `(platform, url)` pairs in a fixed order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("linkedin", &self.linkedin),
            ("github", &self.github),
            ("twitter", &self.twitter),
            ("instagram", &self.instagram),
            ("stackoverflow", &self.stackoverflow),
            ("website", &self.website),
            ("blog", &self.blog)
        ]
        .into_iter()
        .filter_map(|(platform, url)| url.as_deref().and_then(non_blank).map(|url| (platform, url)))
        .collect()
    }
}

/// Template input and rendered output locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputPaths {
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_readme_path")]
    pub readme_path:   PathBuf
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            readme_path:   default_readme_path()
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn enabled() -> bool {
    true
}

fn default_template_path() -> PathBuf {
    PathBuf::from("README.template.md")
}

fn default_readme_path() -> PathBuf {
    PathBuf::from("README.md")
}

/// Loads and validates the configuration document at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] for
/// malformed YAML or unknown keys, and [`Error::Config`] for invalid values.
pub fn load_config(path: &Path) -> Result<ProfileConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_config(&contents)
}

/// Parses and validates a configuration document. An empty document yields
/// the defaults.
pub fn parse_config(contents: &str) -> Result<ProfileConfig, Error> {
    if contents.trim().is_empty() {
        return Ok(ProfileConfig::default());
    }

    let config: ProfileConfig = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Raw credentials as supplied by the command line or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub github_token:     Option<String>,
    pub llm_api_key:      Option<String>,
    /// Legacy name for the generative-text key, used when `llm_api_key` is
    /// absent.
    pub google_api_key:   Option<String>,
    pub wakatime_api_key: Option<String>
}

/// Validated credentials that every client is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub github_token:     String,
    pub llm_api_key:      String,
    /// `None` disables the time-tracking source.
    pub wakatime_api_key: Option<String>
}

impl Capabilities {
    /// Resolves credentials once at startup. Blank values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the repository-hosting token or the
    /// generative-text key is missing. A missing time-tracking key only
    /// disables that source.
    ///
    /// # Examples
    ///
    /// ```
    /// use profile_dynamo::{Capabilities, Credentials};
    ///
    /// let capabilities = Capabilities::initialize(Credentials {
    ///     github_token: Some("ghp_token".to_owned()),
    ///     llm_api_key: None,
    ///     google_api_key: Some("google".to_owned()),
    ///     wakatime_api_key: Some("  ".to_owned())
    /// })
    /// .expect("required credentials present");
    /// assert_eq!(capabilities.llm_api_key, "google");
    /// assert_eq!(capabilities.wakatime_api_key, None);
    /// ```
    pub fn initialize(credentials: Credentials) -> Result<Self, Error> {
        let github_token = credentials
            .github_token
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| Error::config("GH_PAT_TOKEN is required"))?
            .to_owned();

        let llm_api_key = credentials
            .llm_api_key
            .as_deref()
            .and_then(non_blank)
            .or_else(|| credentials.google_api_key.as_deref().and_then(non_blank))
            .ok_or_else(|| Error::config("LLM_API_KEY or GOOGLE_API_KEY is required"))?
            .to_owned();

        let wakatime_api_key = credentials
            .wakatime_api_key
            .as_deref()
            .and_then(non_blank)
            .map(str::to_owned);

        Ok(Self {
            github_token,
            llm_api_key,
            wakatime_api_key
        })
    }

    /// Returns `true` when time-tracking data can be requested.
    pub fn has_wakatime(&self) -> bool {
        self.wakatime_api_key.is_some()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            github_token:     Some("ghp_token".to_owned()),
            llm_api_key:      Some("llm_key".to_owned()),
            google_api_key:   None,
            wakatime_api_key: Some("waka_key".to_owned())
        }
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("  \n").expect("empty document is valid");

        assert_eq!(config, ProfileConfig::default());
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!(config.features.wakatime);
        assert_eq!(config.output.readme_path, PathBuf::from("README.md"));
    }

    #[test]
    fn full_document_is_parsed() {
        let yaml = r#"
username: octocat
header_image: https://example.test/header.png
llm:
  model: gemini-2.0-pro
features:
  wakatime: false
  achievements: false
social:
  linkedin: https://linkedin.com/in/octocat
  blog: https://octocat.dev
output:
  template_path: templates/PROFILE.md
  readme_path: out/README.md
"#;

        let config = parse_config(yaml).expect("valid configuration");

        assert_eq!(config.username.as_deref(), Some("octocat"));
        assert_eq!(config.llm.model, "gemini-2.0-pro");
        assert!(!config.features.wakatime);
        assert!(!config.features.achievements);
        assert_eq!(config.output.template_path, PathBuf::from("templates/PROFILE.md"));
        assert_eq!(
            config.social.entries(),
            vec![
                ("linkedin", "https://linkedin.com/in/octocat"),
                ("blog", "https://octocat.dev")
            ]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = parse_config("usernme: typo\n").expect_err("unknown key must fail");
        assert!(matches!(error, Error::Parse { .. }), "got {error:?}");
    }

    #[test]
    fn blank_model_is_rejected() {
        let error = parse_config("llm:\n  model: '  '\n").expect_err("blank model must fail");
        match error {
            Error::Config {
                message
            } => assert!(message.contains("llm.model")),
            other => panic!("expected config error, got {other:?}")
        }
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "username: from-file").expect("write config");

        let config = load_config(file.path()).expect("valid configuration");
        assert_eq!(config.username.as_deref(), Some("from-file"));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.yaml");

        match load_config(&path) {
            Err(Error::Io {
                path: reported, ..
            }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn username_override_wins_over_document() {
        let config = ProfileConfig {
            username: Some("from-config".to_owned()),
            ..ProfileConfig::default()
        };

        assert_eq!(config.resolve_username(Some("cli")).expect("resolved"), "cli");
        assert_eq!(config.resolve_username(Some("  ")).expect("resolved"), "from-config");
        assert_eq!(config.resolve_username(None).expect("resolved"), "from-config");
    }

    #[test]
    fn missing_username_is_a_config_error() {
        let error = ProfileConfig::default()
            .resolve_username(None)
            .expect_err("username required");
        assert!(matches!(error, Error::Config { .. }));
    }

    #[test]
    fn capabilities_require_github_token() {
        let error = Capabilities::initialize(Credentials {
            github_token: Some("   ".to_owned()),
            ..credentials()
        })
        .expect_err("blank token is absent");

        assert_eq!(error.to_display_string(), "invalid configuration: GH_PAT_TOKEN is required");
    }

    #[test]
    fn capabilities_require_llm_key() {
        let error = Capabilities::initialize(Credentials {
            llm_api_key: None,
            google_api_key: None,
            ..credentials()
        })
        .expect_err("llm key required");

        assert!(matches!(error, Error::Config { .. }));
    }

    #[test]
    fn llm_key_takes_precedence_over_google_key() {
        let capabilities = Capabilities::initialize(Credentials {
            google_api_key: Some("google".to_owned()),
            ..credentials()
        })
        .expect("valid credentials");

        assert_eq!(capabilities.llm_api_key, "llm_key");
    }

    #[test]
    fn missing_wakatime_key_disables_feature() {
        let capabilities = Capabilities::initialize(Credentials {
            wakatime_api_key: None,
            ..credentials()
        })
        .expect("wakatime key is optional");

        assert!(!capabilities.has_wakatime());
        assert!(Capabilities::initialize(credentials()).expect("valid").has_wakatime());
    }
}
