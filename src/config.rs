//! Application configuration and environment variable parsing.
//!
//! The only runtime setting is the GitHub access token, loaded from the environment
//! (optionally via a .env file). The repository being reported on and the number of
//! pull requests to fetch are compiled in.

use serde::Deserialize;
use std::fmt;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// The owner of the repository (e.g., "codeready-toolchain").
    pub owner: String,
    /// The name of the repository (e.g., "member-operator").
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Owner of the repository the report is generated for.
pub const TARGET_OWNER: &str = "codeready-toolchain";

/// Name of the repository the report is generated for.
pub const TARGET_REPO: &str = "member-operator";

/// Number of closed pull requests to fetch. Zero fetches every closed pull request.
///
/// Twice the number of merged PRs we want to see, since not every closed PR was merged.
pub const PR_FETCH_TARGET: usize = 5 * 2;

/// The repository identity built from [`TARGET_OWNER`] and [`TARGET_REPO`].
pub fn target_repo() -> RepoId {
    RepoId::new(TARGET_OWNER, TARGET_REPO)
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// GitHub Personal Access Token used for every API call.
    pub github_token: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_token", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("GITHUB_TOKEN", "ghp_example");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.github_token, "ghp_example");

        env::remove_var("GITHUB_TOKEN");
    }

    #[test]
    #[serial]
    fn test_config_missing_token() {
        env::remove_var("GITHUB_TOKEN");
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let config = AppConfig {
            github_token: "ghp_secret".to_string(),
        };
        assert!(!format!("{config:?}").contains("ghp_secret"));
    }

    #[test]
    fn test_target_repo_display() {
        assert_eq!(target_repo().to_string(), "codeready-toolchain/member-operator");
    }
}
