//! Runner inputs.
//!
//! Every option can be given as a flag or through the environment variable
//! the Actions runner exports for it (`INPUT_<NAME>`, `GITHUB_*`). Empty
//! values count as absent since the runner exports every declared input.

use crate::error::{ReleaseError, Result};
use crate::github_client::DEFAULT_GRAPHQL_URL;
use clap::Parser;
use secrecy::SecretString;
use std::path::PathBuf;

pub const DEFAULT_DEVELOP_BRANCH: &str = "develop";

#[derive(Parser, Debug, Default)]
#[command(name = "next-release", version, about = "Decide the next release from merged pull requests")]
pub struct Args {
    /// Token used to query the GitHub GraphQL API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Version of the last published release, e.g. 1.4.0 or 2.0.0-beta.3
    #[arg(long, env = "INPUT_CURRENT-VERSION", allow_hyphen_values = true)]
    pub current_version: Option<String>,

    /// "true" to start or continue a pre-release
    #[arg(long, env = "INPUT_PRE-RELEASE", allow_hyphen_values = true)]
    pub pre_release: Option<String>,

    /// Marker between the version triplet and the pre-release suffix, e.g. -beta
    #[arg(long, env = "INPUT_SEPARATOR", allow_hyphen_values = true)]
    pub separator: Option<String>,

    /// Branch compared against the release tag
    #[arg(long, env = "INPUT_DEVELOP-BRANCH")]
    pub develop_branch: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// File receiving the outputs; stdout when absent
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: SecretString,
    pub current_version: String,
    pub pre_release: bool,
    pub separator: String,
    pub develop_branch: String,
    pub owner: String,
    pub repo: String,
    pub graphql_url: String,
    pub output: Option<PathBuf>,
}

/// Trimmed value, `None` when blank.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    present(value).ok_or_else(|| ReleaseError::missing_input(name))
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let token = required(args.token, "token")?;
        let current_version = required(args.current_version, "current-version")?;
        let repository = required(args.repository, "repository")?;

        let (owner, repo) = match repository.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                (owner.to_string(), repo.to_string())
            }
            _ => {
                return Err(ReleaseError::invalid_argument(format!(
                    "repository must be owner/name, got '{}'",
                    repository
                )))
            }
        };

        Ok(Self {
            token: SecretString::from(token),
            current_version,
            pre_release: present(args.pre_release).as_deref() == Some("true"),
            separator: present(args.separator).unwrap_or_default(),
            develop_branch: present(args.develop_branch)
                .unwrap_or_else(|| DEFAULT_DEVELOP_BRANCH.to_string()),
            owner,
            repo,
            graphql_url: present(args.graphql_url)
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            output: args.output.filter(|p| !p.as_os_str().is_empty()),
        })
    }

    /// Tag of the current release.
    pub fn base_ref(&self) -> String {
        format!("v{}", self.current_version)
    }
}
