use crate::config::Config;
use crate::error::Result;
use crate::github_client::{CompareRequest, CompareSource};
use crate::release::{self, Increment};
use log::info;
use std::sync::Arc;

/// The three values handed to the next pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub increment: Increment,
    pub next_version: String,
    pub changelog: Vec<String>,
}

impl BumpOutcome {
    pub fn changelog_text(&self) -> String {
        self.changelog.join("\n")
    }

    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("increment", self.increment.to_string()),
            ("next-version", self.next_version.clone()),
            ("changelog", self.changelog_text()),
        ]
    }
}

#[derive(Clone)]
pub struct Bumper {
    source: Arc<dyn CompareSource>,
    config: Config,
}

impl Bumper {
    pub fn new(source: Arc<dyn CompareSource>, config: Config) -> Self {
        Self { source, config }
    }

    pub async fn run(&self) -> Result<BumpOutcome> {
        let request = CompareRequest {
            owner: self.config.owner.clone(),
            repo: self.config.repo.clone(),
            base: self.config.base_ref(),
            head: self.config.develop_branch.clone(),
        };

        let comparison = self.source.compare(&request).await?;
        let comparison = release::filter_merged(comparison);
        let changelog = release::changelog(&comparison);
        let increment = release::detect_changes(&comparison);
        let next_version = release::next_version(
            &self.config.current_version,
            increment,
            self.config.pre_release,
            &self.config.separator,
        )?;

        if increment == Increment::None {
            info!("Nothing to release since {}", request.base);
        } else {
            info!(
                "{} release: {} -> {} ({} pull requests)",
                increment,
                self.config.current_version,
                next_version,
                changelog.len()
            );
        }

        Ok(BumpOutcome {
            increment,
            next_version,
            changelog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::github_client::MockCompareSource;
    use crate::models::{CommitEntry, Comparison, Label, PullRequestRef, RefComparison};
    use secrecy::SecretString;

    fn config(current_version: &str, pre_release: bool) -> Config {
        Config {
            token: SecretString::from("fake token".to_string()),
            current_version: current_version.to_string(),
            pre_release,
            separator: "-beta".to_string(),
            develop_branch: "develop".to_string(),
            owner: "Adyen".to_string(),
            repo: "adyen-rust-api-library".to_string(),
            graphql_url: "http://localhost/graphql".to_string(),
            output: None,
        }
    }

    fn pr(number: u64, merged: bool, label: Option<&str>) -> PullRequestRef {
        PullRequestRef {
            number,
            merged,
            labels: label.map(Label::new).into_iter().collect(),
        }
    }

    fn commit(message: &str, prs: Vec<PullRequestRef>) -> CommitEntry {
        CommitEntry {
            message: message.to_string(),
            associated_pull_requests: prs,
        }
    }

    fn fixture() -> Comparison {
        Comparison {
            repository_name: "adyen-rust-api-library".to_string(),
            reference: Some(RefComparison {
                ahead_by: 8,
                commits: vec![
                    commit("Add feature", vec![pr(20, true, Some("Feature"))]),
                    commit("Fixing the constructor", vec![pr(10, true, Some("Fix"))]),
                    commit("Follow-up", vec![pr(20, true, Some("Feature"))]),
                    commit("Draft", vec![pr(30, false, Some("Breaking change"))]),
                ],
            }),
        }
    }

    fn source_returning(comparison: Comparison) -> Arc<dyn CompareSource> {
        let mut source = MockCompareSource::new();
        source
            .expect_compare()
            .withf(|request| {
                request.owner == "Adyen"
                    && request.repo == "adyen-rust-api-library"
                    && request.base.starts_with('v')
                    && request.head == "develop"
            })
            .times(1)
            .returning(move |_| Ok(comparison.clone()));
        Arc::new(source)
    }

    #[tokio::test]
    async fn bumps_from_merged_pull_requests() {
        let bumper = Bumper::new(source_returning(fixture()), config("1.2.3", false));

        let outcome = bumper.run().await.unwrap();

        // the breaking change is on an unmerged pull request
        assert_eq!(outcome.increment, Increment::Minor);
        assert_eq!(outcome.next_version, "1.3.0");
        assert_eq!(outcome.changelog, vec!["- #10", "- #20"]);
        assert_eq!(
            outcome.outputs(),
            vec![
                ("increment", "minor".to_string()),
                ("next-version", "1.3.0".to_string()),
                ("changelog", "- #10\n- #20".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn compares_against_the_release_tag() {
        let mut source = MockCompareSource::new();
        source
            .expect_compare()
            .withf(|request| request.base == "v2.0.0-beta.1")
            .times(1)
            .returning(|_| Ok(Comparison::ref_not_found("repo")));
        let bumper = Bumper::new(Arc::new(source), config("2.0.0-beta.1", true));

        let outcome = bumper.run().await.unwrap();

        assert_eq!(outcome.next_version, "2.0.0-beta.2");
    }

    #[tokio::test]
    async fn first_release_has_nothing_to_do() {
        let bumper = Bumper::new(
            source_returning(Comparison::ref_not_found("adyen-rust-api-library")),
            config("1.2.3", false),
        );

        let outcome = bumper.run().await.unwrap();

        assert_eq!(outcome.increment, Increment::None);
        assert_eq!(outcome.next_version, "1.2.3");
        assert!(outcome.changelog.is_empty());
        assert_eq!(outcome.outputs()[0], ("increment", String::new()));
        assert_eq!(outcome.changelog_text(), "");
    }

    #[tokio::test]
    async fn starts_a_pre_release() {
        let bumper = Bumper::new(source_returning(fixture()), config("14.1.5", true));

        let outcome = bumper.run().await.unwrap();

        assert_eq!(outcome.next_version, "14.2.0-beta");
    }

    #[tokio::test]
    async fn remote_failures_propagate() {
        let mut source = MockCompareSource::new();
        source
            .expect_compare()
            .returning(|_| Err(ReleaseError::remote("Bad credentials")));
        let bumper = Bumper::new(Arc::new(source), config("1.2.3", false));

        let err = bumper.run().await.unwrap_err();

        assert!(matches!(err, ReleaseError::RemoteQuery(_)));
    }

    #[tokio::test]
    async fn empty_separator_fails_after_the_query() {
        let mut config = config("1.2.3", false);
        config.separator = String::new();
        let bumper = Bumper::new(source_returning(fixture()), config);

        let err = bumper.run().await.unwrap_err();

        assert_eq!(err.to_string(), "separator is required");
    }
}
