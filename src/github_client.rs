use crate::error::{ReleaseError, Result};
use crate::models::{CommitEntry, Comparison, Label, PullRequestRef, RefComparison};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const COMPARE_QUERY: &str = r#"
query($owner: String!, $repo: String!, $base: String!, $head: String!) {
  repository(owner: $owner, name: $repo) {
    name
    ref(qualifiedName: $base) {
      compare(headRef: $head) {
        aheadBy
        commits(first: 100) {
          edges {
            node {
              message
              associatedPullRequests(first: 5) {
                edges {
                  node {
                    number
                    merged
                    labels(first: 5) {
                      nodes {
                        name
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}"#;

/// Which refs to compare, and in which repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRequest {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
}

/// Source of branch comparisons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompareSource: Send + Sync {
    async fn compare(&self, request: &CompareRequest) -> Result<Comparison>;
}

#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: &'a CompareRequest,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    data: Option<CompareData>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CompareData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    name: String,
    #[serde(rename = "ref")]
    reference: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
struct RefNode {
    compare: CompareNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompareNode {
    ahead_by: u64,
    commits: Edges<CommitNode>,
}

#[derive(Debug, Deserialize)]
struct Edges<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    message: String,
    associated_pull_requests: Edges<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
struct PullRequestNode {
    number: u64,
    #[serde(default)]
    merged: bool,
    labels: LabelNodes,
}

#[derive(Debug, Deserialize)]
struct LabelNodes {
    nodes: Vec<LabelNode>,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    name: String,
}

impl From<RepositoryNode> for Comparison {
    fn from(repository: RepositoryNode) -> Self {
        let reference = repository.reference.map(|r| RefComparison {
            ahead_by: r.compare.ahead_by,
            commits: r
                .compare
                .commits
                .edges
                .into_iter()
                .map(|Edge { node: commit }| CommitEntry {
                    message: commit.message,
                    associated_pull_requests: commit
                        .associated_pull_requests
                        .edges
                        .into_iter()
                        .map(|Edge { node: pr }| PullRequestRef {
                            number: pr.number,
                            merged: pr.merged,
                            labels: pr
                                .labels
                                .nodes
                                .into_iter()
                                .map(|l| Label::new(l.name))
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        });
        Comparison {
            repository_name: repository.name,
            reference,
        }
    }
}

#[derive(Clone)]
pub struct GithubClient {
    client: Arc<reqwest::Client>,
    endpoint: String,
}

impl GithubClient {
    pub fn new(token: &SecretString, endpoint: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("next-release"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("bearer {}", token.expose_secret()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl CompareSource for GithubClient {
    async fn compare(&self, request: &CompareRequest) -> Result<Comparison> {
        debug!(
            "comparing {}...{} in {}/{}",
            request.base, request.head, request.owner, request.repo
        );
        let body = GraphQLRequest {
            query: COMPARE_QUERY,
            variables: request,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::remote(format!(
                "Failed to compare {}...{}: {}",
                request.base, request.head, status
            )));
        }

        let payload: GraphQLResponse = response.json().await?;
        if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(ReleaseError::remote(messages.join("; ")));
        }

        let repository = payload
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| {
                ReleaseError::remote(format!(
                    "Repository {}/{} not found",
                    request.owner, request.repo
                ))
            })?;

        let comparison = Comparison::from(repository);
        match &comparison.reference {
            Some(r) => info!(
                "{} is {} commits ahead of {} ({} returned)",
                request.head,
                r.ahead_by,
                request.base,
                r.commits.len()
            ),
            None => info!("{} does not exist yet", request.base),
        }
        Ok(comparison)
    }
}
