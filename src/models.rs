/// Result of comparing the last release tag against the development branch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub repository_name: String,
    /// `None` when the base tag has not been published yet.
    pub reference: Option<RefComparison>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefComparison {
    pub ahead_by: u64,
    pub commits: Vec<CommitEntry>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitEntry {
    pub message: String,
    pub associated_pull_requests: Vec<PullRequestRef>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PullRequestRef {
    pub number: u64,
    pub merged: bool,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub name: String,
}

impl Comparison {
    pub fn ref_not_found(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            reference: None,
        }
    }

    pub fn commits(&self) -> &[CommitEntry] {
        self.reference
            .as_ref()
            .map(|r| r.commits.as_slice())
            .unwrap_or_default()
    }
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
