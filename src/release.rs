//! Release decision: which pull requests ship, how big the bump is, and the
//! resulting version number.

use crate::error::{ReleaseError, Result};
use crate::models::Comparison;
use log::debug;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Size of the next version bump. `None` means nothing to release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Increment {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl Increment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Increment::None => "",
            Increment::Patch => "patch",
            Increment::Minor => "minor",
            Increment::Major => "major",
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Increment {
    type Err = std::convert::Infallible;

    /// Unknown values map to `None`, leaving the version untouched.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "patch" => Increment::Patch,
            "minor" => Increment::Minor,
            "major" => Increment::Major,
            _ => Increment::None,
        })
    }
}

/// Drop commits that are not linked to at least one merged pull request.
pub fn filter_merged(mut comparison: Comparison) -> Comparison {
    if let Some(reference) = comparison.reference.as_mut() {
        let before = reference.commits.len();
        reference
            .commits
            .retain(|commit| commit.associated_pull_requests.iter().any(|pr| pr.merged));
        debug!(
            "kept {} of {} commits linked to merged pull requests",
            reference.commits.len(),
            before
        );
    }
    comparison
}

/// Markdown list of the pull requests in the comparison, one per number,
/// sorted ascending.
pub fn changelog(comparison: &Comparison) -> Vec<String> {
    comparison
        .commits()
        .iter()
        .flat_map(|commit| commit.associated_pull_requests.iter().map(|pr| pr.number))
        .collect::<BTreeSet<u64>>()
        .into_iter()
        .map(|number| format!("- #{}", number))
        .collect()
}

fn normalize_label(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

/// Scan pull request labels to decide what kind of release is needed.
pub fn detect_changes(comparison: &Comparison) -> Increment {
    let reference = match &comparison.reference {
        Some(reference) if reference.ahead_by >= 1 => reference,
        _ => return Increment::None,
    };

    let mut increment = Increment::Patch;

    for commit in &reference.commits {
        for pr in &commit.associated_pull_requests {
            for label in &pr.labels {
                let normalized = normalize_label(&label.name);
                debug!("#{} label '{}'", pr.number, normalized);
                match normalized.as_str() {
                    "breaking-change" => return Increment::Major,
                    "feature" => increment = Increment::Minor,
                    _ => {}
                }
            }
        }
    }

    increment
}

fn is_numeric_identifier(part: &str) -> bool {
    !part.is_empty()
        && part.bytes().all(|b| b.is_ascii_digit())
        && (part == "0" || !part.starts_with('0'))
}

fn parse_triplet(unstaged: &str) -> Result<(u64, u64, u64)> {
    let invalid = || ReleaseError::InvalidVersion(unstaged.to_string());
    let parts = unstaged
        .split('.')
        .map(|part| {
            if !is_numeric_identifier(part) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        })
        .collect::<Result<Vec<_>>>()?;

    match parts.as_slice() {
        [major, minor, patch] => Ok((*major, *minor, *patch)),
        _ => Err(invalid()),
    }
}

/// Counter after the last `.` of the stage; 0 when absent or not a number.
fn stage_counter(current: &str, stage: &str) -> Result<u64> {
    match stage.rsplit_once('.') {
        Some((_, n)) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => n
            .parse::<u64>()
            .map_err(|_| ReleaseError::InvalidVersion(current.to_string())),
        _ => Ok(0),
    }
}

fn bump(value: u64, current: &str) -> Result<u64> {
    value
        .checked_add(1)
        .ok_or_else(|| ReleaseError::InvalidVersion(current.to_string()))
}

/// Next version number for `current`.
///
/// `separator` is the literal marker between the `major.minor.patch`
/// triplet and the pre-release suffix, e.g. `-beta` in `15.0.0-beta.2`.
/// An existing pre-release either ends (stable intent) or gets its counter
/// bumped; `increment` only applies when `current` is not staged.
pub fn next_version(
    current: &str,
    increment: Increment,
    pre_release: bool,
    separator: &str,
) -> Result<String> {
    if separator.is_empty() {
        return Err(ReleaseError::invalid_argument("separator is required"));
    }

    let (unstaged, stage) = match current.split_once(separator) {
        Some((unstaged, stage)) => (unstaged, Some(stage)),
        None => (current, None),
    };
    let (mut major, mut minor, mut patch) = parse_triplet(unstaged)?;

    match (pre_release, stage) {
        // end pre-release
        (false, Some(_)) => return Ok(unstaged.to_string()),
        // bump pre-release
        (true, Some(stage)) => {
            let counter = bump(stage_counter(current, stage)?, current)?;
            return Ok(format!("{}{}.{}", unstaged, separator, counter));
        }
        _ => {}
    }

    match increment {
        Increment::Major => {
            major = bump(major, current)?;
            minor = 0;
            patch = 0;
        }
        Increment::Minor => {
            minor = bump(minor, current)?;
            patch = 0;
        }
        Increment::Patch => patch = bump(patch, current)?,
        Increment::None => {}
    }

    let version = format!("{}.{}.{}", major, minor, patch);

    // start pre-release
    if pre_release {
        return Ok(format!("{}{}", version, separator));
    }

    Ok(version)
}
