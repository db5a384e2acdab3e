//! Issue identifiers and changelog entry lines

use adf_markdown::{DocumentNode, adf_to_markdown};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Errors for malformed issue identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueIdError {
    #[error("Issue ID is required")]
    Empty,

    #[error("Invalid issue ID '{0}': expected a project key and number, e.g. ISSUE-123")]
    InvalidFormat(String),
}

/// Errors raised while building an entry line
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Issue has no summary")]
    EmptySummary,

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Base URL must use http or https: {0}")]
    UnsupportedScheme(String),
}

/// A Jira issue key such as `ABC-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueId(String);

impl IssueId {
    /// Parse an issue key: uppercase ASCII letters, a dash, ASCII digits
    pub fn parse(s: &str) -> Result<Self, IssueIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IssueIdError::Empty);
        }

        let valid = s.split_once('-').is_some_and(|(project, number)| {
            !project.is_empty()
                && project.bytes().all(|b| b.is_ascii_uppercase())
                && !number.is_empty()
                && number.bytes().all(|b| b.is_ascii_digit())
        });

        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(IssueIdError::InvalidFormat(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IssueId {
    type Err = IssueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Check that `base_url` is an absolute http(s) URL
pub fn validate_base_url(base_url: &str) -> Result<Url, EntryError> {
    let base = base_url.trim();
    let parsed = Url::parse(base).map_err(|source| EntryError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;

    if matches!(parsed.scheme(), "http" | "https") {
        Ok(parsed)
    } else {
        Err(EntryError::UnsupportedScheme(base.to_string()))
    }
}

/// Browse URL of an issue: `<base>/browse/<ID>`
pub fn browse_url(base_url: &str, id: &IssueId) -> Result<String, EntryError> {
    validate_base_url(base_url)?;
    Ok(format!("{}/browse/{}", base_url.trim().trim_end_matches('/'), id))
}

/// One-line issue summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary(String);

impl Summary {
    /// Summary from plain text; line breaks and whitespace runs collapse to
    /// single spaces
    pub fn plain(text: &str) -> Result<Self, EntryError> {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            Err(EntryError::EmptySummary)
        } else {
            Ok(Self(collapsed))
        }
    }

    /// Summary rendered from an ADF document and flattened to one line
    pub fn from_adf(nodes: &[DocumentNode]) -> Result<Self, EntryError> {
        Self::plain(&adf_to_markdown(nodes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The pieces of an issue that make up a changelog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: IssueId,
    pub url: String,
    pub summary: Summary,
}

impl Issue {
    pub fn new(id: IssueId, url: impl Into<String>, summary: Summary) -> Self {
        Self {
            id,
            url: url.into(),
            summary,
        }
    }

    /// Markdown list item: `- [ID](url) summary`
    pub fn entry_line(&self) -> String {
        format!("- [{}]({}) {}", self.id, self.url, self.summary)
    }
}
