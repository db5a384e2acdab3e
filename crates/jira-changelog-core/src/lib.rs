//! jira-changelog-core: Core library for turning Jira issues into changelog entries
//!
//! This crate provides:
//! - Issue keys, browse URLs and one-line summaries
//! - ADF to Markdown rendering (re-exported from `adf-markdown`)
//! - Idempotent changelog insertion (re-exported from `changelog-sections`)
//!
//! Fetching issues from Jira is left to the caller; this crate only needs the
//! issue key, its URL and its summary.
//!
//! # Example
//!
//! ```
//! use jira_changelog_core::{Issue, IssueId, Section, Summary, add_issue, browse_url};
//!
//! let id = IssueId::parse("ABC-123").unwrap();
//! let url = browse_url("https://acme.atlassian.net", &id).unwrap();
//! let issue = Issue::new(id, url, Summary::plain("Fix login").unwrap());
//!
//! let applied = add_issue("", &issue, Section::Fixed);
//! assert!(applied.inserted);
//! assert!(applied.text.contains(
//!     "- [ABC-123](https://acme.atlassian.net/browse/ABC-123) Fix login"
//! ));
//! ```

pub mod issue;

pub use adf_markdown::{
    AdfError, DocumentNode, Mark, NodeHandler, Renderer, adf_to_markdown, parse_document,
};
pub use changelog_sections::{Applied, Changelog, Section, UnknownSection, apply_entry};
pub use issue::{
    EntryError, Issue, IssueId, IssueIdError, Summary, browse_url, validate_base_url,
};

/// Add the entry line of `issue` to a changelog document
pub fn add_issue(changelog: &str, issue: &Issue, section: Section) -> Applied {
    apply_entry(changelog, &issue.entry_line(), section)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(key: &str, summary: &str) -> Issue {
        let id = IssueId::parse(key).unwrap();
        let url = browse_url("https://acme.atlassian.net", &id).unwrap();
        Issue::new(id, url, Summary::plain(summary).unwrap())
    }

    #[test]
    fn test_add_issue_twice() {
        let changelog = "# Changelog\n\n## [1.0.0] - 2024-01-01\n\n### Added\n\n- Initial release\n";
        let fix = issue("ABC-7", "Fix crash on start");

        let first = add_issue(changelog, &fix, Section::Fixed);
        assert!(first.inserted);
        assert_eq!(
            first.text,
            "# Changelog\n\n## [Unreleased]\n\n### Fixed\n\n\
             - [ABC-7](https://acme.atlassian.net/browse/ABC-7) Fix crash on start\n\n\
             ## [1.0.0] - 2024-01-01\n\n### Added\n\n- Initial release\n"
        );

        let second = add_issue(&first.text, &fix, Section::Fixed);
        assert!(!second.inserted);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_add_issues_to_different_sections() {
        let mut text = String::new();
        text = add_issue(&text, &issue("ABC-1", "Export to CSV"), Section::Added).text;
        text = add_issue(&text, &issue("ABC-2", "Null pointer in parser"), Section::Fixed).text;
        text = add_issue(&text, &issue("ABC-3", "Import from JSON"), Section::Added).text;

        assert_eq!(
            text,
            "## [Unreleased]\n\n### Added\n\n\
             - [ABC-3](https://acme.atlassian.net/browse/ABC-3) Import from JSON\n\
             - [ABC-1](https://acme.atlassian.net/browse/ABC-1) Export to CSV\n\n\
             ### Fixed\n\n\
             - [ABC-2](https://acme.atlassian.net/browse/ABC-2) Null pointer in parser\n"
        );
    }
}
