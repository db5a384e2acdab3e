//! Line classifier for changelog documents
//!
//! Markdown headings are treated as a weak grammar: each line is classified
//! on its own, without any context, and the editor searches over the
//! resulting kinds.

/// Kind of a single changelog line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Line containing `## [Unreleased]`
    Unreleased,
    /// Any other `## [` release heading; `versioned` when it matches
    /// `## [<major>.<minor>.<patch>]`
    Release { versioned: bool },
    /// `### <name>` sub-heading
    SubHeading(&'a str),
    /// Any other ATX heading
    Heading(usize),
    Content,
}

impl<'a> LineKind<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.trim().is_empty() {
            Self::Blank
        } else if line.contains("## [Unreleased]") {
            Self::Unreleased
        } else if line.starts_with("## [") {
            Self::Release {
                versioned: is_version_heading(line),
            }
        } else if let Some(name) = line.strip_prefix("### ") {
            Self::SubHeading(name)
        } else if line.starts_with('#') {
            Self::Heading(line.bytes().take_while(|&b| b == b'#').count())
        } else {
            Self::Content
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Whether this line opens a release block (`## [...]`), which closes
    /// the block above it
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Unreleased | Self::Release { .. })
    }

    /// Whether this line is a heading of rank `##` or deeper
    pub fn is_secondary_heading(&self) -> bool {
        match self {
            Self::Unreleased | Self::Release { .. } | Self::SubHeading(_) => true,
            Self::Heading(level) => *level >= 2,
            Self::Blank | Self::Content => false,
        }
    }
}

/// Whether the line starts with `## [<digits>.<digits>.<digits>]`
pub fn is_version_heading(line: &str) -> bool {
    let Some((version, _)) = line
        .strip_prefix("## [")
        .and_then(|rest| rest.split_once(']'))
    else {
        return false;
    };

    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_blank() {
        assert_eq!(LineKind::classify(""), LineKind::Blank);
        assert_eq!(LineKind::classify("   "), LineKind::Blank);
        assert_eq!(LineKind::classify("\r"), LineKind::Blank);
    }

    #[test]
    fn test_classify_release_headings() {
        assert_eq!(LineKind::classify("## [Unreleased]"), LineKind::Unreleased);
        assert_eq!(
            LineKind::classify("## [Unreleased] - upcoming"),
            LineKind::Unreleased
        );
        assert_eq!(
            LineKind::classify("## [1.2.3] - 2024-05-01"),
            LineKind::Release { versioned: true }
        );
        assert_eq!(
            LineKind::classify("## [next]"),
            LineKind::Release { versioned: false }
        );
    }

    #[test]
    fn test_classify_sub_heading() {
        assert_eq!(LineKind::classify("### Fixed"), LineKind::SubHeading("Fixed"));
        assert_eq!(
            LineKind::classify("### Fixed\r"),
            LineKind::SubHeading("Fixed")
        );
    }

    #[test]
    fn test_classify_other_lines() {
        assert_eq!(LineKind::classify("# Changelog"), LineKind::Heading(1));
        assert_eq!(LineKind::classify("## Notes"), LineKind::Heading(2));
        assert_eq!(LineKind::classify("- [ABC-1](u) s"), LineKind::Content);
        assert_eq!(
            LineKind::classify("All notable changes are documented here."),
            LineKind::Content
        );
    }

    #[test]
    fn test_secondary_heading() {
        assert!(LineKind::classify("## [1.0.0]").is_secondary_heading());
        assert!(LineKind::classify("### Added").is_secondary_heading());
        assert!(LineKind::classify("## Notes").is_secondary_heading());
        assert!(!LineKind::classify("# Changelog").is_secondary_heading());
        assert!(!LineKind::classify("- entry").is_secondary_heading());
    }

    #[test]
    fn test_is_version_heading() {
        assert!(is_version_heading("## [1.2.3]"));
        assert!(is_version_heading("## [10.20.30] - 2024-01-01"));
        assert!(!is_version_heading("## [1.2]"));
        assert!(!is_version_heading("## [1.2.3.4]"));
        assert!(!is_version_heading("## [v1.2.3]"));
        assert!(!is_version_heading("## [1.2.3-rc.1]"));
        assert!(!is_version_heading("## [Unreleased]"));
        assert!(!is_version_heading("### [1.2.3]"));
        assert!(!is_version_heading("## 1.2.3"));
    }
}
