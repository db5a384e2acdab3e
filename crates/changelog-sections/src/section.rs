//! Change categories used as `### <Section>` sub-headings

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a name is not one of the six change categories
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown changelog section '{0}' (expected one of: Added, Changed, Deprecated, Removed, Fixed, Security)")]
pub struct UnknownSection(pub String);

/// Change category of a changelog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl Section {
    /// All sections in Keep a Changelog order
    pub const ALL: [Section; 6] = [
        Section::Added,
        Section::Changed,
        Section::Deprecated,
        Section::Removed,
        Section::Fixed,
        Section::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Security => "Security",
        }
    }

    /// Sub-heading line for this section (e.g. `### Fixed`)
    pub fn heading(&self) -> String {
        format!("### {}", self.as_str())
    }

    /// Short human-readable explanation of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Added => "New feature",
            Self::Changed => "Change to existing functionality",
            Self::Deprecated => "Feature marked as deprecated",
            Self::Removed => "Feature removed",
            Self::Fixed => "Bug fix",
            Self::Security => "Vulnerability fix",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    /// Parse a section name, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
