//! Idempotent entry insertion
//!
//! The document is kept as a sequence of lines and edited with index-based
//! splices. Every search is re-run after a structural change; no index is
//! carried across a mutation.

use crate::lines::LineKind;
use crate::section::Section;

const UNRELEASED_HEADING: &str = "## [Unreleased]";

/// Result of [`apply_entry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Full replacement text (the input, untouched, when nothing was inserted)
    pub text: String,
    /// False when the entry was already present
    pub inserted: bool,
}

/// Insert `entry` as the first line of `### <section>` in the Unreleased block
///
/// Missing structure (the Unreleased block, the sub-heading) is created. When
/// `entry` already appears as a line anywhere in the document, the text is
/// returned unchanged with `inserted = false`.
pub fn apply_entry(text: &str, entry: &str, section: Section) -> Applied {
    let mut changelog = Changelog::parse(text);

    if changelog.insert_entry(entry, section) {
        Applied {
            text: changelog.to_text(),
            inserted: true,
        }
    } else {
        Applied {
            text: text.to_string(),
            inserted: false,
        }
    }
}

/// A changelog document as an editable sequence of lines
///
/// Each stored line keeps its own `\r` when the file used CRLF there, so
/// lines that are not edited are written back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    lines: Vec<String>,
    trailing_newline: bool,
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

impl Changelog {
    /// Split `text` into lines; the final newline is remembered, not stored
    /// as an empty line. An empty document counts as newline-terminated.
    pub fn parse(text: &str) -> Self {
        let body = text.strip_suffix('\n');
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.unwrap_or(text)
                .split('\n')
                .map(str::to_string)
                .collect()
        };

        Self {
            lines,
            trailing_newline: text.is_empty() || body.is_some(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }

    fn kind(&self, index: usize) -> Option<LineKind<'_>> {
        self.lines.get(index).map(|line| LineKind::classify(line))
    }

    /// Insert `new_lines` at `at`, with the line ending of the line above
    /// (or below, at the top of the document)
    fn insert_lines(&mut self, at: usize, new_lines: &[&str]) {
        let neighbor = at
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .or_else(|| self.lines.get(at));
        let ending = if neighbor.is_some_and(|line| line.ends_with('\r')) {
            "\r"
        } else {
            ""
        };

        self.lines.splice(
            at..at,
            new_lines.iter().map(|line| format!("{line}{ending}")),
        );
    }

    /// Whether `line` is present verbatim (a trailing `\r` is ignored)
    pub fn contains_line(&self, line: &str) -> bool {
        self.contains_lines(&[strip_cr(line)])
    }

    /// Whether `block` appears as consecutive lines of the document
    pub fn contains_lines(&self, block: &[&str]) -> bool {
        !block.is_empty()
            && self.lines.windows(block.len()).any(|window| {
                window
                    .iter()
                    .zip(block)
                    .all(|(existing, line)| strip_cr(existing) == strip_cr(line))
            })
    }

    /// Index of the `## [Unreleased]` heading
    pub fn unreleased_index(&self) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| LineKind::classify(line) == LineKind::Unreleased)
    }

    /// Index of the first `## [x.y.z]` heading
    pub fn first_version_index(&self) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| LineKind::classify(line) == LineKind::Release { versioned: true })
    }

    /// Index one past the last line of the release block starting at `start`:
    /// the next `## [` heading, or the end of the document.
    fn block_end(&self, start: usize) -> usize {
        (start + 1..self.lines.len())
            .find(|&i| self.kind(i).is_some_and(|kind| kind.is_release()))
            .unwrap_or(self.lines.len())
    }

    /// Index of `### <section>` inside the Unreleased block
    pub fn find_section(&self, section: Section) -> Option<usize> {
        let start = self.unreleased_index()?;
        let end = self.block_end(start);

        (start + 1..end).find(|&i| self.kind(i) == Some(LineKind::SubHeading(section.as_str())))
    }

    /// Make sure an Unreleased block exists and return its heading index
    ///
    /// A new block goes right before the first version heading, or at the top
    /// of the document when there is none.
    pub fn ensure_unreleased(&mut self) -> usize {
        if let Some(index) = self.unreleased_index() {
            return index;
        }

        let at = self.first_version_index().unwrap_or(0);
        log::debug!("No Unreleased block found, creating one at line {}", at + 1);
        self.insert_lines(at, &[UNRELEASED_HEADING, ""]);

        self.unreleased_index().unwrap_or(at)
    }

    /// Make sure `### <section>` exists in the Unreleased block and return its
    /// index
    ///
    /// A new sub-heading is appended after the last non-blank line of the
    /// block, separated from it by one blank line.
    pub fn ensure_section(&mut self, section: Section) -> usize {
        let start = self.ensure_unreleased();
        if let Some(index) = self.find_section(section) {
            return index;
        }

        let end = self.block_end(start);
        let content_end = (start + 1..end)
            .rev()
            .find(|&i| self.kind(i).is_some_and(|kind| !kind.is_blank()))
            .map_or(start + 1, |i| i + 1);

        let mut at = content_end;
        if !(at < end && self.kind(at).is_some_and(|kind| kind.is_blank())) {
            self.insert_lines(at, &[""]);
        }
        at += 1;

        let heading = section.heading();
        log::debug!("Creating {heading} at line {}", at + 1);
        self.insert_lines(at, &[heading.as_str(), ""]);

        self.find_section(section).unwrap_or(at)
    }

    /// Insert `entry` at the top of `### <section>` in the Unreleased block
    ///
    /// An entry spanning several lines is inserted as a block and counts as
    /// present only when all of its lines appear consecutively. Returns false,
    /// leaving the document untouched, when the entry is blank or already
    /// present anywhere in the document.
    pub fn insert_entry(&mut self, entry: &str, section: Section) -> bool {
        let entry = entry.trim_end_matches(['\r', '\n']);
        if entry.trim().is_empty() {
            return false;
        }

        let entry_lines: Vec<&str> = entry.split('\n').map(strip_cr).collect();
        if self.contains_lines(&entry_lines) {
            log::debug!("Entry already present: {entry}");
            return false;
        }

        let heading = self.ensure_section(section);

        // The sub-heading is always followed by one blank line
        if !self.kind(heading + 1).is_some_and(|kind| kind.is_blank()) {
            self.insert_lines(heading + 1, &[""]);
        }

        let at = heading + 2;
        self.insert_lines(at, &entry_lines);

        let after = at + entry_lines.len();
        if self
            .kind(after)
            .is_some_and(|kind| kind.is_secondary_heading())
        {
            self.insert_lines(after, &[""]);
        }

        true
    }
}
