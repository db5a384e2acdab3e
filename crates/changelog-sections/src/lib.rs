//! changelog-sections: Idempotent entry insertion for Keep a Changelog files
//!
//! This crate provides:
//! - A line classifier for the changelog heading grammar
//! - Insertion of an entry line under `## [Unreleased]` / `### <Section>`,
//!   creating missing structure and skipping entries that already exist
//!
//! The crate does no I/O. Callers read the file, call [`apply_entry`] and write
//! the result back when [`Applied::inserted`] is true; concurrent writers must
//! be serialized by the caller.
//!
//! # Example
//!
//! ```
//! use changelog_sections::{Section, apply_entry};
//!
//! let applied = apply_entry("", "- Fix login", Section::Fixed);
//! assert!(applied.inserted);
//! assert_eq!(applied.text, "## [Unreleased]\n\n### Fixed\n\n- Fix login\n");
//!
//! let again = apply_entry(&applied.text, "- Fix login", Section::Fixed);
//! assert!(!again.inserted);
//! ```

pub mod editor;
pub mod lines;
pub mod section;

pub use editor::{Applied, Changelog, apply_entry};
pub use lines::{LineKind, is_version_heading};
pub use section::{Section, UnknownSection};
