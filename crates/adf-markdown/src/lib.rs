//! adf-markdown: Atlassian Document Format types and Markdown writer
//!
//! This crate provides:
//! - A loose ADF (Atlassian Document Format) node model
//! - Conversion of ADF trees to Markdown, with pluggable per-tag handlers
//!
//! ## Example
//!
//! ```rust
//! use adf_markdown::{DocumentNode, adf_to_markdown};
//!
//! let doc = vec![
//!     DocumentNode::heading(2, vec![DocumentNode::text("Title")]),
//!     DocumentNode::paragraph(vec![DocumentNode::text("Body")]),
//! ];
//!
//! assert_eq!(adf_to_markdown(&doc), "## Title\n\nBody\n\n");
//! ```

pub mod adf;
pub mod writer;

pub use adf::{AdfError, DocumentNode, Mark, from_value, parse_document};
pub use writer::{NodeHandler, Renderer, adf_to_markdown};
