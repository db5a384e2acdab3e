//! ADF to Markdown writer
//!
//! Converts an ADF node tree into a Markdown string. Rendering is dispatched
//! through a registry of handlers keyed by node tag; tags without a handler
//! fall back to rendering their children (or nothing, for leaves), so
//! documents using node types this crate does not know still render.

use crate::adf::{DocumentNode, Mark};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Renders one kind of node
///
/// `depth` is the list nesting depth; it only affects list items.
pub trait NodeHandler: Send + Sync {
    fn render(&self, renderer: &Renderer, node: &DocumentNode, depth: usize) -> String;
}

impl<F> NodeHandler for F
where
    F: Fn(&Renderer, &DocumentNode, usize) -> String + Send + Sync,
{
    fn render(&self, renderer: &Renderer, node: &DocumentNode, depth: usize) -> String {
        self(renderer, node, depth)
    }
}

/// Markdown renderer with a per-tag handler registry
pub struct Renderer {
    handlers: HashMap<String, Box<dyn NodeHandler>>,
}

static DEFAULT_RENDERER: LazyLock<Renderer> = LazyLock::new(Renderer::default);

/// Convert ADF nodes to Markdown using the built-in handlers
pub fn adf_to_markdown(nodes: &[DocumentNode]) -> String {
    DEFAULT_RENDERER.render(nodes)
}

impl Default for Renderer {
    fn default() -> Self {
        let mut renderer = Self::empty();
        renderer
            .register("paragraph", render_paragraph)
            .register("text", render_text)
            .register("heading", render_heading)
            .register("bulletList", render_bullet_list)
            .register("orderedList", render_ordered_list)
            .register("listItem", render_list_item_standalone)
            .register("rule", render_rule)
            .register("mediaSingle", render_media_single);
        renderer
    }
}

impl Renderer {
    /// Renderer with the built-in handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer without any handlers: every node falls back to its children
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for a tag
    pub fn register(
        &mut self,
        node_type: impl Into<String>,
        handler: impl NodeHandler + 'static,
    ) -> &mut Self {
        self.handlers.insert(node_type.into(), Box::new(handler));
        self
    }

    /// Builder-style variant of [`Renderer::register`]
    pub fn with_handler(
        mut self,
        node_type: impl Into<String>,
        handler: impl NodeHandler + 'static,
    ) -> Self {
        self.register(node_type, handler);
        self
    }

    pub fn has_handler(&self, node_type: &str) -> bool {
        self.handlers.contains_key(node_type)
    }

    /// Render top-level nodes and concatenate the results
    pub fn render(&self, nodes: &[DocumentNode]) -> String {
        nodes.iter().map(|node| self.render_node(node, 0)).collect()
    }

    /// Render a single node at the given list depth
    pub fn render_node(&self, node: &DocumentNode, depth: usize) -> String {
        match self.handlers.get(node.node_type.as_str()) {
            Some(handler) => handler.render(self, node, depth),
            None => self.render_children(node, depth),
        }
    }

    /// Fallback rule: children at the same depth, or empty for leaves
    pub fn render_children(&self, node: &DocumentNode, depth: usize) -> String {
        node.children()
            .iter()
            .map(|child| self.render_node(child, depth))
            .collect()
    }

    /// Render nodes as inline content (list depth reset to 0)
    pub fn render_inline(&self, nodes: &[DocumentNode]) -> String {
        nodes.iter().map(|node| self.render_node(node, 0)).collect()
    }

    /// Render one list entry: indent, marker, content, newline
    ///
    /// Paragraphs inside the item are rendered inline so the item stays on one
    /// line. Nested lists start on their own line one level deeper.
    pub fn render_list_item(&self, item: &DocumentNode, marker: &str, depth: usize) -> String {
        let indent = "  ".repeat(depth);
        let content: String = item
            .children()
            .iter()
            .map(|child| match child.node_type.as_str() {
                "paragraph" => self.render_inline(child.children()),
                "bulletList" | "orderedList" => {
                    format!("\n{}", self.render_node(child, depth + 1))
                }
                _ => self.render_node(child, depth),
            })
            .collect();

        format!("{indent}{marker} {content}\n")
    }
}

fn render_paragraph(renderer: &Renderer, node: &DocumentNode, _depth: usize) -> String {
    let mut output = renderer.render_inline(node.children());
    output.push_str("\n\n");
    output
}

fn render_text(_renderer: &Renderer, node: &DocumentNode, _depth: usize) -> String {
    apply_marks(node.text.as_deref().unwrap_or_default(), node.marks())
}

fn render_heading(renderer: &Renderer, node: &DocumentNode, _depth: usize) -> String {
    let level = heading_level(node.attr("level"));
    format!(
        "{} {}\n\n",
        "#".repeat(level),
        renderer.render_inline(node.children())
    )
}

fn render_bullet_list(renderer: &Renderer, node: &DocumentNode, depth: usize) -> String {
    let mut output: String = node
        .children()
        .iter()
        .map(|item| renderer.render_list_item(item, "-", depth))
        .collect();
    output.push('\n');
    output
}

fn render_ordered_list(renderer: &Renderer, node: &DocumentNode, depth: usize) -> String {
    let mut output: String = node
        .children()
        .iter()
        .enumerate()
        .map(|(i, item)| renderer.render_list_item(item, &format!("{}.", i + 1), depth))
        .collect();
    output.push('\n');
    output
}

// A listItem reached outside of a list has no marker to attach to.
fn render_list_item_standalone(renderer: &Renderer, node: &DocumentNode, _depth: usize) -> String {
    renderer.render_inline(node.children())
}

fn render_rule(_renderer: &Renderer, _node: &DocumentNode, _depth: usize) -> String {
    "---\n\n".to_string()
}

fn render_media_single(_renderer: &Renderer, node: &DocumentNode, _depth: usize) -> String {
    let Some(media) = node.children().first().filter(|child| child.is("media")) else {
        return String::new();
    };
    let Some(id) = media.attr_str("id").filter(|id| !id.is_empty()) else {
        return String::new();
    };
    let alt = media
        .attr_str("alt")
        .filter(|alt| !alt.is_empty())
        .unwrap_or("image");

    format!("![{alt}]({id})\n\n")
}

/// Wrap text with each mark in turn; later marks end up outermost.
fn apply_marks(text: &str, marks: &[Mark]) -> String {
    marks
        .iter()
        .fold(text.to_string(), |acc, mark| match mark.mark_type.as_str() {
            "strong" => format!("**{acc}**"),
            "em" => format!("*{acc}*"),
            "code" => format!("`{acc}`"),
            _ => acc,
        })
}

/// Heading level from `attrs.level`: 1 through 6, anything else falls back to 1.
fn heading_level(level: Option<&Value>) -> usize {
    let parsed = match level {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };

    parsed.filter(|level| (1..=6).contains(level)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adf::parse_document;

    fn text(s: &str) -> DocumentNode {
        DocumentNode::text(s)
    }

    fn para(s: &str) -> DocumentNode {
        DocumentNode::paragraph(vec![text(s)])
    }

    fn item(s: &str) -> DocumentNode {
        DocumentNode::list_item(vec![para(s)])
    }

    #[test]
    fn test_paragraph() {
        let md = adf_to_markdown(&[para("Hello world")]);
        assert_eq!(md, "Hello world\n\n");
    }

    #[test]
    fn test_paragraph_children_are_concatenated() {
        let md = adf_to_markdown(&[DocumentNode::paragraph(vec![
            text("Hello "),
            DocumentNode::marked_text("big", &["strong"]),
            text(" world"),
        ])]);
        assert_eq!(md, "Hello **big** world\n\n");
    }

    #[test]
    fn test_empty_paragraph() {
        let md = adf_to_markdown(&[DocumentNode::new("paragraph")]);
        assert_eq!(md, "\n\n");
    }

    #[test]
    fn test_text_without_marks() {
        assert_eq!(adf_to_markdown(&[text("plain")]), "plain");
    }

    #[test]
    fn test_single_marks() {
        assert_eq!(
            adf_to_markdown(&[DocumentNode::marked_text("x", &["strong"])]),
            "**x**"
        );
        assert_eq!(
            adf_to_markdown(&[DocumentNode::marked_text("x", &["em"])]),
            "*x*"
        );
        assert_eq!(
            adf_to_markdown(&[DocumentNode::marked_text("x", &["code"])]),
            "`x`"
        );
    }

    #[test]
    fn test_marks_compose_in_order() {
        // em is applied last, so it wraps the already-bold text
        let md = adf_to_markdown(&[DocumentNode::marked_text("x", &["strong", "em"])]);
        assert_eq!(md, format!("*{}*", "**x**"));

        let md = adf_to_markdown(&[DocumentNode::marked_text("x", &["code", "strong"])]);
        assert_eq!(md, "**`x`**");
    }

    #[test]
    fn test_unknown_marks_are_ignored() {
        let md = adf_to_markdown(&[DocumentNode::marked_text(
            "x",
            &["underline", "strong", "textColor"],
        )]);
        assert_eq!(md, "**x**");
    }

    #[test]
    fn test_text_without_payload() {
        let md = adf_to_markdown(&[DocumentNode::new("text")]);
        assert_eq!(md, "");
    }

    #[test]
    fn test_heading() {
        let md = adf_to_markdown(&[DocumentNode::heading(2, vec![text("Title")])]);
        assert_eq!(md, "## Title\n\n");
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let md = adf_to_markdown(&[DocumentNode::heading(level, vec![text("Title")])]);
            assert_eq!(md, format!("{} Title\n\n", "#".repeat(level as usize)));
        }
    }

    #[test]
    fn test_heading_level_defaults_to_one() {
        let missing = DocumentNode::new("heading").with_content(vec![text("T")]);
        assert_eq!(adf_to_markdown(&[missing]), "# T\n\n");

        let zero = DocumentNode::new("heading")
            .with_attr("level", 0)
            .with_content(vec![text("T")]);
        assert_eq!(adf_to_markdown(&[zero]), "# T\n\n");

        let garbage = DocumentNode::new("heading")
            .with_attr("level", "big")
            .with_content(vec![text("T")]);
        assert_eq!(adf_to_markdown(&[garbage]), "# T\n\n");

        let too_deep = DocumentNode::new("heading")
            .with_attr("level", 42)
            .with_content(vec![text("T")]);
        assert_eq!(adf_to_markdown(&[too_deep]), "# T\n\n");
    }

    #[test]
    fn test_heading_level_as_string() {
        let node = DocumentNode::new("heading")
            .with_attr("level", "3")
            .with_content(vec![text("T")]);
        assert_eq!(adf_to_markdown(&[node]), "### T\n\n");
    }

    #[test]
    fn test_bullet_list() {
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![item("A"), item("B")])]);
        assert_eq!(md, "- A\n- B\n\n");
    }

    #[test]
    fn test_ordered_list() {
        let md = adf_to_markdown(&[DocumentNode::ordered_list(vec![
            item("First"),
            item("Second"),
            item("Third"),
        ])]);
        assert_eq!(md, "1. First\n2. Second\n3. Third\n\n");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(adf_to_markdown(&[DocumentNode::bullet_list(vec![])]), "\n");
    }

    #[test]
    fn test_nested_list() {
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![DocumentNode::list_item(
            vec![
                para("Parent"),
                DocumentNode::bullet_list(vec![item("Child")]),
            ],
        )])]);
        assert_eq!(md, "- Parent\n  - Child\n\n\n\n");
    }

    #[test]
    fn test_nested_ordered_inside_bullet() {
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![DocumentNode::list_item(
            vec![
                para("Steps"),
                DocumentNode::ordered_list(vec![item("one"), item("two")]),
            ],
        )])]);
        assert!(md.starts_with("- Steps\n  1. one\n  2. two\n"));
    }

    #[test]
    fn test_doubly_nested_list_indent() {
        let inner = DocumentNode::bullet_list(vec![item("deep")]);
        let middle = DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
            para("mid"),
            inner,
        ])]);
        let outer = DocumentNode::bullet_list(vec![DocumentNode::list_item(vec![
            para("top"),
            middle,
        ])]);
        let md = adf_to_markdown(&[outer]);
        assert!(md.contains("- top\n  - mid\n    - deep\n"));
    }

    #[test]
    fn test_list_item_with_multiple_paragraphs() {
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![DocumentNode::list_item(
            vec![para("one"), para("two")],
        )])]);
        assert_eq!(md, "- onetwo\n\n");
    }

    #[test]
    fn test_list_item_with_other_block() {
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![DocumentNode::list_item(
            vec![para("above"), DocumentNode::rule()],
        )])]);
        assert_eq!(md, "- above---\n\n\n\n");
    }

    #[test]
    fn test_standalone_list_item() {
        let md = adf_to_markdown(&[item("loose")]);
        assert_eq!(md, "loose\n\n");
    }

    #[test]
    fn test_rule() {
        assert_eq!(adf_to_markdown(&[DocumentNode::rule()]), "---\n\n");
    }

    #[test]
    fn test_media_single() {
        let md = adf_to_markdown(&[DocumentNode::media_single(DocumentNode::media(
            "file-id",
            Some("diagram"),
        ))]);
        assert_eq!(md, "![diagram](file-id)\n\n");
    }

    #[test]
    fn test_media_single_default_alt() {
        let md = adf_to_markdown(&[DocumentNode::media_single(DocumentNode::media(
            "file-id", None,
        ))]);
        assert_eq!(md, "![image](file-id)\n\n");
    }

    #[test]
    fn test_media_single_without_id() {
        let media = DocumentNode::new("media").with_attr("alt", "nothing");
        let md = adf_to_markdown(&[DocumentNode::media_single(media)]);
        assert_eq!(md, "");
    }

    #[test]
    fn test_media_single_with_non_media_child() {
        let md = adf_to_markdown(&[DocumentNode::media_single(para("caption"))]);
        assert_eq!(md, "");

        assert_eq!(adf_to_markdown(&[DocumentNode::new("mediaSingle")]), "");
    }

    #[test]
    fn test_unknown_leaf_is_empty() {
        let md = adf_to_markdown(&[DocumentNode::new("emoji").with_attr("shortName", ":smile:")]);
        assert_eq!(md, "");
    }

    #[test]
    fn test_unknown_container_passes_through() {
        let panel = DocumentNode::new("panel").with_content(vec![para("inside"), DocumentNode::rule()]);
        assert_eq!(adf_to_markdown(&[panel]), "inside\n\n---\n\n");
    }

    #[test]
    fn test_unknown_container_keeps_list_depth() {
        let wrapped = DocumentNode::new("wrapper")
            .with_content(vec![DocumentNode::bullet_list(vec![item("kept")])]);
        let md = adf_to_markdown(&[DocumentNode::bullet_list(vec![DocumentNode::list_item(
            vec![para("outer"), wrapped],
        )])]);
        // The wrapped list is not a direct child, so it stays at the item's depth
        assert!(md.starts_with("- outer- kept\n"));
    }

    #[test]
    fn test_doc_root_passes_through() {
        let doc = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![text("Title")]),
            para("Body"),
        ]);
        assert_eq!(adf_to_markdown(&[doc]), "# Title\n\nBody\n\n");
    }

    #[test]
    fn test_top_level_nodes_are_concatenated() {
        let md = adf_to_markdown(&[para("One"), DocumentNode::rule(), para("Two")]);
        assert_eq!(md, "One\n\n---\n\nTwo\n\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(adf_to_markdown(&[]), "");
    }

    #[test]
    fn test_custom_handler() {
        let renderer = Renderer::new().with_handler(
            "hardBreak",
            |_: &Renderer, _: &DocumentNode, _: usize| "\n".to_string(),
        );
        let md = renderer.render(&[DocumentNode::paragraph(vec![
            text("line 1"),
            DocumentNode::new("hardBreak"),
            text("line 2"),
        ])]);
        assert_eq!(md, "line 1\nline 2\n\n");
    }

    #[test]
    fn test_custom_handler_replaces_builtin() {
        let mut renderer = Renderer::new();
        renderer.register("rule", |_: &Renderer, _: &DocumentNode, _: usize| {
            "***\n\n".to_string()
        });
        assert_eq!(renderer.render(&[DocumentNode::rule()]), "***\n\n");
    }

    #[test]
    fn test_empty_renderer_falls_back_everywhere() {
        let renderer = Renderer::empty();
        assert!(!renderer.has_handler("paragraph"));
        // Text leaves have no children, so nothing is produced
        assert_eq!(renderer.render(&[para("gone")]), "");
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level(None), 1);
        assert_eq!(heading_level(Some(&Value::from(4))), 4);
        assert_eq!(heading_level(Some(&Value::from(-2))), 1);
        assert_eq!(heading_level(Some(&Value::from(2.5))), 1);
        assert_eq!(heading_level(Some(&Value::from(" 5 "))), 5);
        assert_eq!(heading_level(Some(&Value::Bool(true))), 1);
    }

    #[test]
    fn test_realistic_description() {
        let json = r#"{
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "heading", "attrs": {"level": 3}, "content": [{"type": "text", "text": "Context"}]},
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Login fails when "},
                    {"type": "text", "text": "SSO", "marks": [{"type": "strong"}]},
                    {"type": "text", "text": " is enabled, see "},
                    {"type": "text", "text": "auth.rs", "marks": [{"type": "code"}]}
                ]},
                {"type": "orderedList", "attrs": {"order": 1}, "content": [
                    {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Enable SSO"}]}]},
                    {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Log in"}]}]}
                ]},
                {"type": "rule"},
                {"type": "mediaSingle", "attrs": {"layout": "center"}, "content": [
                    {"type": "media", "attrs": {"id": "a1b2", "type": "file", "collection": "jira"}}
                ]},
                {"type": "panel", "attrs": {"panelType": "info"}, "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "Workaround: disable SSO", "marks": [{"type": "em"}]}]}
                ]}
            ]
        }"#;
        let nodes = parse_document(json).unwrap();
        insta::assert_snapshot!(adf_to_markdown(&nodes), @r"
        ### Context

        Login fails when **SSO** is enabled, see `auth.rs`

        1. Enable SSO
        2. Log in

        ---

        ![image](a1b2)

        *Workaround: disable SSO*
        ");
    }
}
