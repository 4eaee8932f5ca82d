//! Query layer over a parsed generator page.
//!
//! Every extractor talks to the page through [`MarkupTree`] and the free
//! functions in this module. Lookups that find nothing return `None` or an
//! empty `Vec`; nothing here fails once the page has been loaded.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

use crate::error::ExtractError;

/// A node of the parsed document.
pub type Node = Handle;

/// Elements whose boundaries separate words in extracted text.
const BLOCK_TAGS: &[&str] = &[
    "br", "caption", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ol",
    "p", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

/// Typed element predicates used to locate sections of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<'a> {
    /// Element tag name, e.g. `tr`.
    Tag(&'a str),
    /// Whitespace separated `class` attribute contains the given token.
    HasClass(&'a str),
    /// Attribute value equals the given string.
    AttrEquals(&'a str, &'a str),
    /// Attribute value starts with the given string.
    AttrPrefix(&'a str, &'a str),
    /// Attribute value contains the given string.
    AttrContains(&'a str, &'a str),
    /// Normalised text content contains the given string.
    ContainsText(&'a str),
    /// Normalised text content equals the given string.
    TextEquals(&'a str),
    /// Every inner predicate matches.
    All(Vec<Predicate<'a>>),
}

impl<'a> Predicate<'a> {
    /// Combines two predicates; both must match.
    pub fn and(self, other: Predicate<'a>) -> Predicate<'a> {
        match self {
            Predicate::All(mut inner) => {
                inner.push(other);
                Predicate::All(inner)
            }
            first => Predicate::All(vec![first, other]),
        }
    }

    /// Tests `node` against the predicate. Non-element nodes never match.
    pub fn matches(&self, node: &Node) -> bool {
        let Some(tag) = tag_name(node) else {
            return false;
        };
        match self {
            Predicate::Tag(name) => tag == *name,
            Predicate::HasClass(class) => has_class(node, class),
            Predicate::AttrEquals(key, value) => attribute(node, key).is_some_and(|v| v == *value),
            Predicate::AttrPrefix(key, prefix) => {
                attribute(node, key).is_some_and(|v| v.starts_with(prefix))
            }
            Predicate::AttrContains(key, needle) => {
                attribute(node, key).is_some_and(|v| v.contains(needle))
            }
            Predicate::ContainsText(needle) => text(node).contains(needle),
            Predicate::TextEquals(expected) => text(node) == *expected,
            Predicate::All(inner) => inner.iter().all(|p| p.matches(node)),
        }
    }
}

/// One loaded page together with its id lookups.
///
/// Two indexes are built once at parse time:
/// - element `id` attribute to element, used to reach detail blocks;
/// - single-token `kind:id` class value to element, used to pair a member
///   row with its description row.
///
/// Both keep the first element in document order.
pub struct MarkupTree {
    dom: RcDom,
    ids: HashMap<String, Node>,
    linked: HashMap<String, Node>,
}

impl MarkupTree {
    /// Reads and parses the page at `path`.
    ///
    /// # Errors
    ///
    /// `ExtractError::SourceNotFound` if the file does not exist, `ExtractError::Io`
    /// for any other read failure.
    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let bytes = fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ExtractError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => ExtractError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parses an in-memory page.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut ids = HashMap::new();
        let mut linked = HashMap::new();
        walk(&dom.document, &mut |node| {
            if let Some(id) = attribute(node, "id") {
                ids.entry(id).or_insert_with(|| node.clone());
            }
            if let Some(class) = attribute(node, "class") {
                if class.contains(':') && !class.contains(char::is_whitespace) {
                    linked.entry(class).or_insert_with(|| node.clone());
                }
            }
        });

        MarkupTree { dom, ids, linked }
    }

    /// The document node.
    pub fn root(&self) -> &Node {
        &self.dom.document
    }

    /// All elements of the page matching `predicate`, in document order.
    pub fn find_all(&self, predicate: &Predicate) -> Vec<Node> {
        select(self.root(), predicate)
    }

    /// The first element of the page matching `predicate`.
    pub fn find_first(&self, predicate: &Predicate) -> Option<Node> {
        select_first(self.root(), predicate)
    }

    /// The element carrying `id="<id>"`.
    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        self.ids.get(id).cloned()
    }

    /// The element whose class attribute is exactly `<kind>:<id>`.
    pub fn linked(&self, kind: &str, id: &str) -> Option<Node> {
        self.linked.get(&format!("{kind}:{id}")).cloned()
    }
}

/// Visits every descendant of `node` in document order.
fn walk(node: &Node, visit: &mut impl FnMut(&Node)) {
    for child in node.children.borrow().iter() {
        visit(child);
        walk(child, visit);
    }
}

/// Descendants of `scope` (excluding `scope` itself) matching `predicate`.
pub fn select(scope: &Node, predicate: &Predicate) -> Vec<Node> {
    let mut found = Vec::new();
    walk(scope, &mut |node| {
        if predicate.matches(node) {
            found.push(node.clone());
        }
    });
    found
}

/// The first descendant of `scope` matching `predicate`.
pub fn select_first(scope: &Node, predicate: &Predicate) -> Option<Node> {
    for child in scope.children.borrow().iter() {
        if predicate.matches(child) {
            return Some(child.clone());
        }
        if let Some(found) = select_first(child, predicate) {
            return Some(found);
        }
    }
    None
}

/// Matches below any of `scopes`, in order, without duplicates.
pub fn select_unique(scopes: &[Node], predicate: &Predicate) -> Vec<Node> {
    let mut found: Vec<Node> = Vec::new();
    for scope in scopes {
        for node in select(scope, predicate) {
            if !found.iter().any(|seen| Rc::ptr_eq(seen, &node)) {
                found.push(node);
            }
        }
    }
    found
}

/// Tag name of an element node.
pub fn tag_name(node: &Node) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Value of attribute `key`, if the node is an element carrying it.
pub fn attribute(node: &Node, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Returns `true` if the `class` attribute lists `class` as one of its tokens.
pub fn has_class(node: &Node, class: &str) -> bool {
    attribute(node, "class").is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

/// Visible text of `node` with whitespace runs collapsed to single spaces and
/// the ends trimmed.
pub fn text(node: &Node) -> String {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(node: &Node, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref();
            if tag == "script" || tag == "style" {
                return;
            }
            let block = BLOCK_TAGS.contains(&tag);
            if block {
                out.push(' ');
            }
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
            if block {
                out.push(' ');
            }
        }
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

/// The parent node, element or document.
pub fn parent(node: &Node) -> Option<Node> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Element children of `node`.
pub fn children(node: &Node) -> Vec<Node> {
    node.children
        .borrow()
        .iter()
        .filter(|child| tag_name(child).is_some())
        .cloned()
        .collect()
}

/// The first element child.
pub fn first_child(node: &Node) -> Option<Node> {
    children(node).into_iter().next()
}

/// The last element child.
pub fn last_child(node: &Node) -> Option<Node> {
    children(node).pop()
}

/// Element siblings of `node` (including itself) and its position among them.
fn element_siblings(node: &Node) -> Option<(Vec<Node>, usize)> {
    let siblings = children(&parent(node)?);
    let index = siblings.iter().position(|s| Rc::ptr_eq(s, node))?;
    Some((siblings, index))
}

/// The next element sibling.
pub fn next_sibling(node: &Node) -> Option<Node> {
    let (siblings, index) = element_siblings(node)?;
    siblings.get(index + 1).cloned()
}

/// The previous element sibling.
pub fn previous_sibling(node: &Node) -> Option<Node> {
    let (siblings, index) = element_siblings(node)?;
    index.checked_sub(1).and_then(|i| siblings.get(i).cloned())
}

/// Element siblings following `node`, nearest first.
pub fn following_siblings(node: &Node) -> Vec<Node> {
    match element_siblings(node) {
        Some((siblings, index)) => siblings.into_iter().skip(index + 1).collect(),
        None => Vec::new(),
    }
}

/// All element siblings of `node`, excluding `node` itself.
pub fn siblings(node: &Node) -> Vec<Node> {
    match element_siblings(node) {
        Some((mut siblings, index)) => {
            siblings.remove(index);
            siblings
        }
        None => Vec::new(),
    }
}

/// The nearest ancestor matching `predicate`.
pub fn ancestor(node: &Node, predicate: &Predicate) -> Option<Node> {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if predicate.matches(&candidate) {
            return Some(candidate);
        }
        current = parent(&candidate);
    }
    None
}

/// Returns `true` if `outer` is a proper ancestor of `node`.
pub fn is_ancestor(outer: &Node, node: &Node) -> bool {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, outer) {
            return true;
        }
        current = parent(&candidate);
    }
    false
}
