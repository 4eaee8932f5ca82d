use crate::config::Captions;
use crate::markup::{self, MarkupTree, Predicate};

/// Reads the type name and its detailed description.
pub struct TypeHeaderExtractor<'a> {
    tree: &'a MarkupTree,
    captions: &'a Captions,
}

impl<'a> TypeHeaderExtractor<'a> {
    /// Creates a new instance of `TypeHeaderExtractor` over one loaded page.
    ///
    /// # Arguments
    /// * `tree` - The parsed page to read from.
    /// * `captions` - Localised markers of the generator that wrote the page.
    pub fn new(tree: &'a MarkupTree, captions: &'a Captions) -> Self {
        TypeHeaderExtractor { tree, captions }
    }

    /// First word of the page title (`Widget 类 参考` gives `Widget`).
    pub fn name(&self) -> String {
        self.tree
            .find_first(&Predicate::HasClass("title"))
            .map(|title| markup::text(&title))
            .and_then(|title| title.split_whitespace().next().map(str::to_string))
            .unwrap_or_default()
    }

    /// Text of the block following the detailed description heading.
    pub fn description(&self) -> String {
        let heading = Predicate::Tag("h2").and(Predicate::ContainsText(
            &self.captions.detailed_description,
        ));
        self.tree
            .find_first(&heading)
            .and_then(|h2| markup::next_sibling(&h2))
            .map(|block| markup::text(&block))
            .unwrap_or_default()
    }
}
