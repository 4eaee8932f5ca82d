use crate::config::Captions;
use crate::extractor::{cell_text, description_cell, is_inherited, member_id, section_rows};
use crate::markup::{self, MarkupTree};
use crate::record::{MemberVariable, Visibility};

/// Reads the attribute table of one visibility.
pub struct MemberVariableExtractor<'a> {
    tree: &'a MarkupTree,
    captions: &'a Captions,
}

impl<'a> MemberVariableExtractor<'a> {
    /// Creates a new instance of `MemberVariableExtractor` over one loaded page.
    ///
    /// # Arguments
    /// * `tree` - The parsed page to read from.
    /// * `captions` - Localised markers of the generator that wrote the page.
    pub fn new(tree: &'a MarkupTree, captions: &'a Captions) -> Self {
        MemberVariableExtractor { tree, captions }
    }

    /// Member variables declared with `visibility`, in table order.
    ///
    /// Rows documenting inherited members are dropped. A brief description is
    /// attached only from the description row linked to the same member id.
    ///
    /// # Arguments
    /// * `visibility` - Selects the `<Visibility> 属性` table.
    ///
    /// # Returns
    /// * One `MemberVariable` per own member row; empty when the page has no
    ///   such table.
    pub fn extract(&self, visibility: Visibility) -> Vec<MemberVariable> {
        let caption = self.captions.attribute_caption(visibility);
        let mut variables = Vec::new();

        for row in section_rows(self.tree, &caption) {
            if is_inherited(&row) {
                tracing::debug!(%visibility, "skipping inherited attribute row");
                continue;
            }
            let short_description = member_id(&row)
                .and_then(|id| description_cell(self.tree, &id))
                .map(|cell| markup::text(&cell))
                .unwrap_or_default();

            variables.push(MemberVariable {
                declared_type: cell_text(&row, "memItemLeft"),
                name: cell_text(&row, "memItemRight"),
                short_description,
            });
        }

        variables
    }
}
