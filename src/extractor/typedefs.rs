use crate::config::Captions;
use crate::extractor::{is_inherited, member_row_predicate};
use crate::markup::{self, MarkupTree, Predicate};
use crate::record::TypedefEntry;

/// Reads nested type aliases from every declaration table of the page.
pub struct TypedefExtractor<'a> {
    tree: &'a MarkupTree,
    captions: &'a Captions,
}

impl<'a> TypedefExtractor<'a> {
    /// Creates a new instance of `TypedefExtractor` over one loaded page.
    ///
    /// # Arguments
    /// * `tree` - The parsed page to read from.
    /// * `captions` - Localised markers of the generator that wrote the page.
    pub fn new(tree: &'a MarkupTree, captions: &'a Captions) -> Self {
        TypedefExtractor { tree, captions }
    }

    /// Type aliases in document order. The description is the text of the row
    /// right after the alias row, or the placeholder when that is empty.
    ///
    /// # Returns
    /// * Every own `typedef` row of every declaration table on the page.
    pub fn extract(&self) -> Vec<TypedefEntry> {
        let rows = member_row_predicate()
            .and(Predicate::ContainsText(&self.captions.typedef_keyword));

        self.tree
            .find_all(&rows)
            .iter()
            .filter(|row| !is_inherited(row))
            .map(|row| {
                let description = markup::next_sibling(row)
                    .map(|next| markup::text(&next))
                    .unwrap_or_default();
                TypedefEntry {
                    declaration: markup::text(row).replace('\n', " "),
                    description: self.captions.or_placeholder(description),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::fixtures::WIDGET_PAGE;

    #[test]
    fn test_widget_typedefs() {
        let tree = MarkupTree::parse(WIDGET_PAGE);
        let captions = Captions::default();
        let typedefs = TypedefExtractor::new(&tree, &captions).extract();

        assert_eq!(
            typedefs,
            vec![
                TypedefEntry {
                    declaration: "typedef std::vector< int > IdList".to_string(),
                    description: "List of ids.".to_string(),
                },
                TypedefEntry {
                    declaration: "typedef int Handle".to_string(),
                    description: "无".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_typedefs_from_several_tables() {
        let html = r#"<table><tr><td><h2>Public 类型</h2></td></tr>
<tr class="memitem:p1"><td class="memItemLeft">typedef long&#160;</td><td class="memItemRight">Size</td></tr>
<tr class="memdesc:p1"><td class="mdescRight">Byte count.</td></tr></table>
<table><tr><td><h2>Private 类型</h2></td></tr>
<tr class="memitem:q1"><td class="memItemLeft">typedef char&#160;</td><td class="memItemRight">Byte</td></tr>
<tr class="memitem:q2 inherit pri_types_classBase"><td class="memItemLeft">typedef void&#160;</td><td class="memItemRight">Hidden</td></tr>
</table>"#;
        let tree = MarkupTree::parse(html);
        let captions = Captions::default();
        let typedefs = TypedefExtractor::new(&tree, &captions).extract();

        assert_eq!(typedefs.len(), 2);
        assert_eq!(typedefs[0].declaration, "typedef long Size");
        assert_eq!(typedefs[0].description, "Byte count.");
        assert_eq!(typedefs[1].declaration, "typedef char Byte");
        // The following row is an inherited alias, whose text becomes the description.
        assert_eq!(typedefs[1].description, "typedef void Hidden");
    }

    #[test]
    fn test_last_row_uses_placeholder() {
        let html = r#"<table><tr class="memitem:p1"><td>typedef int Id</td></tr></table>"#;
        let tree = MarkupTree::parse(html);
        let captions = Captions::english();
        let typedefs = TypedefExtractor::new(&tree, &captions).extract();

        assert_eq!(typedefs.len(), 1);
        assert_eq!(typedefs[0].description, "None");
    }
}
