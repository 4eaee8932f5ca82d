use crate::config::Captions;
use crate::extractor::cell_text;
use crate::markup::{self, MarkupTree, Predicate};
use crate::record::EnumEntry;

/// Reads enumeration value tables.
pub struct EnumExtractor<'a> {
    tree: &'a MarkupTree,
    captions: &'a Captions,
}

impl<'a> EnumExtractor<'a> {
    /// Creates a new instance of `EnumExtractor` over one loaded page.
    ///
    /// # Arguments
    /// * `tree` - The parsed page to read from.
    /// * `captions` - Localised markers of the generator that wrote the page.
    pub fn new(tree: &'a MarkupTree, captions: &'a Captions) -> Self {
        EnumExtractor { tree, captions }
    }

    /// Every value of every enumeration on the page, in document order.
    ///
    /// Each value table starts with a header cell holding the enum-values
    /// caption; all other rows of that table are values.
    pub fn extract(&self) -> Vec<EnumEntry> {
        let header = Predicate::Tag("th").and(Predicate::ContainsText(&self.captions.enum_values));
        let mut values = Vec::new();

        for th in self.tree.find_all(&header) {
            let Some(header_row) = markup::parent(&th) else {
                continue;
            };
            for row in markup::siblings(&header_row) {
                values.push(EnumEntry {
                    value_name: cell_text(&row, "fieldname"),
                    description: self
                        .captions
                        .or_placeholder(cell_text(&row, "fielddoc")),
                });
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::fixtures::WIDGET_PAGE;

    #[test]
    fn test_widget_enum_values() {
        let tree = MarkupTree::parse(WIDGET_PAGE);
        let captions = Captions::default();
        let values = EnumExtractor::new(&tree, &captions).extract();

        assert_eq!(
            values,
            vec![
                EnumEntry {
                    value_name: "Red".to_string(),
                    description: "Warm.".to_string(),
                },
                EnumEntry {
                    value_name: "Green".to_string(),
                    description: "无".to_string(),
                },
                EnumEntry {
                    value_name: "Blue".to_string(),
                    description: "Cold.".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_two_enumerations() {
        let html = r#"
<table class="fieldtable"><tr><th colspan="2">Enumerator</th></tr>
<tr><td class="fieldname">Low&#160;</td><td class="fielddoc"><p>Slow.</p></td></tr>
<tr><td class="fieldname">High&#160;</td><td class="fielddoc"><p>Fast.</p></td></tr>
</table>
<table class="fieldtable"><tr><th colspan="2">Enumerator</th></tr>
<tr><td class="fieldname">On&#160;</td><td class="fielddoc"></td></tr>
</table>"#;
        let tree = MarkupTree::parse(html);
        let captions = Captions::english();
        let values = EnumExtractor::new(&tree, &captions).extract();

        let names: Vec<&str> = values.iter().map(|v| v.value_name.as_str()).collect();
        assert_eq!(names, vec!["Low", "High", "On"]);
        assert_eq!(values[2].description, "None");
    }

    #[test]
    fn test_no_enumerations() {
        let tree = MarkupTree::parse("<table><tr><th>Name</th></tr><tr><td>x</td></tr></table>");
        let captions = Captions::default();
        assert!(EnumExtractor::new(&tree, &captions).extract().is_empty());
    }
}
