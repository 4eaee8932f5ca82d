use crate::config::Captions;
use crate::extractor::{cell_text, description_cell, is_inherited, member_id, section_rows};
use crate::markup::{self, MarkupTree, Node, Predicate};
use crate::record::{MemberFunction, Visibility};

/// Class of the cell that turns a member row into a template header.
const TEMPLATE_PARAMS_CLASS: &str = "memTemplParams";

/// Documentation resolved for one member function.
#[derive(Debug, Default, PartialEq, Eq)]
struct FunctionDocs {
    description: String,
    parameter_docs: Vec<String>,
    return_doc: String,
}

/// Reads the member function table of one visibility.
///
/// Two multi-row layouts are reassembled here:
/// - a template function is rendered as a header row holding the
///   `template<...>` declaration followed by the actual member row;
/// - a brief description ending in the "more" link points to a detail block
///   further down the page holding the full prose, the parameter table and
///   the return documentation.
pub struct MemberFunctionExtractor<'a> {
    tree: &'a MarkupTree,
    captions: &'a Captions,
}

impl<'a> MemberFunctionExtractor<'a> {
    /// Creates a new instance of `MemberFunctionExtractor` over one loaded page.
    ///
    /// # Arguments
    /// * `tree` - The parsed page to read from.
    /// * `captions` - Localised markers of the generator that wrote the page.
    pub fn new(tree: &'a MarkupTree, captions: &'a Captions) -> Self {
        MemberFunctionExtractor { tree, captions }
    }

    /// Member functions declared with `visibility`, in table order.
    ///
    /// # Arguments
    /// * `visibility` - Selects the `<Visibility> 成员函数` table.
    ///
    /// # Returns
    /// * One `MemberFunction` per declared function. Template header rows are
    ///   folded into the function that follows them and never returned alone.
    pub fn extract(&self, visibility: Visibility) -> Vec<MemberFunction> {
        let caption = self.captions.function_caption(visibility);
        let mut functions = Vec::new();
        // Text of the template header row waiting for its member row.
        let mut pending_template: Option<String> = None;

        for row in section_rows(self.tree, &caption) {
            if is_inherited(&row) {
                tracing::debug!(%visibility, "skipping inherited function row");
                continue;
            }
            if is_template_header(&row) {
                pending_template = Some(markup::text(&row));
                continue;
            }

            let (declared_type, signature, template_description) = match pending_template.take() {
                Some(template) => {
                    tracing::debug!(%template, "joining template header with member row");
                    (
                        cell_text(&row, "memTemplItemLeft"),
                        cell_text(&row, "memTemplItemRight"),
                        template,
                    )
                }
                None => (
                    cell_text(&row, "memItemLeft"),
                    cell_text(&row, "memItemRight"),
                    String::new(),
                ),
            };

            let docs = member_id(&row)
                .map(|id| self.resolve_docs(&id))
                .unwrap_or_default();

            functions.push(MemberFunction {
                declared_type,
                signature,
                description: docs.description,
                parameter_docs: docs.parameter_docs,
                return_doc: docs.return_doc,
                template_description,
            });
        }

        functions
    }

    /// Documentation of member `id`, following the "more" link when present.
    fn resolve_docs(&self, id: &str) -> FunctionDocs {
        let Some(cell) = description_cell(self.tree, id) else {
            return FunctionDocs::default();
        };

        let more_link = markup::select(&cell, &Predicate::Tag("a"))
            .into_iter()
            .find(|anchor| markup::text(anchor) == self.captions.more_marker);

        match more_link {
            Some(link) => match self.detail_block(id, &link) {
                Some(block) => self.detail_docs(&block),
                None => {
                    tracing::debug!(id, "detail block not found, keeping brief description");
                    FunctionDocs {
                        description: self.brief_without_marker(&cell),
                        ..FunctionDocs::default()
                    }
                }
            },
            None => FunctionDocs {
                description: markup::text(&cell),
                ..FunctionDocs::default()
            },
        }
    }

    /// The detail block reached from the anchor carrying the member id.
    ///
    /// The anchor is looked up by `id` first and by the link's `#fragment`
    /// otherwise; the block is the first following sibling of class `memitem`.
    fn detail_block(&self, id: &str, link: &Node) -> Option<Node> {
        let anchor = self.tree.element_by_id(id).or_else(|| {
            let href = markup::attribute(link, "href")?;
            let (_, fragment) = href.split_once('#')?;
            self.tree.element_by_id(fragment)
        })?;
        markup::following_siblings(&anchor)
            .into_iter()
            .find(|sibling| markup::has_class(sibling, "memitem"))
    }

    fn detail_docs(&self, block: &Node) -> FunctionDocs {
        let Some(memdoc) = markup::select_first(block, &Predicate::HasClass("memdoc")) else {
            return FunctionDocs::default();
        };

        let description = markup::select(&memdoc, &Predicate::Tag("p"))
            .iter()
            .map(markup::text)
            .filter(|paragraph| !paragraph.is_empty())
            .collect::<Vec<_>>()
            .join(self.captions.paragraph_separator.as_str());

        FunctionDocs {
            description,
            parameter_docs: parameter_docs(&memdoc),
            return_doc: return_doc(&memdoc),
        }
    }

    fn brief_without_marker(&self, cell: &Node) -> String {
        markup::text(cell)
            .replace(&self.captions.more_marker, "")
            .trim()
            .to_string()
    }
}

/// A row whose first cell holds the `template<...>` declaration.
fn is_template_header(row: &Node) -> bool {
    markup::first_child(row).is_some_and(|cell| {
        markup::attribute(&cell, "class").as_deref() == Some(TEMPLATE_PARAMS_CLASS)
            && !markup::text(&cell).is_empty()
    })
}

/// One line per parameter row: direction, name and explanation.
fn parameter_docs(memdoc: &Node) -> Vec<String> {
    let params = Predicate::HasClass("params");
    let outer = markup::select(memdoc, &params);
    let inner = markup::select_unique(&outer, &params);
    markup::select_unique(&inner, &Predicate::Tag("tr"))
        .iter()
        .map(|row| {
            let explanation = markup::last_child(row)
                .map(|cell| markup::text(&cell))
                .unwrap_or_default();
            [
                cell_text(row, "paramdir"),
                cell_text(row, "paramname"),
                explanation,
            ]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
        })
        .collect()
}

/// Prose return description followed by one line per named return value.
fn return_doc(memdoc: &Node) -> String {
    let sections =
        markup::select(memdoc, &Predicate::HasClass("section").and(Predicate::HasClass("return")));
    let prose = markup::select_unique(&sections, &Predicate::Tag("dd"))
        .iter()
        .map(markup::text)
        .collect::<Vec<_>>()
        .join(" ");

    let retvals = markup::select(memdoc, &Predicate::HasClass("retval"));
    let mut lines = vec![prose];
    for row in markup::select_unique(&retvals, &Predicate::Tag("tr")) {
        let cells = markup::select(&row, &Predicate::Tag("td"))
            .iter()
            .map(markup::text)
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(cells);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::fixtures::WIDGET_PAGE;

    fn public_functions() -> Vec<MemberFunction> {
        let tree = MarkupTree::parse(WIDGET_PAGE);
        let captions = Captions::default();
        MemberFunctionExtractor::new(&tree, &captions).extract(Visibility::Public)
    }

    #[test]
    fn test_widget_public_functions() {
        let functions = public_functions();
        let signatures: Vec<&str> = functions.iter().map(|f| f.signature.as_str()).collect();
        assert_eq!(
            signatures,
            vec![
                "Widget ()",
                "resize (int width, int height)",
                "value (const std::string &key) const",
                "clear ()"
            ]
        );
    }

    #[test]
    fn test_constructor_has_empty_type() {
        let functions = public_functions();
        assert_eq!(functions[0].declared_type, "");
        assert_eq!(functions[0].description, "Creates an empty widget.");
        assert!(functions[0].parameter_docs.is_empty());
        assert_eq!(functions[0].return_doc, "");
        assert_eq!(functions[0].template_description, "");
    }

    #[test]
    fn test_more_link_resolves_detail_block() {
        let resize = &public_functions()[1];
        assert_eq!(resize.declared_type, "int");
        assert_eq!(
            resize.description,
            "Resizes the widget.。Children are laid out again."
        );
        assert_eq!(
            resize.parameter_docs,
            vec!["[in] width New width.", "[in] height New height."]
        );
        assert_eq!(resize.return_doc, "Status code.\n0 Success.");
    }

    #[test]
    fn test_template_function() {
        let value = &public_functions()[2];
        assert_eq!(value.declared_type, "T");
        assert_eq!(value.template_description, "template<typename T >");
        assert_eq!(value.description, "Reads a typed value.");
    }

    #[test]
    fn test_function_without_description_row() {
        let clear = &public_functions()[3];
        assert_eq!(clear.declared_type, "void");
        assert_eq!(clear.description, "");
        assert!(clear.parameter_docs.is_empty());
    }

    #[test]
    fn test_protected_and_private_functions() {
        let tree = MarkupTree::parse(WIDGET_PAGE);
        let captions = Captions::default();
        let extractor = MemberFunctionExtractor::new(&tree, &captions);

        let protected = extractor.extract(Visibility::Protected);
        assert_eq!(protected.len(), 1);
        assert_eq!(protected[0].signature, "update ()");
        assert_eq!(protected[0].description, "Refreshes state.");
        assert!(extractor.extract(Visibility::Private).is_empty());
    }

    #[test]
    fn test_template_header_never_becomes_a_record() {
        let html = r#"<table><tr><td><h2>Public 成员函数</h2></td></tr>
<tr class="memitem:t1"><td class="memTemplParams" colspan="2">template&lt;class U &gt; </td></tr>
<tr class="memitem:t1"><td class="memTemplItemLeft">U&#160;</td><td class="memTemplItemRight">cast ()</td></tr>
<tr class="memitem:f1"><td class="memItemLeft">int&#160;</td><td class="memItemRight">size () const</td></tr>
</table>"#;
        let tree = MarkupTree::parse(html);
        let captions = Captions::default();
        let functions = MemberFunctionExtractor::new(&tree, &captions).extract(Visibility::Public);

        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].signature, "cast ()");
        assert_eq!(functions[0].declared_type, "U");
        assert_eq!(functions[0].template_description, "template<class U >");
        assert_eq!(functions[1].signature, "size () const");
        assert_eq!(functions[1].template_description, "");
    }

    #[test]
    fn test_more_link_without_detail_block_keeps_brief() {
        let html = r##"<table><tr><td><h2>Public 成员函数</h2></td></tr>
<tr class="memitem:m1"><td class="memItemLeft">void&#160;</td><td class="memItemRight">run ()</td></tr>
<tr class="memdesc:m1"><td class="mdescRight">Runs once. <a href="#m1">更多...</a></td></tr>
</table>"##;
        let tree = MarkupTree::parse(html);
        let captions = Captions::default();
        let functions = MemberFunctionExtractor::new(&tree, &captions).extract(Visibility::Public);

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].description, "Runs once.");
    }

    #[test]
    fn test_detail_block_found_through_link_fragment() {
        let html = r##"<table><tr><td><h2>Public 成员函数</h2></td></tr>
<tr class="memitem:m1"><td class="memItemLeft">void&#160;</td><td class="memItemRight">run ()</td></tr>
<tr class="memdesc:m1"><td class="mdescRight">Runs. <a href="#detail-run">更多...</a></td></tr>
</table>
<a id="detail-run"></a><h2 class="memtitle">run()</h2>
<div class="memitem"><div class="memdoc"><p>Runs the job. </p>
<dl class="section return"><dt>返回</dt><dd>Nothing. </dd></dl></div></div>"##;
        let tree = MarkupTree::parse(html);
        let captions = Captions::default();
        let functions = MemberFunctionExtractor::new(&tree, &captions).extract(Visibility::Public);

        assert_eq!(functions[0].description, "Runs the job.");
        assert!(functions[0].parameter_docs.is_empty());
        assert_eq!(functions[0].return_doc, "Nothing.");
    }

    #[test]
    fn test_named_return_values_without_prose() {
        let tree = MarkupTree::parse(
            r#"<div class="memdoc"><dl class="retval"><dt>返回值</dt><dd><table class="retval">
<tr><td class="paramname">true</td><td>Found. </td></tr>
<tr><td class="paramname">false</td><td>Missing. </td></tr></table></dd></dl></div>"#,
        );
        let memdoc = tree.find_first(&Predicate::HasClass("memdoc")).unwrap();
        assert_eq!(return_doc(&memdoc), "\ntrue Found.\nfalse Missing.");
    }

    #[test]
    fn test_parameter_without_direction() {
        let tree = MarkupTree::parse(
            r#"<div class="memdoc"><dl class="params"><dt>参数</dt><dd><table class="params">
<tr><td class="paramname">path</td><td>File to open. </td></tr></table></dd></dl></div>"#,
        );
        let memdoc = tree.find_first(&Predicate::HasClass("memdoc")).unwrap();
        assert_eq!(parameter_docs(&memdoc), vec!["path File to open."]);
    }

    #[test]
    fn test_english_paragraphs_keep_single_full_stop() {
        let tree = MarkupTree::parse(include_str!("../../tests/fixtures/html/classPoint.html"));
        let captions = Captions::english();
        let functions = MemberFunctionExtractor::new(&tree, &captions).extract(Visibility::Public);

        assert_eq!(functions.len(), 1);
        assert_eq!(
            functions[0].description,
            "Distance to another point. Uses the Euclidean metric."
        );
        assert_eq!(functions[0].parameter_docs, vec!["other The second point."]);
        assert_eq!(functions[0].return_doc, "Non-negative distance.");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        assert_eq!(public_functions(), public_functions());
    }
}
