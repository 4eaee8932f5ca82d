//! Extractors turning a loaded Doxygen class page into record fields.
//!
//! Each extractor borrows the page's [`MarkupTree`] and the active
//! [`Captions`]; none of them keeps state between pages.

pub mod assembler;
pub mod enums;
pub mod functions;
pub mod header;
pub mod index;
pub mod typedefs;
pub mod variables;

use std::rc::Rc;

use crate::markup::{self, MarkupTree, Node, Predicate};

pub use assembler::{extract_page, TypeRecordAssembler};
pub use enums::EnumExtractor;
pub use functions::MemberFunctionExtractor;
pub use header::TypeHeaderExtractor;
pub use index::IndexPageScanner;
pub use typedefs::TypedefExtractor;
pub use variables::MemberVariableExtractor;

/// Class prefix of member summary rows (`memitem:<id>`).
const MEMBER_ROW_PREFIX: &str = "memitem";
/// Class prefix of brief description rows (`memdesc:<id>`).
const DESCRIPTION_ROW_PREFIX: &str = "memdesc";

fn member_row_predicate() -> Predicate<'static> {
    Predicate::Tag("tr").and(Predicate::AttrPrefix("class", MEMBER_ROW_PREFIX))
}

/// Member rows of the declaration table(s) whose text contains `caption`.
///
/// When matching tables are nested only the innermost ones are used, so a
/// wrapping layout table never pulls in rows of other sections.
pub(crate) fn section_rows(tree: &MarkupTree, caption: &str) -> Vec<Node> {
    let tables = tree.find_all(&Predicate::Tag("table").and(Predicate::ContainsText(caption)));
    let innermost: Vec<Node> = tables
        .iter()
        .filter(|table| {
            !tables
                .iter()
                .any(|other| !Rc::ptr_eq(other, table) && markup::is_ancestor(table, other))
        })
        .cloned()
        .collect();
    markup::select_unique(&innermost, &member_row_predicate())
}

/// Rows documenting members of a base type.
pub(crate) fn is_inherited(row: &Node) -> bool {
    markup::attribute(row, "class").is_some_and(|class| class.contains("inherit"))
}

/// Identifier linking a member row to its description row and detail block.
///
/// Taken from the `memitem:<id>` class, or from an anchor id inside the row
/// when the class carries none.
pub(crate) fn member_id(row: &Node) -> Option<String> {
    let from_class = markup::attribute(row, "class").and_then(|class| {
        class
            .split_whitespace()
            .find_map(|token| token.strip_prefix(MEMBER_ROW_PREFIX)?.strip_prefix(':'))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    });
    from_class.or_else(|| {
        markup::select(row, &Predicate::Tag("a"))
            .iter()
            .find_map(|anchor| markup::attribute(anchor, "id"))
    })
}

/// Text of the first cell in `row` carrying `class`, or an empty string.
pub(crate) fn cell_text(row: &Node, class: &str) -> String {
    markup::select_first(row, &Predicate::HasClass(class))
        .map(|cell| markup::text(&cell))
        .unwrap_or_default()
}

/// The brief description cell paired with member `id`.
pub(crate) fn description_cell(tree: &MarkupTree, id: &str) -> Option<Node> {
    let row = tree.linked(DESCRIPTION_ROW_PREFIX, id)?;
    markup::select_first(&row, &Predicate::HasClass("mdescRight"))
}
