use std::path::Path;

use crate::config::Captions;
use crate::error::ExtractError;
use crate::extractor::{
    EnumExtractor, MemberFunctionExtractor, MemberVariableExtractor, TypeHeaderExtractor,
    TypedefExtractor,
};
use crate::markup::MarkupTree;
use crate::record::{TypeRecord, VisibilityMap};

/// Runs every extractor over one page and combines the results.
pub struct TypeRecordAssembler<'a> {
    captions: &'a Captions,
}

impl<'a> TypeRecordAssembler<'a> {
    /// Creates a new instance of `TypeRecordAssembler`.
    ///
    /// # Arguments
    /// * `captions` - Localised markers of the generator, including the index filename.
    pub fn new(captions: &'a Captions) -> Self {
        TypeRecordAssembler { captions }
    }

    /// Builds the record of a loaded page. Never fails: a page without a title
    /// yields a record with an empty name.
    ///
    /// # Arguments
    /// * `tree` - The parsed class or struct page.
    pub fn assemble(&self, tree: &MarkupTree) -> TypeRecord {
        let header = TypeHeaderExtractor::new(tree, self.captions);
        let variables = MemberVariableExtractor::new(tree, self.captions);
        let functions = MemberFunctionExtractor::new(tree, self.captions);

        TypeRecord::new(
            header.name(),
            header.description(),
            VisibilityMap::from_fn(|visibility| variables.extract(visibility)),
            VisibilityMap::from_fn(|visibility| functions.extract(visibility)),
            TypedefExtractor::new(tree, self.captions).extract(),
            EnumExtractor::new(tree, self.captions).extract(),
        )
    }
}

/// Loads the page at `path` and assembles its record.
///
/// # Errors
///
/// Propagates the load failure of [`MarkupTree::load`].
pub fn extract_page(path: &Path, captions: &Captions) -> Result<TypeRecord, ExtractError> {
    let tree = MarkupTree::load(path)?;
    Ok(TypeRecordAssembler::new(captions).assemble(&tree))
}
