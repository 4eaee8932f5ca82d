use std::path::{Path, PathBuf};

use crate::config::Captions;
use crate::error::ExtractError;
use crate::markup::{self, MarkupTree, Predicate};

/// Link targets starting with this prefix document namespaces, not types.
const NAMESPACE_PREFIX: &str = "namespace";

/// Lists the type pages named by the generator's index page.
pub struct IndexPageScanner<'a> {
    captions: &'a Captions,
}

impl<'a> IndexPageScanner<'a> {
    /// Creates a new instance of `IndexPageScanner`.
    ///
    /// # Arguments
    /// * `captions` - Localised markers of the generator, including the index filename.
    pub fn new(captions: &'a Captions) -> Self {
        IndexPageScanner { captions }
    }

    /// Returns the page paths listed in `html_dir`'s index, in listing order.
    ///
    /// # Errors
    ///
    /// `ExtractError::MissingDirectory` if `html_dir` does not exist and
    /// `ExtractError::MissingIndex` if it has no index page.
    pub fn scan(&self, html_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        if !html_dir.is_dir() {
            return Err(ExtractError::MissingDirectory {
                path: html_dir.to_path_buf(),
            });
        }
        let index_path = html_dir.join(&self.captions.index_file);
        if !index_path.is_file() {
            return Err(ExtractError::MissingIndex {
                dir: html_dir.to_path_buf(),
                index_file: self.captions.index_file.clone(),
            });
        }
        tracing::info!(index = %index_path.display(), "found index page");

        let tree = MarkupTree::load(&index_path)?;
        Ok(Self::entries(&tree)
            .into_iter()
            .map(|target| html_dir.join(target))
            .collect())
    }

    /// Link targets of the type entries of an index page.
    pub fn entries(tree: &MarkupTree) -> Vec<String> {
        let directory = Predicate::HasClass("directory");
        tree.find_all(&Predicate::Tag("a").and(Predicate::HasClass("el")))
            .iter()
            .filter(|anchor| markup::ancestor(anchor, &directory).is_some())
            .filter_map(|anchor| markup::attribute(anchor, "href"))
            .filter(|href| !href.starts_with(NAMESPACE_PREFIX))
            .map(|href| match href.split_once('#') {
                Some((page, _fragment)) => page.to_string(),
                None => href,
            })
            .filter(|page| !page.is_empty())
            .collect()
    }
}
