use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::Captions;
use crate::error::ExtractError;
use crate::extractor::{extract_page, IndexPageScanner};
use crate::generator::GeneratorOptions;
use crate::record::TypeRecord;

/// Everything one conversion run needs.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// Directory whose matching files are all type pages.
    pub file_dir: Option<PathBuf>,
    /// Generator html directory holding the index page.
    pub html_dir: Option<PathBuf>,
    /// Pattern, relative to `file_dir`, selecting the pages.
    pub glob_pattern: String,
    pub captions: Captions,
    pub generator: GeneratorOptions,
    /// Worker threads; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
}

/// Orders the pages to extract: files under `file_dir` first, sorted by
/// path, then the entries of `html_dir`'s index page in listing order.
///
/// # Errors
///
/// `ExtractError::MissingDirectory` when either directory is missing,
/// `ExtractError::InvalidGlob` for a malformed pattern and the errors of
/// [`IndexPageScanner::scan`].
pub fn collect_sources(
    file_dir: Option<&Path>,
    html_dir: Option<&Path>,
    glob_pattern: &str,
    captions: &Captions,
) -> Result<Vec<PathBuf>, ExtractError> {
    let mut sources = Vec::new();

    if let Some(file_dir) = file_dir {
        if !file_dir.is_dir() {
            return Err(ExtractError::MissingDirectory {
                path: file_dir.to_path_buf(),
            });
        }
        let pattern = file_dir.join(glob_pattern).to_string_lossy().into_owned();
        let entries = glob::glob(&pattern).map_err(|source| ExtractError::InvalidGlob {
            pattern: glob_pattern.to_string(),
            source,
        })?;

        let mut pages: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(err) => {
                    tracing::warn!("cannot read {}: {}", err.path().display(), err);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        pages.sort();
        tracing::info!(count = pages.len(), dir = %file_dir.display(), "enumerated pages");
        sources.extend(pages);
    }

    if let Some(html_dir) = html_dir {
        sources.extend(IndexPageScanner::new(captions).scan(html_dir)?);
    }

    Ok(sources)
}

/// Extracts every page in parallel. Records come back in the order of
/// `paths`; pages that fail to load are logged and left out.
pub fn extract_all(paths: &[PathBuf], captions: &Captions) -> Result<Vec<TypeRecord>> {
    let total = paths.len();
    let results: Vec<Result<TypeRecord, ExtractError>> = paths
        .par_iter()
        .enumerate()
        .map(|(index, path)| {
            tracing::info!("[{}/{}] {}", index + 1, total, path.display());
            extract_page(path, captions)
        })
        .collect();

    let mut records = Vec::with_capacity(total);
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => tracing::warn!("skipping page: {}", err),
        }
    }
    Ok(records)
}

/// Collects, extracts and renders all pages named by `options` into
/// `output_writer`.
pub fn run_extraction(options: &ExtractionOptions, output_writer: &mut dyn Write) -> Result<()> {
    let sources = collect_sources(
        options.file_dir.as_deref(),
        options.html_dir.as_deref(),
        &options.glob_pattern,
        &options.captions,
    )?;
    if sources.is_empty() {
        tracing::warn!("no pages to extract");
    }

    let records = match options.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to start worker threads")?
            .install(|| extract_all(&sources, &options.captions))?,
        None => extract_all(&sources, &options.captions)?,
    };
    tracing::info!(count = records.len(), "extracted types");

    let generator = options.generator.build();
    generator.output(&records, output_writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::fixtures::{INDEX_PAGE, WIDGET_PAGE};
    use crate::generator::xml::XmlGeneratorOptions;
    use std::fs;
    use tempfile::tempdir;

    fn page(name: &str) -> String {
        WIDGET_PAGE.replace("Widget 类 参考", &format!("{} 类 参考", name))
    }

    fn xml_options() -> ExtractionOptions {
        ExtractionOptions {
            file_dir: None,
            html_dir: None,
            glob_pattern: "**/*.html".to_string(),
            captions: Captions::default(),
            generator: GeneratorOptions::Xml(XmlGeneratorOptions::default()),
            jobs: Some(2),
        }
    }

    #[test]
    fn test_collect_sources_from_file_dir() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        fs::create_dir(tmp_dir.path().join("nested"))?;
        fs::write(tmp_dir.path().join("classB.html"), page("B"))?;
        fs::write(tmp_dir.path().join("classA.html"), page("A"))?;
        fs::write(tmp_dir.path().join("nested/classC.html"), page("C"))?;
        fs::write(tmp_dir.path().join("notes.txt"), "not a page")?;

        let captions = Captions::default();
        let sources = collect_sources(Some(tmp_dir.path()), None, "**/*.html", &captions)?;
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.strip_prefix(tmp_dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("classA.html"),
                PathBuf::from("classB.html"),
                PathBuf::from("nested/classC.html"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_collect_sources_file_dir_before_index() -> anyhow::Result<()> {
        let pages = tempdir()?;
        fs::write(pages.path().join("classZ.html"), page("Z"))?;
        let html = tempdir()?;
        fs::write(html.path().join("annotated.html"), INDEX_PAGE)?;

        let captions = Captions::default();
        let sources =
            collect_sources(Some(pages.path()), Some(html.path()), "*.html", &captions)?;
        assert_eq!(sources.len(), 5);
        assert_eq!(sources[0], pages.path().join("classZ.html"));
        assert_eq!(sources[1], html.path().join("classAlpha.html"));
        assert_eq!(sources[4], html.path().join("classDelta.html"));
        Ok(())
    }

    #[test]
    fn test_collect_sources_errors() {
        let tmp_dir = tempdir().unwrap();
        let captions = Captions::default();

        let missing = tmp_dir.path().join("missing");
        let result = collect_sources(Some(&missing), None, "*.html", &captions);
        assert!(matches!(result, Err(ExtractError::MissingDirectory { .. })));

        let result = collect_sources(None, Some(tmp_dir.path()), "*.html", &captions);
        assert!(matches!(result, Err(ExtractError::MissingIndex { .. })));

        let result = collect_sources(Some(tmp_dir.path()), None, "[", &captions);
        assert!(matches!(result, Err(ExtractError::InvalidGlob { .. })));
    }

    #[test]
    fn test_extract_all_keeps_order_and_skips_missing() -> anyhow::Result<()> {
        let tmp_dir = tempdir()?;
        let mut paths = Vec::new();
        for name in ["Delta", "Alpha", "Gamma", "Beta"] {
            let path = tmp_dir.path().join(format!("class{}.html", name));
            fs::write(&path, page(name))?;
            paths.push(path);
        }
        paths.insert(2, tmp_dir.path().join("classGone.html"));

        let records = extract_all(&paths, &Captions::default())?;
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Delta", "Alpha", "Gamma", "Beta"]);
        Ok(())
    }

    #[test]
    fn test_run_extraction_from_html_dir() -> anyhow::Result<()> {
        let html = tempdir()?;
        fs::write(html.path().join("annotated.html"), INDEX_PAGE)?;
        for name in ["Alpha", "Beta", "Gamma"] {
            let file = if name == "Beta" {
                format!("struct{}.html", name)
            } else {
                format!("class{}.html", name)
            };
            fs::write(html.path().join(file), page(name))?;
        }
        // classDelta.html is listed but absent and gets skipped.

        let options = ExtractionOptions {
            html_dir: Some(html.path().to_path_buf()),
            ..xml_options()
        };
        let mut output = Vec::new();
        run_extraction(&options, &mut output)?;
        let xml = String::from_utf8(output)?;

        let alpha = xml.find("<name>Alpha</name>").unwrap();
        let beta = xml.find("<name>Beta</name>").unwrap();
        let gamma = xml.find("<name>Gamma</name>").unwrap();
        assert!(alpha < beta && beta < gamma);
        assert!(!xml.contains("Delta"));
        Ok(())
    }

    #[test]
    fn test_run_extraction_missing_index_is_fatal() {
        let html = tempdir().unwrap();
        let options = ExtractionOptions {
            html_dir: Some(html.path().to_path_buf()),
            ..xml_options()
        };
        let mut output = Vec::new();
        let err = run_extraction(&options, &mut output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::MissingIndex { .. })
        ));
        assert!(output.is_empty());
    }
}
