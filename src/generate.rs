//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and writes the final
//! static site.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Article index (numbered articles only)
//! ├── ontology-agent/
//! │   └── index.html             # One directory per article slug
//! ├── emm/
//! │   └── index.html
//! └── images/                    # Contents of content/assets/, copied as-is
//!     └── ontology-bg.svg
//! ```
//!
//! Pages are rendered in parallel on the rayon pool, then written in manifest
//! order. Stylesheet and animations are inlined, so every page is a single
//! self-contained file apart from its images.

use crate::page;
use crate::scan::Manifest;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One written page, for CLI reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
    pub in_index: bool,
}

/// Everything the generate stage wrote.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

/// Read the scan manifest from disk and generate the site.
pub fn generate(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, source_dir, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn generate_site(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let assets_dir = source_dir.join(&manifest.config.assets_dir);
    let assets_copied = if assets_dir.is_dir() {
        copy_dir_recursive(&assets_dir, output_dir)?
    } else {
        0
    };
    tracing::debug!(count = assets_copied, "copied assets");

    let rendered: Vec<(String, String)> = manifest
        .articles
        .par_iter()
        .map(|article| {
            let html = page::article_page(article, &manifest.config).into_string();
            (article.slug.clone(), html)
        })
        .collect();

    let mut pages = Vec::with_capacity(rendered.len());
    for (article, (slug, html)) in manifest.articles.iter().zip(rendered) {
        let article_dir = output_dir.join(&slug);
        fs::create_dir_all(&article_dir)?;
        fs::write(article_dir.join("index.html"), html)?;
        tracing::debug!(slug = %slug, "wrote article page");
        pages.push(GeneratedPage {
            title: article.display_title().to_string(),
            path: format!("{slug}/index.html"),
            in_index: article.in_index,
        });
    }

    let index_html = page::index_page(&manifest.articles, &manifest.config);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;

    Ok(GenerateReport {
        pages,
        assets_copied,
    })
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}
