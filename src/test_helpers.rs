//! Shared test utilities for the insight-pages test suite.
//!
//! Provides fixture setup, lookup helpers, and bulk extractors that work with
//! scan-phase data structures (`Manifest`, `Article`).
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let article = find_article(&manifest, "ontology-agent");
//! assert_eq!(section_delays(article), vec![500, 2000, 3500]);
//! ```

use std::fmt::Write as _;
use std::path::Path;
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{Article, Block};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a minimal article with one paragraph per section.
///
/// Each section is `(heading, reveal_delay_ms)`.
pub fn write_article(root: &Path, file_name: &str, sections: &[(&str, Option<u32>)]) {
    let mut toml = String::from(
        "[metadata]\ntitle = \"t\"\ndescription = \"d\"\nog_title = \"ot\"\n\
         og_description = \"od\"\nog_url = \"ou\"\nog_image = \"oi\"\n",
    );
    for (heading, delay) in sections {
        writeln!(toml, "\n[[sections]]\nheading = \"{heading}\"").unwrap();
        if let Some(delay) = delay {
            writeln!(toml, "reveal_delay_ms = {delay}").unwrap();
        }
        writeln!(
            toml,
            "[[sections.blocks]]\ntype = \"paragraph\"\ntext = \"About {heading}.\""
        )
        .unwrap();
    }
    std::fs::write(root.join(file_name), toml).unwrap();
}

// =========================================================================
// Manifest lookups, panic with a clear message on miss
// =========================================================================

/// Find an article by slug. Panics if not found.
pub fn find_article<'a>(manifest: &'a Manifest, slug: &str) -> &'a Article {
    manifest
        .articles
        .iter()
        .find(|a| a.slug == slug)
        .unwrap_or_else(|| {
            let slugs = article_slugs(manifest);
            panic!("article '{slug}' not found. Available: {slugs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All article slugs in manifest order.
pub fn article_slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.articles.iter().map(|a| a.slug.as_str()).collect()
}

/// Section reveal delays in reading order.
pub fn section_delays(article: &Article) -> Vec<u32> {
    article.sections.iter().map(|s| s.reveal_delay_ms).collect()
}

/// Block reveal delays of one section, in reading order.
pub fn block_delays(article: &Article, section: usize) -> Vec<u32> {
    article.sections[section]
        .blocks
        .iter()
        .map(|b| b.reveal_delay_ms)
        .collect()
}

/// Text of every code block in the article, in reading order.
pub fn code_blocks(article: &Article) -> Vec<&str> {
    article
        .sections
        .iter()
        .flat_map(|s| &s.blocks)
        .filter_map(|b| match &b.block {
            Block::Code { code, .. } => Some(code.as_str()),
            _ => None,
        })
        .collect()
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Text content of rendered HTML: tags removed, entities decoded.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Reveal delay on the start tag of each `<section>` element, in page order.
pub fn rendered_section_delays(html: &str) -> Vec<u32> {
    html.match_indices("<section")
        .map(|(start, _)| {
            let tag = &html[start..start + html[start..].find('>').unwrap()];
            let delay = tag
                .split("animation-delay: ")
                .nth(1)
                .and_then(|rest| rest.split("ms").next())
                .unwrap_or_else(|| panic!("section without delay: {tag}"));
            delay.parse().unwrap()
        })
        .collect()
}
