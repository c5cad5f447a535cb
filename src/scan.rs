//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the content root, parses every article
//! file, resolves computed values, and produces the [`Manifest`] that the
//! generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── assets/                      # Copied to the output root
//! │   └── images/ontology-bg.svg
//! ├── snippets/
//! │   └── ontology_agent.py        # Code referenced by `file = ...`
//! ├── 010-ontology-agent.toml      # Numbered article (listed on the index)
//! ├── 020-emm.toml
//! └── draft-notes.toml             # Unnumbered = built but not indexed
//! ```
//!
//! ## Article File
//!
//! ```toml
//! [metadata]
//! title = "Research AI's Ontology Agent"
//! description = "..."
//! og_title = "..."
//! og_description = "..."
//! og_url = "https://example.com/insights/ontologyagent"
//! og_image = "https://example.com/static/images/insight8.gif"
//!
//! [hero]
//! badge = "Last Updated: 14 September 2024"
//! heading = "Ontology Agent"
//! subheading = "..."
//! background_image = "../images/ontology-bg.svg"
//!
//! [theme]                          # Optional; merged over the site theme
//! accent = "#00ffff"
//!
//! cta = false                      # Or a [cta] table, or omit for the site default
//!
//! [[sections]]
//! heading = "A Deep Dive"
//! reveal_delay_ms = 2000           # Optional; computed from [reveal] when absent
//!
//! [[sections.blocks]]
//! type = "subheading"
//! text = "Intelligent Concept Management"
//!
//! [[sections.blocks]]
//! type = "paragraph"
//! text = "The Ontology Agent is a *crucial* component..."
//! reveal_delay_ms = 3000           # Optional; one step per block after the section
//!
//! [[sections.blocks]]
//! type = "code"
//! language = "python"
//! file = "snippets/ontology_agent.py"
//! ```
//!
//! ## Validation
//!
//! - Every article has at least one section, and every section at least one block
//! - No two numbered articles share a number; no two articles share a slug
//! - Code blocks set exactly one of `code` or `file`, and the file must exist
//!
//! Empty metadata fields are not errors; they are reported as warnings.

use crate::config::{self, CallToAction, SiteConfig};
use crate::naming::parse_entry_name;
use crate::types::{
    Article, ArticleMetadata, Block, ContentSection, HeroConfig, Reference, SectionBlock,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid article {path}: {source}")]
    Article {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Article has no sections: {0}")]
    NoSections(PathBuf),
    #[error("Section '{heading}' in {path} has no blocks")]
    EmptySection { path: PathBuf, heading: String },
    #[error("Article file name has no slug: {0}")]
    EmptySlug(PathBuf),
    #[error("Duplicate article number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
    #[error("Duplicate article slug '{0}'")]
    DuplicateSlug(String),
    #[error("Code block in section '{heading}' of {path} must set exactly one of `code` or `file`")]
    CodeSource { path: PathBuf, heading: String },
    #[error("Code file not found: {0}")]
    MissingCodeFile(PathBuf),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Articles sorted by number prefix, unnumbered last.
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScanWarning>,
    pub config: SiteConfig,
}

/// A content problem that does not stop the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanWarning {
    pub source: String,
    pub message: String,
}

// ============================================================================
// On-disk article format
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArticleFile {
    #[serde(default)]
    metadata: ArticleMetadata,
    #[serde(default)]
    hero: HeroConfig,
    #[serde(default)]
    theme: Option<toml::Value>,
    #[serde(default)]
    cta: Option<CtaSetting>,
    #[serde(default)]
    sections: Vec<SectionFile>,
}

/// `cta = false`, `cta = true`, or a `[cta]` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CtaSetting {
    Enabled(bool),
    Link(CallToAction),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionFile {
    heading: String,
    #[serde(default)]
    reveal_delay_ms: Option<u32>,
    #[serde(default)]
    blocks: Vec<BlockEntry>,
}

/// One `[[sections.blocks]]` table: a block plus its optional delay.
#[derive(Debug, Deserialize)]
struct BlockEntry {
    #[serde(default)]
    reveal_delay_ms: Option<u32>,
    #[serde(flatten)]
    block: BlockFile,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum BlockFile {
    Subheading {
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    Code {
        #[serde(default)]
        language: Option<String>,
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        file: Option<String>,
    },
    References {
        entries: Vec<Reference>,
    },
}

const CONFIG_FILE: &str = "config.toml";

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut articles = Vec::new();
    let mut warnings = Vec::new();
    let mut numbers: BTreeMap<u32, PathBuf> = BTreeMap::new();
    let mut slugs = HashSet::new();

    for path in collect_article_files(root)? {
        let article = load_article(&path, root, &config)?;

        if article.in_index {
            if let Some(previous) = numbers.insert(article.sort_key, path.clone()) {
                tracing::debug!(first = %previous.display(), "duplicate article number");
                return Err(ScanError::DuplicateNumber(article.sort_key, path));
            }
        }
        if !slugs.insert(article.slug.clone()) {
            return Err(ScanError::DuplicateSlug(article.slug));
        }

        let empty = article.metadata.empty_fields();
        if !empty.is_empty() {
            tracing::warn!(source = %article.source, fields = ?empty, "empty metadata fields");
            warnings.push(ScanWarning {
                source: article.source.clone(),
                message: format!("empty metadata: {}", empty.join(", ")),
            });
        }

        tracing::debug!(
            slug = %article.slug,
            sections = article.sections.len(),
            "scanned article"
        );
        articles.push(article);
    }

    articles.sort_by(|a, b| (a.sort_key, &a.slug).cmp(&(b.sort_key, &b.slug)));

    Ok(Manifest {
        articles,
        warnings,
        config,
    })
}

/// All `.toml` files directly in the content root except `config.toml`, sorted.
fn collect_article_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let is_toml = p
                .extension()
                .map(|e| e.eq_ignore_ascii_case("toml"))
                .unwrap_or(false);
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            p.is_file() && is_toml && name != CONFIG_FILE && !name.starts_with('.')
        })
        .collect();
    files.sort();
    Ok(files)
}

fn load_article(path: &Path, root: &Path, config: &SiteConfig) -> Result<Article, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);
    if parsed.slug.is_empty() {
        return Err(ScanError::EmptySlug(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let file: ArticleFile = toml::from_str(&content).map_err(|source| ScanError::Article {
        path: path.to_path_buf(),
        source,
    })?;

    if file.sections.is_empty() {
        return Err(ScanError::NoSections(path.to_path_buf()));
    }

    let sections = file
        .sections
        .into_iter()
        .enumerate()
        .map(|(idx, section)| resolve_section(idx, section, path, root, config))
        .collect::<Result<Vec<_>, _>>()?;

    let theme = config::resolve_theme(&config.theme, file.theme)?;

    let cta = match file.cta {
        None | Some(CtaSetting::Enabled(true)) => config.cta.clone(),
        Some(CtaSetting::Enabled(false)) => None,
        Some(CtaSetting::Link(link)) => {
            link.validate("cta")?;
            Some(link)
        }
    };

    let source = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();

    Ok(Article {
        slug: parsed.slug,
        sort_key: parsed.number.unwrap_or(u32::MAX),
        in_index: parsed.number.is_some(),
        source,
        metadata: file.metadata,
        hero: file.hero,
        theme,
        sections,
        cta,
    })
}

fn resolve_section(
    idx: usize,
    section: SectionFile,
    path: &Path,
    root: &Path,
    config: &SiteConfig,
) -> Result<ContentSection, ScanError> {
    if section.blocks.is_empty() {
        return Err(ScanError::EmptySection {
            path: path.to_path_buf(),
            heading: section.heading,
        });
    }

    let section_delay = section
        .reveal_delay_ms
        .unwrap_or_else(|| config.reveal.section_delay(idx));

    let mut blocks = Vec::with_capacity(section.blocks.len());
    for (block_idx, entry) in section.blocks.into_iter().enumerate() {
        let resolved = match entry.block {
            BlockFile::Subheading { text } => Block::Subheading { text },
            BlockFile::Paragraph { text } => Block::Paragraph { text },
            BlockFile::List { items, ordered } => Block::List { items, ordered },
            BlockFile::References { entries } => Block::References { entries },
            BlockFile::Code {
                language,
                code,
                file,
            } => {
                let code = match (code, file) {
                    (Some(code), None) => code,
                    (None, Some(file)) => read_code_file(&root.join(file))?,
                    _ => {
                        return Err(ScanError::CodeSource {
                            path: path.to_path_buf(),
                            heading: section.heading,
                        });
                    }
                };
                Block::Code { language, code }
            }
        };
        blocks.push(SectionBlock {
            block: resolved,
            reveal_delay_ms: entry
                .reveal_delay_ms
                .unwrap_or_else(|| config.reveal.block_delay(section_delay, block_idx)),
        });
    }

    Ok(ContentSection {
        heading: section.heading,
        blocks,
        reveal_delay_ms: section_delay,
    })
}

fn read_code_file(path: &Path) -> Result<String, ScanError> {
    if !path.is_file() {
        return Err(ScanError::MissingCodeFile(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}
