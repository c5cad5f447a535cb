//! Article content types shared by the scan and generate stages.
//!
//! These are serialized into the JSON manifest between stages and carry
//! fully-resolved values: delays are computed, code files are inlined, and
//! themes are merged. Nothing here is mutated after scan.

use crate::config::{CallToAction, ThemeConfig};
use serde::{Deserialize, Serialize};

/// Document-head metadata for one article.
///
/// Every field may be empty; an empty field renders an empty tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArticleMetadata {
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_url: String,
    pub og_image: String,
}

impl ArticleMetadata {
    /// Names of the fields left empty, in head order.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("og_title", &self.og_title),
            ("og_description", &self.og_description),
            ("og_url", &self.og_url),
            ("og_image", &self.og_image),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Top banner of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    /// Pill label, typically a "Last Updated" date.
    pub badge: String,
    pub heading: String,
    pub subheading: String,
    /// URL of the banner background; an unreachable URL just shows the overlay.
    pub background_image: String,
}

/// One entry of a numbered reference list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A block of content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A smaller heading inside a panel.
    Subheading { text: String },
    /// Prose; inline Markdown (links, emphasis) is honoured.
    Paragraph { text: String },
    /// Bullet or numbered list of inline-Markdown items.
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    /// Illustrative code, displayed verbatim and never evaluated.
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    /// Numbered citations.
    References { entries: Vec<Reference> },
}

/// A block scheduled to fade in after its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    #[serde(flatten)]
    pub block: Block,
    pub reveal_delay_ms: u32,
}

/// One titled panel of an article body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: String,
    pub blocks: Vec<SectionBlock>,
    pub reveal_delay_ms: u32,
}

/// A fully resolved article ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Output directory name (`{slug}/index.html`).
    pub slug: String,
    /// Number prefix, or `u32::MAX` for unnumbered articles.
    pub sort_key: u32,
    /// Numbered articles appear on the index page.
    pub in_index: bool,
    /// Content file name relative to the content root.
    pub source: String,
    pub metadata: ArticleMetadata,
    pub hero: HeroConfig,
    pub theme: ThemeConfig,
    pub sections: Vec<ContentSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CallToAction>,
}

impl Article {
    /// Title shown on the index page: head title, then hero heading, then slug.
    pub fn display_title(&self) -> &str {
        [&self.metadata.title, &self.hero.heading]
            .into_iter()
            .find(|t| !t.trim().is_empty())
            .map(String::as_str)
            .unwrap_or(self.slug.as_str())
    }
}
