//! Filename parsing for the `NNN-slug` article convention.
//!
//! Article files follow one pattern: an optional numeric prefix (`NNN-`)
//! followed by a slug. The prefix orders articles on the index page; the slug
//! becomes the article's output directory.
//!
//! - `010-ontology-agent.toml` → number 10, slug `ontology-agent`
//! - `draft-notes.toml` → unnumbered, slug `draft-notes` (built, not indexed)

/// Result of parsing an article file stem like `010-ontology-agent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `10` from `010-ontology-agent`)
    pub number: Option<u32>,
    /// URL slug: the part after `NNN-`, or the full stem when unnumbered.
    pub slug: String,
}

/// Parse an article stem following the `NNN-slug` convention.
///
/// - `"020-multi-model-agents"` → number=Some(20), slug="multi-model-agents"
/// - `"020"` → number=Some(20), slug=""
/// - `"emm"` → number=None, slug="emm"
/// - `"rag-notes"` → number=None, slug="rag-notes"
///
/// Slugs are lowercased so output paths are stable across case-insensitive
/// filesystems.
pub fn parse_entry_name(stem: &str) -> ParsedName {
    let (number, rest) = match stem.split_once('-') {
        Some((prefix, rest)) => match prefix.parse::<u32>() {
            Ok(num) => (Some(num), rest),
            Err(_) => (None, stem),
        },
        None => match stem.parse::<u32>() {
            Ok(num) => (Some(num), ""),
            Err(_) => (None, stem),
        },
    };
    ParsedName {
        number,
        slug: rest.to_lowercase(),
    }
}
