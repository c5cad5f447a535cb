//! # Insight Pages
//!
//! A minimal static site generator for long-form insight articles. Each
//! article is a TOML content file; every article renders through one shared
//! page template into a themed, self-contained HTML page.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (TOML files → resolved articles)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! The manifest is human-readable JSON, so the resolved content (computed
//! reveal delays, merged themes, inlined code files) can be inspected between
//! stages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads the content root, validates articles, produces the manifest |
//! | [`generate`] | Stage 2: renders every page and the index, copies assets |
//! | [`page`] | The article template: head metadata, theme scope, hero, sections, CTA |
//! | [`highlight`] | Build-time syntax colouring of code samples |
//! | [`reveal`] | Staggered reveal schedule and its one-way visibility model |
//! | [`config`] | `config.toml` loading, merging, validation, theme custom properties |
//! | [`types`] | Article content types shared between stages |
//! | [`naming`] | `NNN-slug` file name parser |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Content Is Data
//!
//! Article text, code samples, and per-page styling live in content files,
//! never in code. One template renders them all, so the page structure cannot
//! drift between articles.
//!
//! ## Declarative Animation
//!
//! The staggered reveal and the pulsing glow are CSS animations configured per
//! element. There is no runtime scheduler and no JavaScript; a page that is
//! closed simply discards its pending animations.
//!
//! ## Code Samples Are Text
//!
//! Code blocks illustrate systems discussed in the prose. They are coloured at
//! build time and otherwise displayed verbatim, never executed.

pub mod config;
pub mod generate;
pub mod highlight;
pub mod naming;
pub mod output;
pub mod page;
pub mod reveal;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
