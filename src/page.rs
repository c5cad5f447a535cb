//! The shared article page template.
//!
//! Every article renders through [`article_page`], which composes the same
//! parts in the same order:
//!
//! ```text
//! <head>   head_metadata       title + description + og:* tags
//! <body>
//!   theme_scope                theme custom properties for this subtree
//!     hero_section             badge, heading, subheading over the background
//!     section_list             titled panels and their blocks, revealed by delay
//!     cta_footer               optional contact link
//! ```
//!
//! All functions are pure: configuration in, [`Markup`] out. Interpolated
//! text is escaped by maud; paragraph and list text goes through inline
//! Markdown with raw HTML neutralized, and code is coloured by [`highlight`].

use crate::config::{self, CallToAction, RevealConfig, SiteConfig, ThemeConfig};
use crate::highlight::highlight;
use crate::reveal::reveal_style;
use crate::types::{Article, ArticleMetadata, Block, ContentSection, HeroConfig, Reference};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};

const CSS: &str = include_str!("../static/style.css");

/// Overlay drawn over the hero image so text stays legible.
const HERO_OVERLAY: &str = "linear-gradient(to right, rgba(0, 0, 0, 0.8), rgba(0, 0, 0, 0.5))";

// ============================================================================
// Document
// ============================================================================

/// Renders the base HTML document structure around page-specific head tags.
fn base_document(lang: &str, head: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                (head)
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Title and social-preview tags for one page.
///
/// Empty fields still produce their tag, with empty content.
pub fn head_metadata(meta: &ArticleMetadata) -> Markup {
    html! {
        title { (meta.title) }
        meta name="description" content=(meta.description);
        meta property="og:title" content=(meta.og_title);
        meta property="og:description" content=(meta.og_description);
        meta property="og:url" content=(meta.og_url);
        meta property="og:image" content=(meta.og_image);
    }
}

/// Wraps `content` in an element carrying the theme as custom properties.
pub fn theme_scope(theme: &ThemeConfig, reveal: &RevealConfig, content: Markup) -> Markup {
    html! {
        div.theme-scope
            data-theme=(theme.mode.as_str())
            style=(config::theme_custom_properties(theme, reveal)) {
            (content)
        }
    }
}

// ============================================================================
// Hero
// ============================================================================

fn hero_background(image: &str) -> String {
    if image.trim().is_empty() {
        return format!("background-image: {HERO_OVERLAY};");
    }
    let escaped = image.replace('\\', "\\\\").replace('"', "\\\"");
    format!("background-image: {HERO_OVERLAY}, url(\"{escaped}\");")
}

/// Badge, heading, and subheading, top to bottom, over the background image.
pub fn hero_section(hero: &HeroConfig, reveal: &RevealConfig) -> Markup {
    let [badge_delay, heading_delay, subheading_delay] = reveal.hero_delays();
    html! {
        header.hero style=(hero_background(&hero.background_image)) {
            div.hero-inner {
                div.reveal style=(reveal_style(badge_delay)) {
                    span.hero-badge.glow { (hero.badge) }
                }
                div.reveal style=(reveal_style(heading_delay)) {
                    h1.hero-heading.glow { (hero.heading) }
                }
                div.reveal style=(reveal_style(subheading_delay)) {
                    p.hero-subheading.glow { (hero.subheading) }
                }
            }
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Render inline Markdown without the wrapping paragraph.
///
/// Only inline markup (emphasis, links, code spans) is honoured. Line-start
/// markers that would open a list, heading, quote, or code block are escaped
/// first, so prose like "2024. The year..." stays prose. Paragraph breaks
/// become `<br />`. Raw HTML in the source is emitted as text.
fn inline_markdown(text: &str) -> String {
    let source = escape_block_markers(text);
    let mut paragraphs = 0;
    let events = Parser::new(&source).filter_map(|event| match event {
        Event::Start(Tag::Paragraph) => {
            paragraphs += 1;
            (paragraphs > 1).then_some(Event::HardBreak)
        }
        Event::Start(tag) => is_inline_tag(&tag).then_some(Event::Start(tag)),
        Event::End(tag) => is_inline_end(&tag).then_some(Event::End(tag)),
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Rule => None,
        other => Some(other),
    });
    let mut out = String::new();
    md_html::push_html(&mut out, events);
    out.trim_end().to_string()
}

fn is_inline_tag(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

/// Strip line indentation and backslash-escape any marker that starts a block.
fn escape_block_markers(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim_start();
            match block_marker_end(line) {
                Some(at) => format!("{}\\{}", &line[..at], &line[at..]),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the punctuation that would make `line` open a block.
fn block_marker_end(line: &str) -> Option<usize> {
    let first = line.chars().next()?;
    let rest = &line[first.len_utf8()..];
    let followed_by_space = rest.is_empty() || rest.starts_with([' ', '\t']);
    let repeated = line
        .chars()
        .all(|c| c == first || c == ' ' || c == '\t');
    match first {
        '#' | '>' => Some(0),
        '-' | '+' | '*' if followed_by_space || repeated => Some(0),
        '_' | '=' if repeated => Some(0),
        '`' | '~' if line.starts_with("```") || line.starts_with("~~~") => Some(0),
        '0'..='9' => {
            let digits = line.bytes().take_while(u8::is_ascii_digit).count();
            let after = &line[digits..];
            let delimited = after.starts_with(['.', ')'])
                && (after.len() == 1 || after[1..].starts_with([' ', '\t']));
            (digits <= 9 && delimited).then_some(digits)
        }
        _ => None,
    }
}

/// Paragraph text split at blank lines, empty parts dropped.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            parts.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    parts.push(&text[start..]);
    parts.retain(|p| !p.trim().is_empty());
    parts
}

fn render_references(entries: &[Reference]) -> Markup {
    html! {
        ol.references {
            @for entry in entries {
                li {
                    (entry.label)
                    @if let Some(url) = &entry.url {
                        " "
                        a href=(url) target="_blank" rel="noopener noreferrer" { (url) }
                    }
                }
            }
        }
    }
}

fn render_block(block: &Block) -> Markup {
    match block {
        Block::Subheading { text } => html! {
            h3.panel-subheading.glow { (text) }
        },
        Block::Paragraph { text } => html! {
            @for part in split_paragraphs(text) {
                p { (PreEscaped(inline_markdown(part))) }
            }
        },
        Block::List { items, ordered } => {
            let items = html! {
                @for item in items {
                    li { (PreEscaped(inline_markdown(item))) }
                }
            };
            if *ordered {
                html! { ol { (items) } }
            } else {
                html! { ul { (items) } }
            }
        }
        Block::Code { language, code } => {
            let class = language.as_deref().map(|l| format!("language-{l}"));
            html! {
                pre.code-sample data-language=[language.as_deref()] {
                    code class=[class] { (highlight(language.as_deref(), code)) }
                }
            }
        }
        Block::References { entries } => render_references(entries),
    }
}

/// Titled panels in input order. Each panel and each block inside it fades
/// in at its own reveal delay.
pub fn section_list(sections: &[ContentSection]) -> Markup {
    html! {
        main.sections {
            @for (idx, content_section) in sections.iter().enumerate() {
                section.panel.reveal
                    data-section=(idx + 1)
                    style=(reveal_style(content_section.reveal_delay_ms)) {
                    h2.panel-heading.glow { (content_section.heading) }
                    @for entry in &content_section.blocks {
                        div.reveal style=(reveal_style(entry.reveal_delay_ms)) {
                            (render_block(&entry.block))
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Call to action
// ============================================================================

/// A single right-aligned outbound link.
pub fn cta_footer(cta: &CallToAction) -> Markup {
    html! {
        footer.cta {
            a.cta-link.glow href=(cta.href) {
                (cta.label)
                span.cta-arrow { "→" }
            }
        }
    }
}

// ============================================================================
// Page renderers
// ============================================================================

/// Renders one complete article page.
pub fn article_page(article: &Article, config: &SiteConfig) -> Markup {
    let content = html! {
        (hero_section(&article.hero, &config.reveal))
        (section_list(&article.sections))
        @if let Some(cta) = &article.cta {
            (cta_footer(cta))
        }
    };
    base_document(
        &config.site.lang,
        head_metadata(&article.metadata),
        theme_scope(&article.theme, &config.reveal, content),
    )
}

/// Link to an article's directory, honouring the site's base URL.
pub fn article_href(base_url: &str, slug: &str) -> String {
    format!("{}/{}/", base_url.trim_end_matches('/'), slug)
}

/// Renders the index page listing every numbered article.
pub fn index_page(articles: &[Article], config: &SiteConfig) -> Markup {
    let head = html! {
        title { (config.site.name) }
        meta name="description" content=(config.site.description);
    };
    let content = html! {
        header.hero {
            div.hero-inner {
                h1.hero-heading.glow { (config.site.name) }
                @if !config.site.description.is_empty() {
                    p.hero-subheading { (config.site.description) }
                }
            }
        }
        main.sections {
            ul.article-index {
                @for article in articles.iter().filter(|a| a.in_index) {
                    li {
                        a.index-title href=(article_href(&config.site.base_url, &article.slug)) {
                            (article.display_title())
                        }
                        @if !article.hero.badge.is_empty() {
                            span.index-badge { (article.hero.badge) }
                        }
                        @if !article.metadata.description.is_empty() {
                            p { (article.metadata.description) }
                        }
                    }
                }
            }
        }
    };
    base_document(
        &config.site.lang,
        head,
        theme_scope(&config.theme, &config.reveal, content),
    )
}

// ============================================================================
// Tests
// ============================================================================
