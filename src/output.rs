//! CLI output formatting for the pipeline stages.
//!
//! Output is **information-centric, not file-centric**: every article leads
//! with its positional index and title, and file paths follow as indented
//! context lines.
//!
//! ## Scan
//!
//! ```text
//! Articles
//! 001 Research AI's Ontology Agent (3 sections)
//!     Source: 010-ontology-agent.toml
//!     Badge: Last Updated: 14 September 2024
//!     CTA: mailto:john@example.com
//! --- Draft notes (1 section, not indexed)
//!     Source: draft-notes.toml
//!
//! Warnings
//!     draft-notes.toml: empty metadata: description, og_title
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Research AI's Ontology Agent → ontology-agent/index.html
//! --- Draft notes → draft-notes/index.html
//!
//! Generated 2 pages, copied 1 asset
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout.

use crate::generate::GenerateReport;
use crate::scan::Manifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Positional index for indexed entries, a dash marker for the rest.
fn entry_marker(in_index: bool, position: &mut usize) -> String {
    if in_index {
        *position += 1;
        format_index(*position)
    } else {
        "---".to_string()
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing discovered articles and warnings.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Articles".to_string()];
    let mut position = 0;

    for article in &manifest.articles {
        let marker = entry_marker(article.in_index, &mut position);
        let mut detail = plural(article.sections.len(), "section");
        if !article.in_index {
            detail.push_str(", not indexed");
        }
        lines.push(format!("{} {} ({})", marker, article.display_title(), detail));
        lines.push(format!("    Source: {}", article.source));
        if !article.hero.badge.is_empty() {
            lines.push(format!("    Badge: {}", article.hero.badge));
        }
        if let Some(cta) = &article.cta {
            lines.push(format!("    CTA: {}", cta.href));
        }
    }

    if !manifest.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &manifest.warnings {
            lines.push(format!("    {}: {}", warning.source, warning.message));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output showing written HTML files.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec!["Home \u{2192} index.html".to_string()];
    let mut position = 0;

    for page in &report.pages {
        let marker = entry_marker(page.in_index, &mut position);
        lines.push(format!("{} {} \u{2192} {}", marker, page.title, page.path));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, copied {}",
        plural(report.pages.len(), "page"),
        plural(report.assets_copied, "asset")
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
