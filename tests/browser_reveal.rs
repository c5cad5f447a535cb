//! Browser reveal tests: verify the staggered fade and head tags in Chrome.
//!
//! Animations are paused and seeked to fixed times, so results do not depend
//! on how fast the browser loads the page.
//!
//! Run with: `cargo test --test browser_reveal -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn generated_dir() -> &'static Path {
    static BUILT: OnceLock<TempDir> = OnceLock::new();
    BUILT
        .get_or_init(|| {
            let work = TempDir::new().expect("failed to create temp dir");
            let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");

            let status = Command::new(env!("CARGO_BIN_EXE_insight-pages"))
                .arg("build")
                .arg("--source")
                .arg(&fixtures)
                .arg("--output")
                .arg(work.path().join("dist"))
                .arg("--temp-dir")
                .arg(work.path().join("temp"))
                .status()
                .expect("failed to run insight-pages");
            assert!(status.success(), "fixture generation failed");
            work
        })
        .path()
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_article(slug: &str) -> Arc<Tab> {
    let file = generated_dir().join("dist").join(slug).join("index.html");
    let tab = browser().new_tab().unwrap();
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval_string(tab: &Tab, js: &str) -> String {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
        .as_str()
        .expect("value is not a string")
        .to_string()
}

/// Seek every panel's reveal animation to `ms` and report which are visible.
fn panels_visible_at(tab: &Tab, ms: u32) -> Vec<bool> {
    let js = format!(
        r#"JSON.stringify(Array.from(document.querySelectorAll('section.panel')).map(p => {{
            const anim = p.getAnimations().find(a => a.animationName === 'reveal');
            anim.pause();
            anim.currentTime = {ms};
            return parseFloat(getComputedStyle(p).opacity) > 0;
        }}))"#
    );
    serde_json::from_str(&eval_string(tab, &js)).expect("not a JSON bool array")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn sections_reveal_in_delay_order() {
    let tab = load_article("ontology-agent");
    assert_eq!(panels_visible_at(&tab, 2100), vec![true, true, false]);
    assert_eq!(panels_visible_at(&tab, 3600), vec![true, true, true]);
}

#[test]
#[ignore]
fn nothing_is_visible_before_first_delay() {
    let tab = load_article("ontology-agent");
    assert_eq!(panels_visible_at(&tab, 100), vec![false, false, false]);
}

#[test]
#[ignore]
fn og_tags_are_in_head() {
    let tab = load_article("ontology-agent");
    let count = eval_string(
        &tab,
        r#"String(document.head.querySelectorAll('meta[property^="og:"]').length)"#,
    );
    assert_eq!(count, "4");
    let title = eval_string(&tab, "document.title");
    assert_eq!(title, "Research AI's Ontology Agent");
}

#[test]
#[ignore]
fn theme_does_not_leak_outside_scope() {
    let tab = load_article("emm");
    let inside = eval_string(
        &tab,
        r#"getComputedStyle(document.querySelector('.theme-scope')).getPropertyValue('--accent').trim()"#,
    );
    let outside = eval_string(
        &tab,
        r#"getComputedStyle(document.body).getPropertyValue('--accent').trim()"#,
    );
    assert_eq!(inside, "#00FF00");
    assert_eq!(outside, "");
}
