//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by the content root's `config.toml`,
//! and each article's `[theme]` table is merged on top of the site theme.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml                # Site config (overrides stock defaults)
//! ├── 010-ontology-agent.toml    # Article; its [theme] overrides the site theme
//! └── 020-emm.toml
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! assets_dir = "assets"      # Copied verbatim to the output root
//!
//! [site]
//! name = "Insights"
//! base_url = ""              # Prefix for index links, e.g. "/insights"
//! lang = "en"
//! description = ""
//!
//! [theme]
//! mode = "dark"
//! accent = "#00ffff"
//! accent_alt = "#7fffd4"
//! glow = "rgba(0, 255, 255, 0.5)"
//! gradient = ["#000000", "#1a237e"]
//!
//! [reveal]
//! hero_start_ms = 500
//! section_start_ms = 2000
//! step_ms = 500
//! fade_ms = 1000
//!
//! [cta]                      # Omit for no default footer link
//! href = "mailto:hello@example.com"
//! label = "Contact us to learn more"
//!
//! [processing]
//! max_processes = 4          # Max parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory under the content root copied verbatim to the output root.
    pub assets_dir: String,
    /// Site identity used by the index page.
    pub site: SiteInfo,
    /// Default theme for every article.
    pub theme: ThemeConfig,
    /// Staggered reveal timing.
    pub reveal: RevealConfig,
    /// Default call-to-action link; articles may override or suppress it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<CallToAction>,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
            site: SiteInfo::default(),
            theme: ThemeConfig::default(),
            reveal: RevealConfig::default(),
            cta: None,
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.theme.validate()?;
        if self.reveal.fade_ms == 0 {
            return Err(ConfigError::Validation(
                "reveal.fade_ms must be non-zero".into(),
            ));
        }
        if self.reveal.step_ms == 0 {
            return Err(ConfigError::Validation(
                "reveal.step_ms must be non-zero".into(),
            ));
        }
        if let Some(cta) = &self.cta {
            cta.validate("cta")?;
        }
        Ok(())
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site name, used as the index page title.
    pub name: String,
    /// Path prefix for links on the index page (no trailing slash).
    pub base_url: String,
    /// `lang` attribute of every generated document.
    pub lang: String,
    /// Meta description of the index page.
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Insights".to_string(),
            base_url: String::new(),
            lang: "en".to_string(),
            description: String::new(),
        }
    }
}

/// Colour scheme family of a themed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    fn text_color(self) -> &'static str {
        match self {
            ThemeMode::Dark => "#ffffff",
            ThemeMode::Light => "#111111",
        }
    }

    fn panel_background(self) -> &'static str {
        match self {
            ThemeMode::Dark => "rgba(0, 0, 0, 0.6)",
            ThemeMode::Light => "rgba(255, 255, 255, 0.75)",
        }
    }
}

/// Per-page visual theme.
///
/// Only styling; no behaviour depends on these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    /// Headings, links, badge gradient start.
    pub accent: String,
    /// Badge gradient end and link hover colour.
    pub accent_alt: String,
    /// Text-shadow colour of the pulsing glow.
    pub glow: String,
    /// Page background gradient as `[from, to]`.
    pub gradient: [String; 2],
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            accent: "#00ffff".to_string(),
            accent_alt: "#7fffd4".to_string(),
            glow: "rgba(0, 255, 255, 0.5)".to_string(),
            gradient: ["#000000".to_string(), "#1a237e".to_string()],
        }
    }
}

impl ThemeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("theme.accent", &self.accent),
            ("theme.accent_alt", &self.accent_alt),
            ("theme.glow", &self.glow),
            ("theme.gradient[0]", &self.gradient[0]),
            ("theme.gradient[1]", &self.gradient[1]),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Staggered reveal timing, in milliseconds after page load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Delay of the hero badge; heading and subheading follow at `step_ms`.
    pub hero_start_ms: u32,
    /// Delay of the first content section when it sets none itself.
    pub section_start_ms: u32,
    /// Gap between consecutive computed delays.
    pub step_ms: u32,
    /// Duration of each fade.
    pub fade_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            hero_start_ms: 500,
            section_start_ms: 2000,
            step_ms: 500,
            fade_ms: 1000,
        }
    }
}

impl RevealConfig {
    /// Delay for the section at `index` when the article gives none.
    pub fn section_delay(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.section_start_ms
            .saturating_add(self.step_ms.saturating_mul(index))
    }

    /// Delay for the block at `index` of a section revealed at `section_delay_ms`.
    ///
    /// The first block follows its section by one step.
    pub fn block_delay(&self, section_delay_ms: u32, index: usize) -> u32 {
        let steps = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
        section_delay_ms.saturating_add(self.step_ms.saturating_mul(steps))
    }

    /// Delays for the hero badge, heading, and subheading.
    pub fn hero_delays(&self) -> [u32; 3] {
        [
            self.hero_start_ms,
            self.hero_start_ms.saturating_add(self.step_ms),
            self.hero_start_ms.saturating_add(self.step_ms.saturating_mul(2)),
        ]
    }
}

/// An outbound contact link rendered after the last section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallToAction {
    pub href: String,
    pub label: String,
}

impl CallToAction {
    pub fn validate(&self, context: &str) -> Result<(), ConfigError> {
        if self.href.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{context}.href must not be empty"
            )));
        }
        Ok(())
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never below one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Merge an article's `[theme]` table over the site theme.
pub fn resolve_theme(
    site: &ThemeConfig,
    overlay: Option<toml::Value>,
) -> Result<ThemeConfig, ConfigError> {
    let Some(overlay) = overlay else {
        return Ok(site.clone());
    };
    let base = toml::Value::try_from(site.clone()).expect("theme must serialize");
    let theme: ThemeConfig = merge_toml(base, overlay).try_into()?;
    theme.validate()?;
    Ok(theme)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# insight-pages configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Articles can override any [theme] key in their own [theme] table.
# Unknown keys will cause an error.

# Directory (relative to the content root) copied to the output root.
# Put background images referenced by articles here.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Site identity (used by the index page)
# ---------------------------------------------------------------------------
[site]
name = "Insights"
# Path prefix for article links on the index page, e.g. "/insights".
base_url = ""
lang = "en"
description = ""

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# "dark" or "light"
mode = "dark"
# Headings, links, and the badge gradient start.
accent = "#00ffff"
# Badge gradient end and link hover colour.
accent_alt = "#7fffd4"
# Colour of the pulsing text glow.
glow = "rgba(0, 255, 255, 0.5)"
# Page background gradient [from, to].
gradient = ["#000000", "#1a237e"]

# ---------------------------------------------------------------------------
# Staggered reveal (milliseconds after page load)
# ---------------------------------------------------------------------------
[reveal]
# Hero badge delay; heading and subheading follow step_ms apart.
hero_start_ms = 500
# Delay of the first content section that sets no reveal_delay_ms.
section_start_ms = 2000
# Gap between consecutive sections, and between blocks inside a section.
step_ms = 500
# Fade duration.
fade_ms = 1000

# ---------------------------------------------------------------------------
# Default call-to-action footer (articles may override or set cta = false)
# ---------------------------------------------------------------------------
# [cta]
# href = "mailto:hello@example.com"
# label = "Contact us to learn more"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// CSS custom properties for a theme, applied inline on the page's theme scope.
///
/// Custom properties inherit down the subtree only, so two scopes on one
/// document never bleed into each other.
pub fn theme_custom_properties(theme: &ThemeConfig, reveal: &RevealConfig) -> String {
    format!(
        "--accent: {accent}; --accent-alt: {accent_alt}; --glow: {glow}; \
         --gradient-from: {from}; --gradient-to: {to}; --text: {text}; \
         --panel-bg: {panel}; --reveal-fade: {fade}ms;",
        accent = theme.accent,
        accent_alt = theme.accent_alt,
        glow = theme.glow,
        from = theme.gradient[0],
        to = theme.gradient[1],
        text = theme.mode.text_color(),
        panel = theme.mode.panel_background(),
        fade = reveal.fade_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_dark() {
        let config = SiteConfig::default();
        assert_eq!(config.theme.mode, ThemeMode::Dark);
        assert_eq!(config.theme.accent, "#00ffff");
        assert!(config.cta.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[theme]
accent = "#ff69b4"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.theme.accent, "#ff69b4");
        assert_eq!(config.theme.accent_alt, "#7fffd4");
        assert_eq!(config.reveal.section_start_ms, 2000);
    }

    #[test]
    fn parse_light_mode() {
        let config: SiteConfig = toml::from_str("[theme]\nmode = \"light\"\n").unwrap();
        assert_eq!(config.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn parse_cta() {
        let toml = r#"
[cta]
href = "mailto:john@example.com"
label = "Get in touch"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let cta = config.cta.unwrap();
        assert_eq!(cta.href, "mailto:john@example.com");
        assert_eq!(cta.label, "Get in touch");
    }

    #[test]
    fn section_delay_steps_from_start() {
        let reveal = RevealConfig::default();
        assert_eq!(reveal.section_delay(0), 2000);
        assert_eq!(reveal.section_delay(1), 2500);
        assert_eq!(reveal.section_delay(4), 4000);
    }

    #[test]
    fn section_delay_saturates() {
        let reveal = RevealConfig {
            section_start_ms: u32::MAX - 1,
            ..RevealConfig::default()
        };
        assert_eq!(reveal.section_delay(3), u32::MAX);
    }

    #[test]
    fn block_delay_follows_section_by_steps() {
        let reveal = RevealConfig::default();
        assert_eq!(reveal.block_delay(3000, 0), 3500);
        assert_eq!(reveal.block_delay(3000, 1), 4000);
        assert_eq!(reveal.block_delay(u32::MAX - 10, 2), u32::MAX);
    }

    #[test]
    fn hero_delays_follow_step() {
        assert_eq!(RevealConfig::default().hero_delays(), [500, 1000, 1500]);
    }

    #[test]
    fn theme_custom_properties_include_all_variables() {
        let css = theme_custom_properties(&ThemeConfig::default(), &RevealConfig::default());
        assert!(css.contains("--accent: #00ffff;"));
        assert!(css.contains("--accent-alt: #7fffd4;"));
        assert!(css.contains("--glow: rgba(0, 255, 255, 0.5);"));
        assert!(css.contains("--gradient-from: #000000;"));
        assert!(css.contains("--gradient-to: #1a237e;"));
        assert!(css.contains("--text: #ffffff;"));
        assert!(css.contains("--reveal-fade: 1000ms;"));
    }

    #[test]
    fn light_mode_changes_text_color() {
        let theme = ThemeConfig {
            mode: ThemeMode::Light,
            ..ThemeConfig::default()
        };
        let css = theme_custom_properties(&theme, &RevealConfig::default());
        assert!(css.contains("--text: #111111;"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.name, "Insights");
        assert_eq!(config.assets_dir, "assets");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[site]
name = "Deep Vertical Insights"

[reveal]
step_ms = 250
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.name, "Deep Vertical Insights");
        assert_eq!(config.reveal.step_ms, 250);
        assert_eq!(config.reveal.fade_ms, 1000);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[reveal]\nfade_ms = 0\n").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\naccnt = \"#fff\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[themes]\naccent = \"#fff\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_mode_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\nmode = \"sepia\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_accent() {
        let mut config = SiteConfig::default();
        config.theme.accent = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("theme.accent"));
    }

    #[test]
    fn validate_zero_step() {
        let mut config = SiteConfig::default();
        config.reveal.step_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("step_ms"));
    }

    #[test]
    fn validate_cta_without_href() {
        let mut config = SiteConfig::default();
        config.cta = Some(CallToAction {
            href: String::new(),
            label: "Contact".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge / resolve tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[theme]
accent = "#fff"
glow = "red"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[theme]\naccent = \"#000\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let theme = merged.get("theme").unwrap();
        assert_eq!(theme.get("accent").unwrap().as_str(), Some("#000"));
        assert_eq!(theme.get("glow").unwrap().as_str(), Some("red"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("gradient = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("gradient = [\"c\", \"d\"]").unwrap();
        let merged = merge_toml(base, overlay);
        let arr = merged.get("gradient").unwrap().as_array().unwrap();
        assert_eq!(arr[0].as_str(), Some("c"));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.reveal.fade_ms, 1000);
    }

    #[test]
    fn resolve_theme_without_overlay_is_site_theme() {
        let site = ThemeConfig::default();
        assert_eq!(resolve_theme(&site, None).unwrap(), site);
    }

    #[test]
    fn resolve_theme_merges_overlay() {
        let site = ThemeConfig::default();
        let overlay: toml::Value = toml::from_str(
            r##"
accent = "#00FF00"
gradient = ["#121212", "#2E8B57"]
"##,
        )
        .unwrap();
        let theme = resolve_theme(&site, Some(overlay)).unwrap();
        assert_eq!(theme.accent, "#00FF00");
        assert_eq!(theme.gradient[1], "#2E8B57");
        assert_eq!(theme.accent_alt, site.accent_alt);
    }

    #[test]
    fn resolve_theme_rejects_unknown_key() {
        let overlay: toml::Value = toml::from_str("colour = \"red\"").unwrap();
        let result = resolve_theme(&ThemeConfig::default(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("site").is_some());
        assert!(val.get("theme").is_some());
        assert!(val.get("reveal").is_some());
        assert!(val.get("processing").is_some());
        assert!(val.get("cta").is_none());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.theme, ThemeConfig::default());
        assert_eq!(config.reveal.section_start_ms, 2000);
        assert_eq!(config.site.lang, "en");
        assert!(config.cta.is_none());
    }
}
