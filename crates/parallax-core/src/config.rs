use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::photo::SearchRequest;

/// Environment variable that overrides `unsplash.access_key`
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub unsplash: UnsplashConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the log file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level, used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// API base URL, without the `/search/photos` path
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Search query
    #[serde(default = "default_query")]
    pub query: String,
    /// Number of photos requested (`per_page`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Unsplash access key, sent as `Client-ID`
    #[serde(default)]
    pub access_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            query: default_query(),
            page_size: default_page_size(),
            access_key: None,
            request_timeout_secs: default_timeout(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Item width as a fraction of the container width
    #[serde(default = "default_item_width_ratio")]
    pub item_width_ratio: f64,
    /// Layout points per half-block pixel
    #[serde(default = "default_points_per_pixel")]
    pub points_per_pixel: f64,
    /// Show the photo description under the carousel
    #[serde(default = "default_true")]
    pub show_caption: bool,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            item_width_ratio: default_item_width_ratio(),
            points_per_pixel: default_points_per_pixel(),
            show_caption: default_true(),
            theme: ThemeConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Theme selection.
///
/// Accepts either `theme = "nord"` or a table with `name` and optional
/// hex color overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ThemeConfigRepr")]
pub struct ThemeConfig {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThemeConfigRepr {
    Name(String),
    Full {
        #[serde(default = "default_theme_name")]
        name: String,
        #[serde(default)]
        colors: ThemeColorOverrides,
    },
}

impl From<ThemeConfigRepr> for ThemeConfig {
    fn from(repr: ThemeConfigRepr) -> Self {
        match repr {
            ThemeConfigRepr::Name(name) => Self {
                name,
                colors: ThemeColorOverrides::default(),
            },
            ThemeConfigRepr::Full { name, colors } => Self { name, colors },
        }
    }
}

/// Hex color overrides (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Backdrop behind posters and cards
    pub background: Option<String>,
    /// Caption and status text
    pub foreground: Option<String>,
    /// Status bar background
    pub status_bg: Option<String>,
    pub accent: Option<String>,
    pub error: Option<String>,
}

/// Easing curve for the snap animation between carousel pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
    EaseInOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate between snap points instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "l", "<C-n>" (Ctrl+n), "<S-Tab>" (Shift+Tab), "<Right>", "gg"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Page to the next photo
    #[serde(default = "default_key_next")]
    pub next: String,
    /// Page to the previous photo
    #[serde(default = "default_key_prev")]
    pub prev: String,
    #[serde(default = "default_key_first")]
    pub first: String,
    #[serde(default = "default_key_last")]
    pub last: String,
    /// Start a new load attempt
    #[serde(default = "default_key_reload")]
    pub reload: String,
    /// Open the centered photo in the browser
    #[serde(default = "default_key_open_browser")]
    pub open_browser: String,
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            next: default_key_next(),
            prev: default_key_prev(),
            first: default_key_first(),
            last: default_key_last(),
            reload: default_key_reload(),
            open_browser: default_key_open_browser(),
            help: default_key_help(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_next() -> String { "l".to_string() }
fn default_key_prev() -> String { "h".to_string() }
fn default_key_first() -> String { "gg".to_string() }
fn default_key_last() -> String { "G".to_string() }
fn default_key_reload() -> String { "r".to_string() }
fn default_key_open_browser() -> String { "o".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parallax")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_base_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_query() -> String {
    "cat".to_string()
}

fn default_page_size() -> u32 {
    8
}

fn default_timeout() -> u64 {
    30
}

fn default_tick_rate() -> u64 {
    100
}

fn default_item_width_ratio() -> f64 {
    0.72
}

fn default_points_per_pixel() -> f64 {
    4.0
}

fn default_true() -> bool {
    true
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_animation_duration() -> u64 {
    220
}

fn default_animation_fps() -> u32 {
    60
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file (or defaults), then apply environment overrides
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(ACCESS_KEY_ENV) {
            config.apply_access_key(key);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Set the access key, ignoring blank values
    pub fn apply_access_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !key.trim().is_empty() {
            self.unsplash.access_key = Some(key.trim().to_string());
        }
    }

    /// Copy of this config with the access key masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.unsplash.access_key.is_some() {
            config.unsplash.access_key = Some("********".to_string());
        }
        config
    }

    /// Build a validated search request from the `[unsplash]` section
    pub fn search_request(&self) -> crate::Result<SearchRequest> {
        let credential = self.unsplash.access_key.clone().ok_or_else(|| {
            crate::Error::Config(format!(
                "No Unsplash access key configured. Set [unsplash] access_key in {} \
                or the {} environment variable.",
                Self::config_path().display(),
                ACCESS_KEY_ENV
            ))
        })?;

        SearchRequest::new(&self.unsplash.query, self.unsplash.page_size, credential)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/parallax/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("parallax")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("parallax.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_screen() {
        let config = AppConfig::default();
        assert_eq!(config.unsplash.query, "cat");
        assert_eq!(config.unsplash.page_size, 8);
        assert!((config.ui.item_width_ratio - 0.72).abs() < f64::EPSILON);
        assert!(config.unsplash.access_key.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [unsplash]
            query = "mountains"
            access_key = "abc"

            [ui.scroll]
            easing = "ease-in-out"
            "#,
        )
        .unwrap();

        assert_eq!(config.unsplash.query, "mountains");
        assert_eq!(config.unsplash.page_size, 8);
        assert_eq!(config.unsplash.api_base_url, "https://api.unsplash.com");
        assert_eq!(config.ui.scroll.easing, EasingType::EaseInOut);
        assert_eq!(config.keymap.next, "l");
    }

    #[test]
    fn test_theme_accepts_string_or_table() {
        let config = AppConfig::from_toml("[ui]\ntheme = \"nord\"\n").unwrap();
        assert_eq!(config.ui.theme.name, "nord");

        let config = AppConfig::from_toml(
            "[ui.theme]\nname = \"nord\"\n[ui.theme.colors]\naccent = \"#ff0000\"\n",
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "nord");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[unsplash]\npage_size = \"eight\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_search_request_requires_access_key() {
        let config = AppConfig::default();
        assert!(matches!(
            config.search_request(),
            Err(crate::Error::Config(_))
        ));

        let mut config = AppConfig::default();
        config.apply_access_key("  token  ");
        let request = config.search_request().unwrap();
        assert_eq!(request.credential(), "token");
        assert_eq!(request.query(), "cat");
        assert_eq!(request.page_size(), 8);
    }

    #[test]
    fn test_blank_access_key_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_access_key("   ");
        assert!(config.unsplash.access_key.is_none());
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = AppConfig::default();
        config.apply_access_key("secret");
        let toml = config.redacted().to_toml().unwrap();
        assert!(!toml.contains("secret"));
        assert!(toml.contains("********"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.ui.theme.name = "nord".to_string();
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.ui.theme.name, "nord");
    }
}
