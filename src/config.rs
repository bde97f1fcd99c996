use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::Provider;
use crate::persona::Persona;
use crate::transcript::DEFAULT_GREETING;

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// LLM configuration for API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfigFile {
    /// Which hosted provider to talk to
    pub provider: Provider,
    /// API base URL (empty uses the provider default)
    pub api_base: String,
    /// API key (can also be set via GEMINI_API_KEY / ANTHROPIC_API_KEY)
    pub api_key: Option<String>,
    /// Model name (empty uses the provider default)
    pub model: String,
    /// Temperature for generation
    pub temperature: Option<f32>,
    /// Max tokens for generation
    pub max_tokens: Option<u32>,
    /// Seconds to wait for a reply before answering with the apology; 0 waits forever
    pub request_timeout_secs: u64,
}

impl Default for LlmConfigFile {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_base: String::new(),
            api_key: None,
            model: String::new(),
            temperature: Some(0.7),
            max_tokens: Some(1024),
            request_timeout_secs: 60,
        }
    }
}

impl LlmConfigFile {
    /// Reply timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Chat widget behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Assistant message every session starts with
    pub greeting: String,
    /// Whether the panel is open on launch
    pub start_open: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            start_open: false,
        }
    }
}

/// Theme configuration for UI elements.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Panel border gradient start color
    pub panel_gradient_start: Rgb,
    /// Panel border gradient end color
    pub panel_gradient_end: Rgb,
    /// Page backdrop background
    pub bg_page: Rgb,
    /// Panel background
    pub bg_panel: Rgb,
    /// Input line background
    pub bg_input: Rgb,
    /// User message text
    pub user_fg: Rgb,
    /// Assistant message text
    pub assistant_fg: Rgb,
    /// Status: Ready
    pub status_ready: Rgb,
    /// Status: Waiting for a reply
    pub status_waiting: Rgb,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            panel_gradient_start: [148, 163, 184], // Slate
            panel_gradient_end: [255, 255, 255],   // White
            bg_page: [10, 10, 10],
            bg_panel: [20, 20, 25],
            bg_input: [30, 30, 35],
            user_fg: [255, 255, 255],
            assistant_fg: [203, 213, 225],
            status_ready: [100, 255, 100],
            status_waiting: [100, 200, 255],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive used when RUST_LOG is unset
    pub filter: String,
    /// Log file path (defaults to the data directory)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Resolve the log file, falling back to <data dir>/bytebot/bytebot.log.
    pub fn file_path(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("bytebot")
                .join("bytebot.log")
        })
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfigFile,
    pub persona: Persona,
    pub widget: WidgetConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the default config file path: ~/.config/bytebot/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("bytebot").join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from_path(&path).ok())
            .unwrap_or_default()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl ThemeConfig {
    /// Convert an RGB array to a tuple for gradient math.
    pub fn to_tuple(rgb: &Rgb) -> (u8, u8, u8) {
        (rgb[0], rgb[1], rgb[2])
    }

    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Get panel gradient colors as tuples.
    pub fn panel_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.panel_gradient_start),
            Self::to_tuple(&self.panel_gradient_end),
        )
    }

    pub fn bg_page(&self) -> ratatui::style::Color {
        Self::to_color(&self.bg_page)
    }

    pub fn bg_panel(&self) -> ratatui::style::Color {
        Self::to_color(&self.bg_panel)
    }

    pub fn bg_input(&self) -> ratatui::style::Color {
        Self::to_color(&self.bg_input)
    }

    pub fn user_fg(&self) -> ratatui::style::Color {
        Self::to_color(&self.user_fg)
    }

    pub fn assistant_fg(&self) -> ratatui::style::Color {
        Self::to_color(&self.assistant_fg)
    }

    pub fn status_ready(&self) -> ratatui::style::Color {
        Self::to_color(&self.status_ready)
    }

    pub fn status_waiting(&self) -> ratatui::style::Color {
        Self::to_color(&self.status_waiting)
    }
}
