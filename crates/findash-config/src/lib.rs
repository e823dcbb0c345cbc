//! Configuration management for findash
//!
//! This module handles loading, validation, and management of
//! dashboard configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigErrorSeverity, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to a JSON file holding the monthly records.
    /// When unset, the bundled sample dataset is served.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Allow `POST /api/reload` to re-read the dataset
    #[serde(default = "default_true")]
    pub allow_reload: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            allow_reload: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Named colour palettes used by the charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_main_palette")]
    pub main: Vec<String>,
    #[serde(default = "default_assets_palette")]
    pub assets: Vec<String>,
    #[serde(default = "default_liabilities_palette")]
    pub liabilities: Vec<String>,
    #[serde(default = "default_equity_palette")]
    pub equity: Vec<String>,
    #[serde(default = "default_income_palette")]
    pub income: Vec<String>,
    #[serde(default = "default_expenses_palette")]
    pub expenses: Vec<String>,
    #[serde(default = "default_portfolio_palette")]
    pub portfolio: Vec<String>,
    #[serde(default = "default_own_portfolio_palette")]
    pub own_portfolio: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            main: default_main_palette(),
            assets: default_assets_palette(),
            liabilities: default_liabilities_palette(),
            equity: default_equity_palette(),
            income: default_income_palette(),
            expenses: default_expenses_palette(),
            portfolio: default_portfolio_palette(),
            own_portfolio: default_own_portfolio_palette(),
        }
    }
}

impl PaletteConfig {
    /// All palettes with their config field names
    pub fn named(&self) -> [(&'static str, &Vec<String>); 8] {
        [
            ("main", &self.main),
            ("assets", &self.assets),
            ("liabilities", &self.liabilities),
            ("equity", &self.equity),
            ("income", &self.income),
            ("expenses", &self.expenses),
            ("portfolio", &self.portfolio),
            ("own_portfolio", &self.own_portfolio),
        ]
    }
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn default_main_palette() -> Vec<String> {
    palette(&["#004dda", "#f97316", "#22c55e"])
}

fn default_assets_palette() -> Vec<String> {
    palette(&["#0e7490", "#0891b2", "#004dda", "#67e8f9"])
}

fn default_liabilities_palette() -> Vec<String> {
    palette(&["#c2410c", "#ea580c", "#f97316", "#fb923c", "#fdba74", "#fed7aa"])
}

fn default_equity_palette() -> Vec<String> {
    palette(&["#15803d", "#f97316", "#22c55e"])
}

fn default_income_palette() -> Vec<String> {
    palette(&["#083344", "#075985", "#0369a1", "#0ea5e9", "#38bdf8", "#7dd3fc"])
}

fn default_expenses_palette() -> Vec<String> {
    palette(&["#9a3412", "#c2410c", "#ea580c", "#f97316", "#fb923c", "#fdba74"])
}

fn default_portfolio_palette() -> Vec<String> {
    palette(&["#8b5cf6", "#d946ef"])
}

fn default_own_portfolio_palette() -> Vec<String> {
    palette(&["#818cf8", "#c084fc"])
}

/// Chart and visualization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Pie slices below this share (in percent) get no callout label
    #[serde(default = "default_label_threshold")]
    pub label_threshold_percent: f64,
    /// Show legends next to the drill-down pies
    #[serde(default = "default_true")]
    pub show_legend: bool,
    /// Colour palettes
    #[serde(default)]
    pub palettes: PaletteConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            label_threshold_percent: default_label_threshold(),
            show_legend: true,
            palettes: PaletteConfig::default(),
        }
    }
}

fn default_label_threshold() -> f64 {
    3.0
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
    /// Currency symbol position ("before" or "after")
    #[serde(default = "default_symbol_position")]
    pub symbol_position: SymbolPosition,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
            symbol_position: SymbolPosition::Before,
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    0
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

fn default_symbol_position() -> SymbolPosition {
    SymbolPosition::Before
}

/// Currency symbol position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

impl Default for SymbolPosition {
    fn default() -> Self {
        SymbolPosition::Before
    }
}

impl std::str::FromStr for SymbolPosition {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" => Ok(SymbolPosition::Before),
            "after" => Ok(SymbolPosition::After),
            _ => Err(format!("Invalid symbol position: {}", s)),
        }
    }
}

impl std::fmt::Display for SymbolPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolPosition::Before => write!(f, "before"),
            SymbolPosition::After => write!(f, "after"),
        }
    }
}

/// Text-generation service used by the "summarize this data" action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Expose the analysis endpoint and button
    #[serde(default = "default_false")]
    pub enabled: bool,
    /// Base URL of the generative language API
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    /// Model name
    #[serde(default = "default_ai_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_ai_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_ai_timeout() -> u64 {
    30
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Dataset settings
    #[serde(default)]
    pub data: DataConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Chart settings
    #[serde(default)]
    pub charts: ChartConfig,
    /// Text-generation settings
    #[serde(default)]
    pub ai: AiConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        let threshold = self.charts.label_threshold_percent;
        if !(0.0..100.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                field: "charts.label_threshold_percent".to_string(),
                reason: "Label threshold must be in [0, 100)".to_string(),
            });
        }

        for (name, colors) in self.charts.palettes.named() {
            if colors.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("charts.palettes.{}", name),
                    reason: "Palette must contain at least one colour".to_string(),
                });
            }
        }

        if self.ai.enabled {
            if self.ai.endpoint.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "ai.endpoint".to_string() });
            }
            if self.ai.model.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "ai.model".to_string() });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
