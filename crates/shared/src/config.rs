//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Page geometry used when assembling report documents.
    #[serde(default)]
    pub report: ReportConfig,
    /// Aggregation defaults.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "agro=debug,tower_http=debug".to_string()
}

/// Page geometry configuration, all values in millimetres.
///
/// Defaults describe an A4 portrait page with 14mm side margins and
/// 20mm top/bottom margins.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Printable width.
    #[serde(default = "default_content_width")]
    pub content_width: Decimal,
    /// Printable height.
    #[serde(default = "default_content_height")]
    pub content_height: Decimal,
    /// Distance from the page top to the printable area.
    #[serde(default = "default_top_margin")]
    pub top_margin: Decimal,
    /// Distance from the page left edge to the printable area.
    #[serde(default = "default_left_margin")]
    pub left_margin: Decimal,
    /// Height of a table header row.
    #[serde(default = "default_header_height")]
    pub header_height: Decimal,
    /// Height of a table body row.
    #[serde(default = "default_row_height")]
    pub row_height: Decimal,
    /// Height consumed by a section heading.
    #[serde(default = "default_heading_height")]
    pub heading_height: Decimal,
    /// Vertical gap after each table or image section.
    #[serde(default = "default_section_gap")]
    pub section_gap: Decimal,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            content_width: default_content_width(),
            content_height: default_content_height(),
            top_margin: default_top_margin(),
            left_margin: default_left_margin(),
            header_height: default_header_height(),
            row_height: default_row_height(),
            heading_height: default_heading_height(),
            section_gap: default_section_gap(),
        }
    }
}

fn default_content_width() -> Decimal {
    Decimal::new(182, 0) // 210 - 2 * 14
}

fn default_content_height() -> Decimal {
    Decimal::new(257, 0) // 297 - 2 * 20
}

fn default_top_margin() -> Decimal {
    Decimal::new(20, 0)
}

fn default_left_margin() -> Decimal {
    Decimal::new(14, 0)
}

fn default_header_height() -> Decimal {
    Decimal::new(8, 0)
}

fn default_row_height() -> Decimal {
    Decimal::new(7, 0)
}

fn default_heading_height() -> Decimal {
    Decimal::new(10, 0)
}

fn default_section_gap() -> Decimal {
    Decimal::new(10, 0)
}

/// Aggregation defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Number of buckets returned by top-N summaries.
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
    /// Share percentage below which a pie label is hidden.
    #[serde(default = "default_label_threshold")]
    pub label_threshold: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_limit: default_top_limit(),
            label_threshold: default_label_threshold(),
        }
    }
}

fn default_top_limit() -> usize {
    10
}

fn default_label_threshold() -> Decimal {
    Decimal::new(5, 0)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("AGRO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
