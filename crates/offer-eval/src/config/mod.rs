use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::offers::NegotiationThresholds;

/// Cost-of-living index that means "no adjustment".
pub const BASELINE_COL_INDEX: f64 = 100.0;

/// Annual benefits value assumed when an offer does not state one.
pub const DEFAULT_BENEFITS_VALUE: f64 = 15_000.0;

pub const DEFAULT_FINANCIAL_WEIGHT: f64 = 0.5;

const DEFAULT_NARRATIVE_TIMEOUT_MS: u64 = 2_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_benefits_value =
            number_from_env("OFFER_DEFAULT_BENEFITS", DEFAULT_BENEFITS_VALUE)?;
        if default_benefits_value < 0.0 {
            return Err(ConfigError::InvalidNumber {
                variable: "OFFER_DEFAULT_BENEFITS",
                value: default_benefits_value.to_string(),
            });
        }

        let default_financial_weight =
            number_from_env("OFFER_FINANCIAL_WEIGHT", DEFAULT_FINANCIAL_WEIGHT)?;
        if !(0.0..=1.0).contains(&default_financial_weight) {
            return Err(ConfigError::InvalidNumber {
                variable: "OFFER_FINANCIAL_WEIGHT",
                value: default_financial_weight.to_string(),
            });
        }

        let defaults = NegotiationThresholds::default();
        let negotiation = NegotiationThresholds {
            financial_gap_points: points_from_env(
                "OFFER_NEGOTIATION_GAP_POINTS",
                defaults.financial_gap_points,
            )?,
            non_financial_margin_points: points_from_env(
                "OFFER_NEGOTIATION_MARGIN_POINTS",
                defaults.non_financial_margin_points,
            )?,
        };

        let timeout_ms = match env::var("OFFER_NARRATIVE_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    variable: "OFFER_NARRATIVE_TIMEOUT_MS",
                    value: raw,
                })?,
            Err(_) => DEFAULT_NARRATIVE_TIMEOUT_MS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineConfig {
                default_benefits_value,
                default_financial_weight,
                narrative_timeout: Duration::from_millis(timeout_ms),
                negotiation,
            },
        })
    }
}

fn number_from_env(variable: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(variable) {
        Ok(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ConfigError::InvalidNumber {
                variable,
                value: raw,
            }),
        },
        Err(_) => Ok(default),
    }
}

// Score gaps live on the 0-100 scale.
fn points_from_env(variable: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = number_from_env(variable, default)?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidNumber {
            variable,
            value: value.to_string(),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine dials resolved once at the boundary and passed into every computation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub default_benefits_value: f64,
    pub default_financial_weight: f64,
    pub narrative_timeout: Duration,
    /// Score gaps that trigger negotiation guidance.
    pub negotiation: NegotiationThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_benefits_value: DEFAULT_BENEFITS_VALUE,
            default_financial_weight: DEFAULT_FINANCIAL_WEIGHT,
            narrative_timeout: Duration::from_millis(DEFAULT_NARRATIVE_TIMEOUT_MS),
            negotiation: NegotiationThresholds::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
