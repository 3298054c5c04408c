//! Telemetry initialization and configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_level: String,
}

impl TelemetryConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), format: LogFormat::Pretty, default_level: "info".to_string() }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    /// `RUST_LOG` wins over [`default_level`](Self::default_level).
    pub fn env_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error>> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(&self.default_level)?),
        }
    }
}

/// Maps a `-v` count to a level: 0 → info, 1 → debug, 2+ → trace.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize console logging with default settings.
///
/// # Example
/// ```
/// use periodic_telemetry::init_telemetry;
/// init_telemetry("periodic-agent").expect("Failed to initialize telemetry");
/// ```
pub fn init_telemetry(service_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    init(&TelemetryConfig::new(service_name))
}

/// Installs the global subscriber. Only the first call has any effect.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init(config: &TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = config.env_filter()?;
    let mut result = Ok(());

    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        let installed = match config.format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true),
                )
                .try_init(),
        };

        match installed {
            Ok(()) => tracing::info!(
                service.name = %config.service_name,
                format = ?config.format,
                "Telemetry initialized"
            ),
            Err(e) => result = Err(e.into()),
        }
    });

    result
}
