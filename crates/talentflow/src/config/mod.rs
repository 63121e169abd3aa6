use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

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
    pub simulator: SimulatorConfig,
    pub seed: SeedConfig,
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

        let simulator = SimulatorConfig {
            enabled: env_or("SIM_ENABLED", environment != AppEnvironment::Test)?,
            latency_min_ms: env_or("SIM_LATENCY_MIN_MS", DEFAULT_LATENCY_MIN_MS)?,
            latency_max_ms: env_or("SIM_LATENCY_MAX_MS", DEFAULT_LATENCY_MAX_MS)?,
            write_failure_rate: env_or("SIM_WRITE_FAILURE_RATE", DEFAULT_WRITE_FAILURE_RATE)?,
            reorder_failure_rate: env_or(
                "SIM_REORDER_FAILURE_RATE",
                DEFAULT_REORDER_FAILURE_RATE,
            )?,
        };
        simulator.validate()?;

        let seed = SeedConfig {
            on_start: env_or("SEED_ON_START", true)?,
            candidates: env_or("SEED_CANDIDATES", DEFAULT_SEED_CANDIDATES)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            simulator,
            seed,
        })
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name }),
        _ => Ok(default),
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_LATENCY_MIN_MS: u64 = 200;
pub const DEFAULT_LATENCY_MAX_MS: u64 = 1200;
pub const DEFAULT_WRITE_FAILURE_RATE: f64 = 0.08;
pub const DEFAULT_REORDER_FAILURE_RATE: f64 = 0.10;
const DEFAULT_SEED_CANDIDATES: usize = 200;

/// Latency and failure injection applied ahead of every request.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub enabled: bool,
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    pub write_failure_rate: f64,
    pub reorder_failure_rate: f64,
}

impl SimulatorConfig {
    /// No latency and no injected failures.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency_min_ms > self.latency_max_ms {
            return Err(ConfigError::InvalidLatency {
                min: self.latency_min_ms,
                max: self.latency_max_ms,
            });
        }
        for (name, rate) in [
            ("SIM_WRITE_FAILURE_RATE", self.write_failure_rate),
            ("SIM_REORDER_FAILURE_RATE", self.reorder_failure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidRate { name, value: rate });
            }
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            latency_min_ms: DEFAULT_LATENCY_MIN_MS,
            latency_max_ms: DEFAULT_LATENCY_MAX_MS,
            write_failure_rate: DEFAULT_WRITE_FAILURE_RATE,
            reorder_failure_rate: DEFAULT_REORDER_FAILURE_RATE,
        }
    }
}

/// Demo data seeded into an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub on_start: bool,
    pub candidates: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { name: &'static str },
    InvalidLatency { min: u64, max: u64 },
    InvalidRate { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { name } => write!(f, "{name} has an unparseable value"),
            ConfigError::InvalidLatency { min, max } => write!(
                f,
                "SIM_LATENCY_MIN_MS ({min}) must not exceed SIM_LATENCY_MAX_MS ({max})"
            ),
            ConfigError::InvalidRate { name, value } => {
                write!(f, "{name} must be within 0.0..=1.0 (found {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
