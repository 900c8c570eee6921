use std::env;
use std::net::{IpAddr, SocketAddr};

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

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How the service treats the record submission fired when leaving the heart health step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPolicy {
    /// Spawn the submission and advance to the summary without waiting on it.
    #[default]
    Optimistic,
    /// Await the submission and hold the session on the heart health step if it fails.
    Blocking,
}

impl SubmissionPolicy {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "optimistic" => Ok(Self::Optimistic),
            "blocking" | "block" => Ok(Self::Blocking),
            other => Err(ConfigError::InvalidSubmissionPolicy(other.to_string())),
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentConfig,
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

        let field_secret = env::var("HEALTH_RISK_FIELD_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());
        if field_secret.is_none() && environment.is_production() {
            return Err(ConfigError::MissingFieldSecret);
        }

        let submission_policy = SubmissionPolicy::parse(
            &env::var("HEALTH_RISK_SUBMISSION_POLICY").unwrap_or_default(),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentConfig {
                field_secret,
                submission_policy,
            },
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

/// Assessment workflow settings.
#[derive(Clone, Default)]
pub struct AssessmentConfig {
    /// Shared secret the PII field cipher derives its key from.
    pub field_secret: Option<String>,
    pub submission_policy: SubmissionPolicy,
}

impl std::fmt::Debug for AssessmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentConfig")
            .field(
                "field_secret",
                &self.field_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("submission_policy", &self.submission_policy)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("HEALTH_RISK_FIELD_SECRET must be set in production")]
    MissingFieldSecret,
    #[error("HEALTH_RISK_SUBMISSION_POLICY must be 'optimistic' or 'blocking', found '{0}'")]
    InvalidSubmissionPolicy(String),
}
