use crate::compensation::{
    CompensationPolicy, CurrencyFormat, HeadStrategy, LeadershipGate, MultiplierMatrix,
    PolicyError, RateBonusPlan, SdrGatePolicy,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub compensation: CompensationSettings,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            compensation: CompensationSettings::from_env()?,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadStrategyKind {
    MultiplierMatrix,
    RateBonus,
}

impl HeadStrategyKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "matrix" | "multiplier_matrix" => Some(Self::MultiplierMatrix),
            "rate_bonus" | "rate" => Some(Self::RateBonus),
            _ => None,
        }
    }
}

/// Which compensation policy variants are active, layered over an optional JSON policy file.
#[derive(Clone)]
pub struct CompensationSettings {
    pub policy_path: Option<PathBuf>,
    pub sdr_policy: Option<SdrGatePolicy>,
    pub head_strategy: Option<HeadStrategyKind>,
    pub head_matrix: Option<MultiplierMatrix>,
    pub leadership_secret: Option<String>,
    pub currency_symbol: String,
}

impl Default for CompensationSettings {
    fn default() -> Self {
        Self {
            policy_path: None,
            sdr_policy: None,
            head_strategy: None,
            head_matrix: None,
            leadership_secret: None,
            currency_symbol: CurrencyFormat::brl().symbol,
        }
    }
}

impl fmt::Debug for CompensationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompensationSettings")
            .field("policy_path", &self.policy_path)
            .field("sdr_policy", &self.sdr_policy)
            .field("head_strategy", &self.head_strategy)
            .field("head_matrix", &self.head_matrix)
            .field("leadership_secret_set", &self.leadership_secret.is_some())
            .field("currency_symbol", &self.currency_symbol)
            .finish()
    }
}

impl CompensationSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let policy_path = non_empty_var("COMP_POLICY_PATH").map(PathBuf::from);

        let sdr_policy = non_empty_var("COMP_SDR_POLICY")
            .map(|value| {
                SdrGatePolicy::parse(&value).ok_or(ConfigError::InvalidSetting {
                    name: "COMP_SDR_POLICY",
                    value,
                })
            })
            .transpose()?;

        let head_strategy = non_empty_var("COMP_HEAD_STRATEGY")
            .map(|value| {
                HeadStrategyKind::parse(&value).ok_or(ConfigError::InvalidSetting {
                    name: "COMP_HEAD_STRATEGY",
                    value,
                })
            })
            .transpose()?;

        let head_matrix = non_empty_var("COMP_HEAD_MATRIX")
            .map(|value| {
                MultiplierMatrix::preset(&value).ok_or(ConfigError::InvalidSetting {
                    name: "COMP_HEAD_MATRIX",
                    value,
                })
            })
            .transpose()?;

        let currency_symbol = non_empty_var("COMP_CURRENCY_SYMBOL")
            .unwrap_or_else(|| CurrencyFormat::brl().symbol);

        Ok(Self {
            policy_path,
            sdr_policy,
            head_strategy,
            head_matrix,
            leadership_secret: non_empty_var("COMP_LEADERSHIP_SECRET"),
            currency_symbol,
        })
    }

    /// Load the policy file (or defaults) and apply the variant overrides on top.
    pub fn resolve_policy(&self) -> Result<CompensationPolicy, ConfigError> {
        let mut policy = match &self.policy_path {
            Some(path) => CompensationPolicy::from_path(path)?,
            None => CompensationPolicy::default(),
        };

        if let Some(sdr_policy) = self.sdr_policy {
            policy.sdr.policy = sdr_policy;
        }

        let kind = self.head_strategy.or(self
            .head_matrix
            .as_ref()
            .map(|_| HeadStrategyKind::MultiplierMatrix));

        match kind {
            Some(HeadStrategyKind::MultiplierMatrix) => {
                let matrix = match (&self.head_matrix, &policy.head) {
                    (Some(matrix), _) => matrix.clone(),
                    (None, HeadStrategy::MultiplierMatrix(existing)) => existing.clone(),
                    (None, HeadStrategy::RateBonus(_)) => MultiplierMatrix::conservative(),
                };
                policy.head = HeadStrategy::MultiplierMatrix(matrix);
            }
            Some(HeadStrategyKind::RateBonus) => {
                if !matches!(policy.head, HeadStrategy::RateBonus(_)) {
                    policy.head = HeadStrategy::RateBonus(RateBonusPlan::default());
                }
            }
            None => {}
        }

        policy.validate()?;
        Ok(policy)
    }

    pub fn leadership_gate(&self) -> LeadershipGate {
        LeadershipGate::from_optional(self.leadership_secret.clone())
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::brl().with_symbol(self.currency_symbol.clone())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSetting { name: &'static str, value: String },
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSetting { name, value } => {
                write!(f, "{name} has an unsupported value '{value}'")
            }
            ConfigError::Policy(err) => write!(f, "compensation policy error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSetting { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Policy(err) => Some(err),
        }
    }
}

impl From<PolicyError> for ConfigError {
    fn from(value: PolicyError) -> Self {
        Self::Policy(value)
    }
}
