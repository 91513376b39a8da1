use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub notify: NotifyConfig,
    pub security: SecurityConfig,
}

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Security configuration for production deployments
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// True if server is behind a proxy that terminates SSL (nginx, Cloudflare, etc.)
    /// When true: cookie_secure=true is enabled
    pub ssl_proxy: bool,
    /// Session encryption key (64 hex chars). Required when ssl_proxy=true
    pub session_secret_key: Option<String>,
}

/// How the creation endpoint hands an enquiry to the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Fire-and-forget on a detached task (default)
    Spawn,
    /// Awaited before the HTTP response returns
    Await,
}

/// Notification pipeline configuration (Slack webhook + SMTP)
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Slack incoming-webhook URL for the enquiries channel
    pub slack_webhook_url: Option<String>,
    pub smtp: SmtpConfig,
    /// When set, every confirmation email is redirected to this address
    /// instead of the enquirer's. For staging/test environments.
    pub recipient_override: Option<String>,
    pub dispatch: DispatchMode,
    /// Directory holding the email HTML templates
    pub template_dir: String,
}

/// SMTP submission configuration for the confirmation-email channel
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    /// Implicit TLS (SMTPS). False means STARTTLS.
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub reply_to: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database: DatabaseConfig::from_env()?,
            notify: NotifyConfig::from_env(),
            security: SecurityConfig::from_env()?,
        })
    }
}

impl NotifyConfig {
    /// Load notification configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            slack_webhook_url: env::var("SLACK_ENQUIRIES_WEBHOOK").ok(),
            smtp: SmtpConfig::from_env(),
            recipient_override: env::var("MAIL_RECIPIENT_OVERRIDE")
                .ok()
                .filter(|v| !v.is_empty()),
            dispatch: match env::var("NOTIFY_DISPATCH").as_deref() {
                Ok("await") => DispatchMode::Await,
                _ => DispatchMode::Spawn,
            },
            template_dir: env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".to_string()),
        }
    }
}

impl SmtpConfig {
    /// Load SMTP configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("MAIL_HOST").ok(),
            port: env::var("MAIL_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .unwrap_or(465),
            secure: env::var("MAIL_SECURE")
                .map(|v| v != "false")
                .unwrap_or(true),
            username: env::var("MAIL_USER").ok(),
            password: env::var("MAIL_PASSWORD").ok(),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "enquiries@leadbox.local".to_string()),
            reply_to: env::var("MAIL_REPLY_TO")
                .unwrap_or_else(|_| "support@leadbox.local".to_string()),
        }
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            acquire_timeout: Duration::from_secs(
                env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            ),
            idle_timeout: Duration::from_secs(
                env::var("DATABASE_IDLE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .unwrap_or(600),
            ),
            max_lifetime: Duration::from_secs(
                env::var("DATABASE_MAX_LIFETIME_SECS")
                    .unwrap_or_else(|_| "1800".to_string())
                    .parse()
                    .unwrap_or(1800),
            ),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    MissingDatabaseUrl,
    MissingSessionSecret,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL environment variable is required")
            }
            ConfigError::MissingSessionSecret => {
                write!(
                    f,
                    "SESSION_SECRET_KEY is required when SSL_PROXY is enabled"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl SecurityConfig {
    /// Load security configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_secret_key = env::var("SESSION_SECRET_KEY").ok();

        let ssl_proxy = env::var("SSL_PROXY")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        // When SSL_PROXY is enabled, SESSION_SECRET_KEY is required
        if ssl_proxy && session_secret_key.is_none() {
            return Err(ConfigError::MissingSessionSecret);
        }

        Ok(Self {
            ssl_proxy,
            session_secret_key,
        })
    }
}
