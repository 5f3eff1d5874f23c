/// Configuration for the API server
///
/// Loaded from environment variables (and a `.env` file when present).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: HS256 signing secret, at least 32 characters (required)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: `*`)
/// - `UPCOMING_HORIZON_DAYS`: look-ahead window for upcoming tasks (default: 7)
/// - `DEFAULT_TZ_OFFSET_MINUTES`: calendar offset from UTC when the client
///   sends none, east positive (default: 0)
/// - `SMTP_HOST`: enables email notifications when set
/// - `SMTP_PORT`: SMTP port (default: 587)
/// - `SMTP_FROM`: sender mailbox (default: `TaskDeck <noreply@taskdeck.local>`)
/// - `SMTP_USER`, `SMTP_PASSWORD`: SMTP credentials, both or neither
/// - `PUSH_ENABLED`: `true`/`1` enables Expo push (default: off)
/// - `PUSH_ENDPOINT`: push service URL (default: Expo's public endpoint)
/// - `RUST_LOG`, `LOG_FORMAT`: logging, see `main.rs`
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    notify::{
        email::{DEFAULT_FROM_ADDRESS, DEFAULT_SMTP_PORT},
        EmailConfig, PushConfig,
    },
    stats::DEFAULT_HORIZON_DAYS,
};

/// Largest accepted UTC offset, in minutes (UTC+14)
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub tasks: TasksConfig,
    pub notifications: NotificationsConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Generate with `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,
}

/// Aggregation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    pub upcoming_horizon_days: i64,
    pub default_tz_offset_minutes: i32,
}

/// Notification channels; `None` means the channel is off
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub email: Option<EmailConfig>,
    pub push: Option<PushConfig>,
}

impl NotificationsConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let email = match non_blank("SMTP_HOST") {
            Some(smtp_host) => {
                let smtp_port = match non_blank("SMTP_PORT") {
                    Some(port) => port
                        .trim()
                        .parse::<u16>()
                        .map_err(|e| anyhow::anyhow!("SMTP_PORT is invalid: {}", e))?,
                    None => DEFAULT_SMTP_PORT,
                };

                let smtp_user = non_blank("SMTP_USER");
                let smtp_password = non_blank("SMTP_PASSWORD");
                if smtp_user.is_some() != smtp_password.is_some() {
                    anyhow::bail!("SMTP_USER and SMTP_PASSWORD must be set together");
                }

                let config = EmailConfig {
                    smtp_host: smtp_host.trim().to_string(),
                    smtp_port,
                    from_address: non_blank("SMTP_FROM")
                        .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
                    smtp_user,
                    smtp_password,
                };
                config
                    .validate()
                    .map_err(|e| anyhow::anyhow!("SMTP_FROM is invalid: {}", e))?;
                Some(config)
            }
            None => None,
        };

        let push_enabled = match non_blank("PUSH_ENABLED")
            .map(|value| value.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => anyhow::bail!("PUSH_ENABLED is invalid: {}", other),
        };

        let push = if push_enabled {
            let config = match non_blank("PUSH_ENDPOINT") {
                Some(endpoint) => PushConfig {
                    endpoint: endpoint.trim().to_string(),
                },
                None => PushConfig::default(),
            };
            if !config.has_valid_endpoint() {
                anyhow::bail!("PUSH_ENDPOINT must be an http(s) URL");
            }
            Some(config)
        } else {
            None
        };

        Ok(Self { email, push })
    }
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            upcoming_horizon_days: DEFAULT_HORIZON_DAYS,
            default_tz_offset_minutes: 0,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse or is out of range.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = get("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = get("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let upcoming_horizon_days = get("UPCOMING_HORIZON_DAYS", &DEFAULT_HORIZON_DAYS.to_string())
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("UPCOMING_HORIZON_DAYS is invalid: {}", e))?;
        if upcoming_horizon_days < 0 {
            anyhow::bail!("UPCOMING_HORIZON_DAYS must not be negative");
        }

        let default_tz_offset_minutes = get("DEFAULT_TZ_OFFSET_MINUTES", "0")
            .parse::<i32>()
            .map_err(|e| anyhow::anyhow!("DEFAULT_TZ_OFFSET_MINUTES is invalid: {}", e))?;
        if !(-MAX_TZ_OFFSET_MINUTES..=MAX_TZ_OFFSET_MINUTES).contains(&default_tz_offset_minutes) {
            anyhow::bail!("DEFAULT_TZ_OFFSET_MINUTES must be within ±{}", MAX_TZ_OFFSET_MINUTES);
        }

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST", "0.0.0.0"),
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            tasks: TasksConfig {
                upcoming_horizon_days,
                default_tz_offset_minutes,
            },
            notifications: NotificationsConfig::from_lookup(&lookup)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.allows_any_origin());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.tasks.upcoming_horizon_days, 7);
        assert_eq!(config.tasks.default_tz_offset_minutes, 0);
        assert!(config.notifications.email.is_none());
        assert!(config.notifications.push.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"),
            ("UPCOMING_HORIZON_DAYS", "14"),
            ("DEFAULT_TZ_OFFSET_MINUTES", "-180"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(!config.allows_any_origin());
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.tasks.upcoming_horizon_days, 14);
        assert_eq!(config.tasks.default_tz_offset_minutes, -180);
    }

    #[test]
    fn test_required_and_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "postgresql://localhost/test")])).is_err());

        let short_secret = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(short_secret.is_err());

        let bad_offset = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("DEFAULT_TZ_OFFSET_MINUTES", "900"),
        ]));
        assert!(bad_offset.is_err());

        let negative_horizon = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("UPCOMING_HORIZON_DAYS", "-1"),
        ]));
        assert!(negative_horizon.is_err());
    }

    #[test]
    fn test_offset_extremes_rejected() {
        for value in ["-2147483648", "2147483647", "-841"] {
            let result = Config::from_lookup(lookup(&[
                ("DATABASE_URL", "postgresql://localhost/test"),
                ("JWT_SECRET", SECRET),
                ("DEFAULT_TZ_OFFSET_MINUTES", value),
            ]));
            assert!(result.is_err(), "offset {} should be rejected", value);
        }
    }

    #[test]
    fn test_notification_channels() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", " smtp.example.com "),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", "hunter2"),
            ("PUSH_ENABLED", "TRUE"),
        ]))
        .unwrap();

        let email = config.notifications.email.unwrap();
        assert_eq!(email.smtp_host, "smtp.example.com");
        assert_eq!(email.smtp_port, 2525);
        assert_eq!(email.from_address, DEFAULT_FROM_ADDRESS);
        assert_eq!(email.smtp_user.as_deref(), Some("mailer"));

        let push = config.notifications.push.unwrap();
        assert_eq!(push.endpoint, taskdeck_shared::notify::push::DEFAULT_PUSH_ENDPOINT);
    }

    #[test]
    fn test_blank_smtp_host_disables_email() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", "  "),
            ("PUSH_ENABLED", "0"),
        ]))
        .unwrap();

        assert!(config.notifications.email.is_none());
        assert!(config.notifications.push.is_none());
    }

    #[test]
    fn test_invalid_notification_settings() {
        let base = [
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ];
        let invalid: &[&[(&str, &str)]] = &[
            &[("SMTP_HOST", "smtp.example.com"), ("SMTP_PORT", "smtp")],
            &[("SMTP_HOST", "smtp.example.com"), ("SMTP_USER", "mailer")],
            &[("SMTP_HOST", "smtp.example.com"), ("SMTP_FROM", "not a mailbox")],
            &[("PUSH_ENABLED", "maybe")],
            &[("PUSH_ENABLED", "true"), ("PUSH_ENDPOINT", "exp.host/push")],
        ];

        for extra in invalid {
            let pairs: Vec<(&str, &str)> = base.iter().chain(extra.iter()).copied().collect();
            assert!(Config::from_lookup(lookup(&pairs)).is_err(), "{:?} should be rejected", extra);
        }
    }
}
