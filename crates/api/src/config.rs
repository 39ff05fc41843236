use redress_core::lifecycle::TransitionPolicy;

use crate::auth::jwt::JwtConfig;

/// Default number of complaints in the dashboard's `recent` list.
const DEFAULT_DASHBOARD_RECENT_LIMIT: i64 = 5;

/// Default access-token lifetime (one day).
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 24 * 60;

/// Credentials for the admin account created at startup if missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Which status transitions admins may perform.
    pub transition_policy: TransitionPolicy,
    /// Size of the dashboard's `recent` list.
    pub dashboard_recent_limit: i64,
    /// Optional admin account ensured at startup.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DATABASE_URL`             | unset (in-memory store)    |
    /// | `JWT_SECRET`               | **required**               |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | `1440`                     |
    /// | `STATUS_TRANSITION_POLICY` | `unrestricted`             |
    /// | `DASHBOARD_RECENT_LIMIT`   | `5`                        |
    /// | `ADMIN_EMAIL`              | unset                      |
    /// | `ADMIN_PASSWORD`           | unset                      |
    ///
    /// # Panics
    ///
    /// Panics on any malformed value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = non_empty_var("DATABASE_URL");

        let transition_policy: TransitionPolicy = std::env::var("STATUS_TRANSITION_POLICY")
            .map(|raw| {
                raw.parse()
                    .unwrap_or_else(|e| panic!("STATUS_TRANSITION_POLICY: {e}"))
            })
            .unwrap_or_default();

        let dashboard_recent_limit: i64 = std::env::var("DASHBOARD_RECENT_LIMIT")
            .unwrap_or_else(|_| DEFAULT_DASHBOARD_RECENT_LIMIT.to_string())
            .parse()
            .expect("DASHBOARD_RECENT_LIMIT must be a valid i64");
        assert!(
            (1..=100).contains(&dashboard_recent_limit),
            "DASHBOARD_RECENT_LIMIT must be between 1 and 100"
        );

        let bootstrap_admin = match (non_empty_var("ADMIN_EMAIL"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => panic!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        let jwt = JwtConfig {
            secret: non_empty_var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_expiry_mins: std::env::var("JWT_ACCESS_EXPIRY_MINS")
                .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
        };
        assert!(
            jwt.access_token_expiry_mins > 0,
            "JWT_ACCESS_EXPIRY_MINS must be positive"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt,
            transition_policy,
            dashboard_recent_limit,
            bootstrap_admin,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
