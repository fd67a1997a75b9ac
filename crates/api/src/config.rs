use crate::auth::jwt::JwtConfig;

/// Days a trashed piece survives before the sweeper purges it, unless
/// `TRASH_RETENTION_DAYS` says otherwise.
const DEFAULT_TRASH_RETENTION_DAYS: i64 = 30;

/// Everything the server reads from the environment at startup, collected
/// once so handlers never touch `std::env` themselves.
///
/// Every knob has a development default except `JWT_SECRET`, which has to
/// be set explicitly (see [`JwtConfig::from_env`]).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins the admin frontend may call from, comma-separated in
    /// `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Base URL of the deployed site, used when composing emailed links.
    /// Stored without a trailing slash.
    pub public_base_url: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    pub trash_retention_days: i64,
    /// Where owner notifications go; `None` turns them off.
    pub admin_notify_email: Option<String>,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read the environment. Panics on malformed numeric values, which is
    /// the behavior we want at startup.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000` |
    /// | `STATIC_DIR`           | `static`                |
    /// | `TRASH_RETENTION_DAYS` | `30`                    |
    /// | `ADMIN_NOTIFY_EMAIL`   | unset (disabled)        |
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = env_or("PUBLIC_BASE_URL", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            public_base_url,
            static_dir: env_or("STATIC_DIR", "static"),
            trash_retention_days: parse_env("TRASH_RETENTION_DAYS", DEFAULT_TRASH_RETENTION_DAYS),
            admin_notify_email: std::env::var("ADMIN_NOTIFY_EMAIL")
                .ok()
                .filter(|s| !s.is_empty()),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read a numeric variable, falling back to `default` when unset and
/// panicking when set to something unparseable.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a number, got '{raw}'")),
        Err(_) => default,
    }
}
