use std::time::Duration;

/// Runtime settings, read from the environment (and `.env` via `dotenvy`).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    /// How long a rendered index page is served from the cache.
    pub index_cache_ttl: Duration,
    /// Most rendered index pages held at once.
    pub index_cache_capacity: u64,
    /// Enables the `/admin/` endpoints when set.
    pub admin_token: Option<String>,
    pub max_concurrent_requests: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set!")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_INDEX_CACHE_TTL_SECS: u64 = 20;
const DEFAULT_INDEX_CACHE_CAPACITY: u64 = 1000;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 1024;

impl Config {
    /// Defaults for everything except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            index_cache_ttl: Duration::from_secs(DEFAULT_INDEX_CACHE_TTL_SECS),
            index_cache_capacity: DEFAULT_INDEX_CACHE_CAPACITY,
            admin_token: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let mut config = Config::new(jwt_secret);

        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = parse_var::<u64>("INDEX_CACHE_TTL_SECS")? {
            config.index_cache_ttl = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse_var("INDEX_CACHE_CAPACITY")? {
            config.index_cache_capacity = capacity;
        }
        if let Some(hours) = parse_var("TOKEN_TTL_HOURS")? {
            config.token_ttl_hours = hours;
        }
        if let Some(cost) = parse_var("BCRYPT_COST")? {
            config.bcrypt_cost = cost;
        }
        if let Some(limit) = parse_var("MAX_CONCURRENT_REQUESTS")? {
            config.max_concurrent_requests = limit;
        }
        config.admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("secret");
        assert_eq!(config.index_cache_ttl, Duration::from_secs(20));
        assert_eq!(config.index_cache_capacity, 1000);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn unset_variable_parses_to_none() {
        let parsed: Option<u64> = parse_var("BLOG_API_TEST_SURELY_UNSET").unwrap();
        assert!(parsed.is_none());
    }
}
