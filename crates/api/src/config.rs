//! Per-service configuration loaded from environment variables.
//!
//! Required variables fail fast with the full list of missing names;
//! malformed numeric values warn and fall back to their default.

/// A required environment variable is missing or blank.
#[derive(Debug, thiserror::Error)]
#[error("Missing required environment variables: {0}")]
pub struct ConfigError(pub String);

/// Read an env var, trimming and treating blank as unset.
pub(crate) fn trimmed_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match trimmed_env(name) {
        Some(value) => value,
        None => {
            missing.push(name);
            String::new()
        }
    }
}

/// Parse a positive integer env var, warning and falling back on
/// malformed or non-positive values.
pub(crate) fn parse_int_env(name: &str, default: u64) -> u64 {
    let Some(raw) = trimmed_env(name) else {
        return default;
    };
    match raw.parse::<u64>() {
        Ok(parsed) if parsed >= 1 => parsed,
        _ => {
            tracing::warn!(%name, value = %raw, fallback = default, "invalid integer env var");
            default
        }
    }
}

fn bind_host() -> String {
    trimmed_env("HOST").unwrap_or_else(|| "0.0.0.0".to_string())
}

fn bind_port() -> u16 {
    match trimmed_env("PORT") {
        None => 8000,
        Some(raw) => raw.parse().expect("PORT must be a valid u16"),
    }
}

/// Moments service configuration.
///
/// | Env var                 | Default      |
/// |-------------------------|--------------|
/// | `HOST`                  | `0.0.0.0`    |
/// | `PORT`                  | `8000`       |
/// | `MONGO_URI`             | *(required)* |
/// | `MONGO_DB_NAME`         | *(required)* |
/// | `PHOTOSTOCK_BASE_URL`   | *(unset: media proxy disabled)* |
/// | `PHOTOSTOCK_TIMEOUT_MS` | `2000`       |
#[derive(Debug, Clone)]
pub struct MomentsConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db_name: String,
    /// Base URL of the photostock service; trailing slash stripped.
    pub photostock_base_url: Option<String>,
    pub photostock_timeout_ms: u64,
}

impl MomentsConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mongo_uri = required("MONGO_URI", &mut missing);
        let mongo_db_name = required("MONGO_DB_NAME", &mut missing);
        if !missing.is_empty() {
            return Err(ConfigError(missing.join(", ")));
        }

        Ok(Self {
            host: bind_host(),
            port: bind_port(),
            mongo_uri,
            mongo_db_name,
            photostock_base_url: trimmed_env("PHOTOSTOCK_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            photostock_timeout_ms: parse_int_env("PHOTOSTOCK_TIMEOUT_MS", 2000),
        })
    }
}

/// Carousel / photostock service configuration: bind address only; the
/// object-store settings live in [`keepsake_cloud::ObjectStoreConfig`].
#[derive(Debug, Clone)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

impl BindConfig {
    pub fn from_env() -> Self {
        Self {
            host: bind_host(),
            port: bind_port(),
        }
    }
}

/// Timeline service configuration: everything the HTML shell embeds as
/// its client config, plus the static asset directory.
///
/// | Env var                   | Default              |
/// |---------------------------|----------------------|
/// | `API_BASE_URL`            | *(empty)*            |
/// | `CARDS_LIST_PATH`         | `/api/cards`         |
/// | `CARD_BY_ID_PATH_TEMPLATE`| `/api/cards/{id}`    |
/// | `IMAGES_PATH`             | `/api/images`        |
/// | `TIMER_PATH`              | `/api/timer`         |
/// | `REQUEST_TIMEOUT_MS`      | `6000`               |
/// | `CACHE_TTL_MS`            | `45000`              |
/// | `MAX_MOMENTS`             | `500`                |
/// | `BATCH_SIZE`              | `16`                 |
/// | `MAX_RETRIES`             | `2`                  |
/// | `TIMER_SYNC_INTERVAL_MS`  | `20000`              |
/// | `STATIC_DIR`              | `static`             |
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub cards_list_path: String,
    pub card_by_id_path_template: String,
    pub images_path: String,
    pub timer_path: String,
    pub request_timeout_ms: u64,
    pub cache_ttl_ms: u64,
    pub max_moments: u64,
    pub batch_size: u64,
    pub max_retries: u64,
    pub timer_sync_interval_ms: u64,
    pub static_dir: String,
}

impl TimelineConfig {
    pub fn from_env() -> Self {
        Self {
            host: bind_host(),
            port: bind_port(),
            api_base_url: trimmed_env("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            cards_list_path: trimmed_env("CARDS_LIST_PATH")
                .unwrap_or_else(|| "/api/cards".to_string()),
            card_by_id_path_template: trimmed_env("CARD_BY_ID_PATH_TEMPLATE")
                .unwrap_or_else(|| "/api/cards/{id}".to_string()),
            images_path: trimmed_env("IMAGES_PATH").unwrap_or_else(|| "/api/images".to_string()),
            timer_path: trimmed_env("TIMER_PATH").unwrap_or_else(|| "/api/timer".to_string()),
            request_timeout_ms: parse_int_env("REQUEST_TIMEOUT_MS", 6000),
            cache_ttl_ms: parse_int_env("CACHE_TTL_MS", 45_000),
            max_moments: parse_int_env("MAX_MOMENTS", 500),
            batch_size: parse_int_env("BATCH_SIZE", 16),
            max_retries: parse_int_env("MAX_RETRIES", 2),
            timer_sync_interval_ms: parse_int_env("TIMER_SYNC_INTERVAL_MS", 20_000),
            static_dir: trimmed_env("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        }
    }
}
