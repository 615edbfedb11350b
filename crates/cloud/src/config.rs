//! Object-store configuration from environment variables.

/// Connection settings for the S3-compatible bucket.
///
/// | Env var               | Default      |
/// |-----------------------|--------------|
/// | `S3_ENDPOINT`         | *(required)* |
/// | `S3_ACCESS_KEY`       | *(required)* |
/// | `S3_SECRET_KEY`       | *(required)* |
/// | `S3_BUCKET`           | *(required)* |
/// | `S3_REGION`           | `us-east-1`  |
/// | `S3_FORCE_PATH_STYLE` | `true`       |
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    pub force_path_style: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("Missing required environment variables: {0}")]
pub struct MissingEnvVars(pub String);

impl ObjectStoreConfig {
    /// Load from the environment, failing fast with the full list of
    /// missing required variables.
    pub fn from_env() -> Result<Self, MissingEnvVars> {
        let mut missing = Vec::new();
        let endpoint = required("S3_ENDPOINT", &mut missing);
        let access_key = required("S3_ACCESS_KEY", &mut missing);
        let secret_key = required("S3_SECRET_KEY", &mut missing);
        let bucket = required("S3_BUCKET", &mut missing);

        if !missing.is_empty() {
            return Err(MissingEnvVars(missing.join(", ")));
        }

        let region = match trimmed_env("S3_REGION") {
            Some(region) => region,
            None => "us-east-1".to_string(),
        };
        let force_path_style = bool_env("S3_FORCE_PATH_STYLE", true);

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            force_path_style,
        })
    }
}

fn trimmed_env(name: &str) -> Option<String> {
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

fn bool_env(name: &str, default: bool) -> bool {
    match trimmed_env(name).as_deref().map(str::to_lowercase).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}
