use std::env;

use crate::core::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub amazon: AmazonConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_size: usize,
}

/// Amazon S3 storage configuration for media files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmazonConfig {
    /// Access key id for authentication
    pub access_key_id: String,
    /// Secret access key for authentication
    pub secret_access_key: String,
    /// Bucket that holds every media object
    pub container_name: String,
    /// AWS region code, e.g. "eu-west-1"
    pub region: String,
    /// Whether public media URLs use https
    pub use_https: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            amazon: AmazonConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| AppError::Config("MAX_UPLOAD_SIZE must be a valid number".to_string()))?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AmazonConfig {
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Credentials and the container name are required. An unset or empty
    /// `AMAZON_REGION` falls back to [`Self::DEFAULT_REGION`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{} environment variable is required", key)))
        };

        let access_key_id = required("AMAZON_ACCESS_KEY_ID")?;
        let secret_access_key = required("AMAZON_SECRET_ACCESS_KEY")?;
        let container_name = required("AMAZON_CONTAINER_NAME")?;

        let region = lookup("AMAZON_REGION")
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_REGION.to_string());

        let use_https = match lookup("S3_USE_HTTPS") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("S3_USE_HTTPS must be a boolean, got '{}'", raw))
            })?,
            None => false,
        };

        Ok(Self {
            access_key_id,
            secret_access_key,
            container_name,
            region,
            use_https,
        })
    }

    /// Hostname of the S3 endpoint serving this region.
    ///
    /// `us-east-1` is served from the global `s3.amazonaws.com` host, every
    /// other region from `s3-{region}.amazonaws.com`.
    pub fn endpoint(&self) -> String {
        if self.region == Self::DEFAULT_REGION {
            "s3.amazonaws.com".to_string()
        } else {
            format!("s3-{}.amazonaws.com", self.region)
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
