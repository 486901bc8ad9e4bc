use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

/// Session scratch-space settings for the submission wizard
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long an abandoned draft survives before expiry
    pub ttl_secs: u64,
    /// Interval for the expired-row sweeper
    pub sweep_interval_secs: u64,
}

/// Local media storage for uploaded report photos
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub media_root: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            session: SessionConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(AppConfig {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|e| format!("Invalid {}: {}", name, e))
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(DatabaseConfig {
            url,
            max_connections: env_u64("DATABASE_MAX_CONNECTIONS", 10)? as u32,
            min_connections: env_u64("DATABASE_MIN_CONNECTIONS", 1)? as u32,
            acquire_timeout_secs: env_u64("DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?,
            idle_timeout_secs: env_u64("DATABASE_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime_secs: env_u64("DATABASE_MAX_LIFETIME_SECS", 1800)?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let issuer = env::var("AUTH_ISSUER").map_err(|_| "AUTH_ISSUER must be set".to_string())?;
        let audience =
            env::var("AUTH_AUDIENCE").map_err(|_| "AUTH_AUDIENCE must be set".to_string())?;

        Ok(AuthConfig {
            issuer,
            audience,
            jwks_cache_ttl: Duration::from_secs(env_u64("AUTH_JWKS_CACHE_TTL_SECS", 3600)?),
            jwt_leeway: Duration::from_secs(env_u64("AUTH_JWT_LEEWAY_SECS", 30)?),
        })
    }
}

impl SessionConfig {
    /// Default draft lifetime: 2 hours
    const DEFAULT_TTL_SECS: u64 = 7200;
    /// Default sweep interval: 15 minutes
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 900;

    pub fn from_env() -> Result<Self, String> {
        Ok(SessionConfig {
            ttl_secs: env_u64("SESSION_TTL_SECS", Self::DEFAULT_TTL_SECS)?,
            sweep_interval_secs: env_u64(
                "SESSION_SWEEP_INTERVAL_SECS",
                Self::DEFAULT_SWEEP_INTERVAL_SECS,
            )?,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let media_root = env::var("STORAGE_MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        Ok(StorageConfig { media_root })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        SwaggerConfig {
            title: env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Machirepo Core API".to_string()),
            version: env::var("SWAGGER_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            description: env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
                "Municipal issue-reporting API: photo report submissions and staff triage"
                    .to_string()
            }),
        }
    }
}
