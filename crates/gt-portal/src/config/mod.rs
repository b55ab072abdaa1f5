use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the portal.
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

/// Top-level configuration for the portal and the hero image organizer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteConfig,
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

        let static_dir = env::var("APP_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        let gallery_dir =
            env::var("APP_GALLERY_DIR").unwrap_or_else(|_| "images/cidades".to_string());
        let hero_dir = env::var("APP_HERO_DIR").unwrap_or_else(|_| "images/paraiba".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            site: SiteConfig::new(static_dir, gallery_dir, hero_dir)?,
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

/// Where the site keeps its static assets.
///
/// `gallery_dir` and `hero_dir` are always relative to `static_dir`: the
/// gallery feeds the random page heroes, the hero directory receives the
/// files placed by the organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub static_dir: PathBuf,
    pub gallery_dir: PathBuf,
    pub hero_dir: PathBuf,
}

impl SiteConfig {
    pub fn new(
        static_dir: impl Into<PathBuf>,
        gallery_dir: impl Into<PathBuf>,
        hero_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let gallery_dir = gallery_dir.into();
        let hero_dir = hero_dir.into();

        if gallery_dir.is_absolute() {
            return Err(ConfigError::AbsoluteAssetDir {
                variable: "APP_GALLERY_DIR",
            });
        }
        if hero_dir.is_absolute() {
            return Err(ConfigError::AbsoluteAssetDir {
                variable: "APP_HERO_DIR",
            });
        }

        Ok(Self {
            static_dir: static_dir.into(),
            gallery_dir,
            hero_dir,
        })
    }

    pub fn gallery_path(&self) -> PathBuf {
        self.static_dir.join(&self.gallery_dir)
    }

    pub fn hero_path(&self) -> PathBuf {
        self.static_dir.join(&self.hero_dir)
    }

    pub fn static_root(&self) -> &Path {
        &self.static_dir
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    AbsoluteAssetDir { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::AbsoluteAssetDir { variable } => {
                write!(f, "{variable} must be relative to APP_STATIC_DIR")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::AbsoluteAssetDir { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
