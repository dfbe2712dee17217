//! Configuration loading and resolution.
//!
//! Every setting resolves as explicit flag > environment variable > default.
//! Empty environment values count as unset.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use dokianime::DEFAULT_ORIGIN;

/// All interfaces, so a host that only sets `PORT` can reach the server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DOCUMENTS_DIR: &str = ".";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "DOKIANIME_HOST";
pub const ENV_DOCUMENTS: &str = "DOKIANIME_DOCUMENTS";
pub const ENV_PUBLIC: &str = "DOKIANIME_PUBLIC";
pub const ENV_ORIGIN: &str = "DOKIANIME_ORIGIN";

/// Errors in the resolved configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port '{0}' in PORT")]
    InvalidPort(String),

    #[error("Invalid host '{0}': expected an IP address")]
    InvalidHost(String),

    #[error("Invalid origin '{0}': expected an http:// or https:// URL")]
    InvalidOrigin(String),
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub documents_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub origin: Option<String>,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the HTML snapshots.
    pub documents_dir: PathBuf,
    /// Directory served verbatim for non-API paths.
    pub public_dir: PathBuf,
    /// Base origin prepended to scraped relative links.
    pub origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(overrides: &ConfigOverrides, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match overrides.port {
            Some(port) => port,
            None => match env(ENV_PORT) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
                None => defaults.port,
            },
        };

        let host = overrides
            .host
            .clone()
            .or_else(|| env(ENV_HOST))
            .unwrap_or(defaults.host);
        host.parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host.clone()))?;

        let origin = overrides
            .origin
            .clone()
            .or_else(|| env(ENV_ORIGIN))
            .unwrap_or(defaults.origin);
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::InvalidOrigin(origin));
        }

        Ok(Self {
            host,
            port,
            documents_dir: overrides
                .documents_dir
                .clone()
                .or_else(|| env(ENV_DOCUMENTS).map(PathBuf::from))
                .unwrap_or(defaults.documents_dir),
            public_dir: overrides
                .public_dir
                .clone()
                .or_else(|| env(ENV_PUBLIC).map(PathBuf::from))
                .unwrap_or(defaults.public_dir),
            origin,
        })
    }

    /// Socket address to listen on.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
