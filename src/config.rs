use std::{env, net::SocketAddr, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Invalid workshop catalog: {0}")]
    InvalidCatalog(String),
    #[error("Could not load workshop catalog {path}: {reason}")]
    CatalogFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreKind {
    Sqlite { database_url: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreKind,
    pub templates_glob: String,
    pub static_dir: PathBuf,
    pub workshops_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset, so a blank `DATABASE_URL=` fails instead of opening "".
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = match var("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: "BIND_ADDR",
                    reason: e.to_string(),
                }
            })?,
            None => {
                log::info!("BIND_ADDR not set, using default: 127.0.0.1:5000");
                SocketAddr::from(([127, 0, 0, 1], 5000))
            }
        };

        let store = match var("REVIEW_STORE").as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => {
                log::warn!("Using the in-memory review store, reviews are lost on restart");
                StoreKind::Memory
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "REVIEW_STORE",
                    reason: format!("expected \"sqlite\" or \"memory\", got \"{}\"", other),
                });
            }
        };

        Ok(Config {
            bind_addr,
            store,
            templates_glob: var("TEMPLATES_GLOB").unwrap_or_else(|| "templates/**/*.html".into()),
            static_dir: var("STATIC_DIR").unwrap_or_else(|| "static".into()).into(),
            workshops_file: var("WORKSHOPS_FILE").map(PathBuf::from),
        })
    }
}
