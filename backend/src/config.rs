use std::{net::SocketAddr, path::PathBuf};

use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_file: String,
    pub public_dir: PathBuf,
    pub session_secure: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 37373)),
            database_file: "real-estate.db".into(),
            public_dir: PathBuf::from("./frontend/public"),
            session_secure: false,
            log_filter: "info,tower_http=info".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Config::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(addr) = var("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|_| Error::Config(format!("BIND_ADDR is not a socket address: {addr}")))?;
        }
        if let Some(file) = var("DATABASE_FILE") {
            if file.trim().is_empty() {
                return Err(Error::Config("DATABASE_FILE is empty".into()));
            }
            config.database_file = file;
        }
        if let Some(dir) = var("PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }
        if let Some(flag) = var("SESSION_SECURE") {
            config.session_secure = match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(Error::Config(format!(
                        "SESSION_SECURE must be a boolean, got {other}"
                    )));
                }
            };
        }
        if let Some(filter) = var("RUST_LOG") {
            EnvFilter::try_new(&filter)
                .map_err(|err| Error::Config(format!("RUST_LOG is not a valid filter: {err}")))?;
            config.log_filter = filter;
        }

        Ok(config)
    }
}
