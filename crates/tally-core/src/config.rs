use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub cors_origins: Vec<String>,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Config {
    /// Resolve configuration from `TALLY_*` environment variables, once at
    /// startup. Only an unparseable port is an error; everything else falls
    /// back to a default.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("TALLY_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("TALLY_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            cors_origins: std::env::var("TALLY_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            environment: match std::env::var("TALLY_ENV").unwrap_or_default().as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
        })
    }

    /// Location of the durable visit log inside the data directory.
    pub fn visits_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("visits.json")
    }
}
