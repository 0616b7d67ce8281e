use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use switchboard_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const MIN_WORKER_SHARED_SECRET_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    File { data_dir: PathBuf },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSuggesterConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSuggesterConfig {
    Heuristic,
    Http(HttpSuggesterConfig),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub storage_backend: StorageBackendConfig,
    pub worker_shared_secret: String,
    pub component_suggester: ComponentSuggesterConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        Url::parse(frontend_url.as_str())
            .map_err(|error| AppError::Validation(format!("invalid FRONTEND_URL: {error}")))?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "file".to_owned())
            .as_str()
        {
            "file" => StorageBackendConfig::File {
                data_dir: env::var("DATA_DIR")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .map_or_else(|| PathBuf::from("./data"), PathBuf::from),
            },
            "memory" => StorageBackendConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'file' or 'memory', got '{other}'"
                )));
            }
        };

        let worker_shared_secret = required_non_empty_env("WORKER_SHARED_SECRET")?;
        if worker_shared_secret.len() < MIN_WORKER_SHARED_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "WORKER_SHARED_SECRET must be at least {MIN_WORKER_SHARED_SECRET_LENGTH} characters"
            )));
        }

        let component_suggester = match env::var("COMPONENT_SUGGESTER")
            .unwrap_or_else(|_| "heuristic".to_owned())
            .as_str()
        {
            "heuristic" => ComponentSuggesterConfig::Heuristic,
            "http" => {
                let endpoint = required_non_empty_env("COMPONENT_SUGGESTER_URL")?;
                ComponentSuggesterConfig::Http(HttpSuggesterConfig {
                    endpoint: Url::parse(endpoint.as_str()).map_err(|error| {
                        AppError::Validation(format!("invalid COMPONENT_SUGGESTER_URL: {error}"))
                    })?,
                    api_key: required_non_empty_env("COMPONENT_SUGGESTER_API_KEY")?,
                    model: required_non_empty_env("COMPONENT_SUGGESTER_MODEL")?,
                })
            }
            other => {
                return Err(AppError::Validation(format!(
                    "COMPONENT_SUGGESTER must be either 'heuristic' or 'http', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_host,
            api_port,
            frontend_url: frontend_url.trim_end_matches('/').to_owned(),
            storage_backend,
            worker_shared_secret,
            component_suggester,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
