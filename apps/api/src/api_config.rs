use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use keyward_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_ACCESS_DOCUMENT_KEY: &str = "mgr/dashboard/accessdb_v2";
const DEFAULT_TOKEN_LIFESPAN_SECONDS: i64 = 6 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStoreConfig {
    Memory,
    Redis { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrapConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub document_store: DocumentStoreConfig,
    pub access_document_key: String,
    pub token_issuer: String,
    pub access_token_lifespan_seconds: i64,
    pub admin_bootstrap: Option<AdminBootstrapConfig>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required_non_empty = |name: &str| -> Result<String, AppError> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::InvalidArgument(format!("{name} is required")))
        };

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(9969);

        let document_store = match lookup("DOCUMENT_STORE")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => DocumentStoreConfig::Memory,
            "redis" => DocumentStoreConfig::Redis {
                url: required_non_empty("REDIS_URL")?,
            },
            other => {
                return Err(AppError::InvalidArgument(format!(
                    "DOCUMENT_STORE must be either 'memory' or 'redis', got '{other}'"
                )));
            }
        };

        let access_document_key = lookup("ACCESS_DOCUMENT_KEY")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ACCESS_DOCUMENT_KEY.to_owned());
        let token_issuer = lookup("TOKEN_ISSUER")
            .unwrap_or_else(|| format!("http://localhost:{api_port}"));

        let access_token_lifespan_seconds = match lookup("ACCESS_TOKEN_LIFESPAN_SECONDS") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| {
                    AppError::InvalidArgument(format!(
                        "ACCESS_TOKEN_LIFESPAN_SECONDS must be a positive integer, got '{value}'"
                    ))
                })?,
            None => DEFAULT_TOKEN_LIFESPAN_SECONDS,
        };

        let create_admin = lookup("CREATE_ADMIN")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let admin_bootstrap = if create_admin {
            Some(AdminBootstrapConfig {
                username: required_non_empty("ADMIN_USERNAME")?,
                password: required_non_empty("ADMIN_PASSWORD")?,
            })
        } else {
            None
        };

        Ok(Self {
            api_host,
            api_port,
            document_store,
            access_document_key,
            token_issuer,
            access_token_lifespan_seconds,
            admin_bootstrap,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::InvalidArgument(format!("invalid API_HOST '{}': {error}", self.api_host))
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use keyward_core::AppError;

    use super::{AdminBootstrapConfig, ApiConfig, DocumentStoreConfig};

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() -> Result<(), AppError> {
        let config = load(&[])?;

        assert_eq!(config.api_port, 9969);
        assert_eq!(config.document_store, DocumentStoreConfig::Memory);
        assert_eq!(config.access_document_key, "mgr/dashboard/accessdb_v2");
        assert_eq!(config.token_issuer, "http://localhost:9969");
        assert_eq!(config.access_token_lifespan_seconds, 21_600);
        assert!(config.admin_bootstrap.is_none());
        assert!(config.socket_address().is_ok());
        Ok(())
    }

    #[test]
    fn redis_store_requires_url() {
        assert!(load(&[("DOCUMENT_STORE", "redis")]).is_err());
        assert!(load(&[("DOCUMENT_STORE", "etcd")]).is_err());

        let config = load(&[
            ("DOCUMENT_STORE", "redis"),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
        ]);
        assert!(config.is_ok_and(|config| matches!(
            config.document_store,
            DocumentStoreConfig::Redis { .. }
        )));
    }

    #[test]
    fn admin_bootstrap_requires_credentials() -> Result<(), AppError> {
        assert!(load(&[("CREATE_ADMIN", "true")]).is_err());

        let config = load(&[
            ("CREATE_ADMIN", "TRUE"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
        ])?;
        assert_eq!(
            config.admin_bootstrap,
            Some(AdminBootstrapConfig {
                username: "admin".to_owned(),
                password: "secret".to_owned(),
            })
        );
        Ok(())
    }

    #[test]
    fn token_lifespan_must_be_positive() {
        assert!(load(&[("ACCESS_TOKEN_LIFESPAN_SECONDS", "0")]).is_err());
        assert!(load(&[("ACCESS_TOKEN_LIFESPAN_SECONDS", "soon")]).is_err());
        assert!(load(&[("ACCESS_TOKEN_LIFESPAN_SECONDS", "60")]).is_ok());
    }

    #[test]
    fn invalid_host_is_reported() -> Result<(), AppError> {
        let config = load(&[("API_HOST", "not-an-ip")])?;
        assert!(config.socket_address().is_err());
        Ok(())
    }
}
