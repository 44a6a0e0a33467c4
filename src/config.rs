// Runtime configuration, read from the environment (and an optional .env file).
//
// Nothing secret or deployment-specific is compiled in: credentials, scopes,
// bind address and the mock-mode switch all come from here.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SERVICE_NAME: &str = "Google Docs Document API";
pub const DEFAULT_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/documents",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
    #[error("Invalid bind address '{0}'")]
    InvalidAddr(String),
    #[error("Invalid port '{0}'")]
    InvalidPort(String),
    #[error(
        "USE_REAL_BACKEND is on but no credentials are set. Set GOOGLE_SERVICE_ACCOUNT_KEY, \
         GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_ACCESS_TOKEN, or set USE_REAL_BACKEND=false."
    )]
    MissingCredentials,
}

/// Where the bearer credential for Google comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    KeyFile(PathBuf),
    InlineJson(String),
    AccessToken(String),
}

/// Interactive OAuth client settings. Recognized so a deployment can keep
/// them next to the rest of its config; this service never runs the consent
/// flow itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

impl OAuthClientConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub use_real_backend: bool,
    pub credentials: Option<CredentialSource>,
    pub scopes: Vec<String>,
    pub oauth_client: OAuthClientConfig,
    pub require_auth: bool,
    pub resolve_caller_identity: bool,
    pub service_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parses configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let mut bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(bind_raw.clone()))?;
        if let Some(port) = get("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
            bind_addr.set_port(port);
        }

        let use_real_backend = parse_bool("USE_REAL_BACKEND", get("USE_REAL_BACKEND"), true)?;
        let require_auth = parse_bool("REQUIRE_AUTH", get("REQUIRE_AUTH"), false)?;
        let resolve_caller_identity = parse_bool(
            "RESOLVE_CALLER_IDENTITY",
            get("RESOLVE_CALLER_IDENTITY"),
            false,
        )?;

        let credentials = if let Some(path) = get("GOOGLE_SERVICE_ACCOUNT_KEY") {
            Some(CredentialSource::KeyFile(PathBuf::from(path)))
        } else if let Some(json) = get("GOOGLE_SERVICE_ACCOUNT_JSON") {
            Some(CredentialSource::InlineJson(json))
        } else {
            get("GOOGLE_ACCESS_TOKEN").map(CredentialSource::AccessToken)
        };

        if use_real_backend && credentials.is_none() {
            return Err(ConfigError::MissingCredentials);
        }

        let scopes = match get("GOOGLE_SCOPES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            use_real_backend,
            credentials,
            scopes,
            oauth_client: OAuthClientConfig {
                client_id: get("GOOGLE_OAUTH_CLIENT_ID"),
                client_secret: get("GOOGLE_OAUTH_CLIENT_SECRET"),
                redirect_uri: get("GOOGLE_OAUTH_REDIRECT_URI"),
            },
            require_auth,
            resolve_caller_identity,
            service_name: get("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        })
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool { key, value: v }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn mock_mode_needs_no_credentials() {
        let config = config_from(&[("USE_REAL_BACKEND", "false")]).unwrap();

        assert!(!config.use_real_backend);
        assert_eq!(config.credentials, None);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.scopes.len(), 2);
        assert!(!config.require_auth);
        assert!(!config.resolve_caller_identity);
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert!(!config.oauth_client.is_configured());
    }

    #[test]
    fn real_backend_without_credentials_is_an_error() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::MissingCredentials)
        ));
        assert!(matches!(
            config_from(&[("GOOGLE_ACCESS_TOKEN", "  ")]),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn key_file_takes_precedence() {
        let config = config_from(&[
            ("GOOGLE_ACCESS_TOKEN", "ya29.token"),
            ("GOOGLE_SERVICE_ACCOUNT_JSON", "{}"),
            ("GOOGLE_SERVICE_ACCOUNT_KEY", "/secrets/key.json"),
        ])
        .unwrap();

        assert_eq!(
            config.credentials,
            Some(CredentialSource::KeyFile(PathBuf::from("/secrets/key.json")))
        );

        let config = config_from(&[("GOOGLE_ACCESS_TOKEN", "ya29.token")]).unwrap();
        assert_eq!(
            config.credentials,
            Some(CredentialSource::AccessToken("ya29.token".to_string()))
        );
    }

    #[test]
    fn port_overrides_bind_address_port() {
        let config = config_from(&[
            ("USE_REAL_BACKEND", "false"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("PORT", "3001"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");

        assert!(matches!(
            config_from(&[("USE_REAL_BACKEND", "false"), ("PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn scopes_are_comma_separated() {
        let config = config_from(&[
            ("USE_REAL_BACKEND", "false"),
            ("GOOGLE_SCOPES", "a, b,,c "),
        ])
        .unwrap();
        assert_eq!(config.scopes, vec!["a", "b", "c"]);
    }

    #[test]
    fn booleans_are_strict() {
        let err = config_from(&[("USE_REAL_BACKEND", "maybe")]).unwrap_err();
        assert_eq!(err.to_string(), "USE_REAL_BACKEND must be true or false, got 'maybe'");

        let config = config_from(&[
            ("USE_REAL_BACKEND", "OFF"),
            ("REQUIRE_AUTH", "1"),
            ("RESOLVE_CALLER_IDENTITY", "yes"),
        ])
        .unwrap();
        assert!(config.require_auth);
        assert!(config.resolve_caller_identity);
    }

    #[test]
    fn oauth_client_settings_are_recognized() {
        let config = config_from(&[
            ("USE_REAL_BACKEND", "false"),
            ("GOOGLE_OAUTH_CLIENT_ID", "id"),
            ("GOOGLE_OAUTH_CLIENT_SECRET", "secret"),
            ("GOOGLE_OAUTH_REDIRECT_URI", "http://localhost:3001/callback"),
        ])
        .unwrap();

        assert!(config.oauth_client.is_configured());
        assert_eq!(
            config.oauth_client.redirect_uri.as_deref(),
            Some("http://localhost:3001/callback")
        );
    }
}
