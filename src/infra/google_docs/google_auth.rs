// =============================================================================
// BEARER CREDENTIALS FOR GOOGLE APIS
// =============================================================================
//
// The store only needs "a bearer token that Docs and Drive will accept".
// Two sources are supported:
//
// 1. **Service account** (recommended for servers):
//    - Key file path in `GOOGLE_SERVICE_ACCOUNT_KEY`, or the JSON itself in
//      `GOOGLE_SERVICE_ACCOUNT_JSON`
//    - A signed JWT is exchanged for an access token at the key's `token_uri`
//    - Documents the service account creates live in its own Drive
//
// 2. **Static access token** (`GOOGLE_ACCESS_TOKEN`):
//    - A token obtained elsewhere, e.g. by an interactive OAuth consent flow
//    - Used verbatim; when it expires the store calls start failing

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

/// Tokens are refreshed this long before Google says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// JWT lifetime; Google caps it at one hour.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to read service account key: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),
    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token exchange failed ({status}): {body}")]
    Exchange { status: u16, body: String },
    #[error("System clock is before the Unix epoch")]
    Clock(#[from] std::time::SystemTimeError),
}

/// Anything that can hand out a bearer token.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

// =============================================================================
// SERVICE ACCOUNT
// =============================================================================

/// The fields we need from a service account JSON key.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountCredentials {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// JWT claims for the jwt-bearer grant.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Exchanges signed service-account assertions for access tokens and caches
/// the result until shortly before it expires.
pub struct ServiceAccountAuth {
    credentials: ServiceAccountCredentials,
    scopes: Vec<String>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Loads the key from a JSON key file.
    pub async fn from_file(path: &Path, scopes: Vec<String>) -> Result<Self, AuthError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content, scopes)
    }

    /// Loads the key from JSON content.
    pub fn from_json(json: &str, scopes: Vec<String>) -> Result<Self, AuthError> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(json)?;
        Ok(Self {
            credentials,
            scopes,
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    fn claims(&self, now: u64) -> JwtClaims {
        JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.credentials.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    async fn fetch_new_token(&self) -> Result<CachedToken, AuthError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &self.claims(now), &key)?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(AuthError::Exchange { status, body });
        }

        let token_response: TokenResponse = response.json().await?;
        tracing::debug!(
            "Obtained access token for {} (expires in {}s)",
            self.credentials.client_email,
            token_response.expires_in
        );

        Ok(CachedToken {
            token: token_response.access_token,
            expires_at: SystemTime::now() + Duration::from_secs(token_response.expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + EXPIRY_MARGIN {
                    return Ok(token.token.clone());
                }
            }
        }

        let fresh = self.fetch_new_token().await?;
        let token = fresh.token.clone();

        let mut cached = self.cached_token.write().await;
        *cached = Some(fresh);

        Ok(token)
    }
}

// =============================================================================
// STATIC TOKEN
// =============================================================================

pub struct StaticAccessToken(String);

impl StaticAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticAccessToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}
