use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::core::identity::IdentityProvider;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
struct TokenInfo {
    #[serde(default)]
    email: Option<String>,
}

/// Looks up the email behind a Google OAuth access token.
///
/// Any failure (bad token, network, token without the email scope) is
/// logged and reported as an anonymous caller.
pub struct GoogleTokenInfoIdentity {
    client: Client,
    tokeninfo_url: String,
}

impl GoogleTokenInfoIdentity {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            tokeninfo_url: TOKENINFO_URL.to_string(),
        }
    }

    // The token goes in a form body so it never lands in a URL.
    async fn lookup(&self, token: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .post(&self.tokeninfo_url)
            .form(&[("access_token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("tokeninfo rejected caller token ({})", response.status());
            return Ok(None);
        }

        let info: TokenInfo = response.json().await?;
        Ok(info.email.filter(|e| !e.is_empty()))
    }
}

impl Default for GoogleTokenInfoIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for GoogleTokenInfoIdentity {
    async fn resolve_caller(&self, bearer_token: Option<&str>) -> Option<String> {
        let token = bearer_token.filter(|t| !t.is_empty())?;

        match self.lookup(token).await {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!("Failed to resolve caller identity: {}", e);
                None
            }
        }
    }
}
