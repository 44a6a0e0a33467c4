// Caller identity is optional. It is only used to report who is calling
// (and, when configured, to refuse anonymous writes). Failing to resolve an
// identity is never an error at this level; the caller is just anonymous.

use async_trait::async_trait;

/// Resolves the caller's email from whatever credential the request carried.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_caller(&self, bearer_token: Option<&str>) -> Option<String>;
}

/// Every caller is anonymous.
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn resolve_caller(&self, _bearer_token: Option<&str>) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn anonymous_ignores_tokens() {
        assert_eq!(AnonymousIdentity.resolve_caller(Some("token")).await, None);
        assert_eq!(AnonymousIdentity.resolve_caller(None).await, None);
    }
}
