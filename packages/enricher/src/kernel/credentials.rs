//! The OMDb key and the Trends session cookie, and where the cookie comes from.
//!
//! Both are held in `secrecy` boxes; formatting one never prints its value.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        let value: Box<str> = value.into().into_boxed_str();
        Self(SecretBox::new(value))
    }

    /// Plain value, for handing to an API client.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString").field(&REDACTED).finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Source of the opaque session credential the Trends API requires.
///
/// Failure here is fatal for a run: no title is processed without it.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn acquire(&self) -> Result<SecretString>;
}

/// A credential supplied up front (environment, cache).
pub struct StaticCredential(SecretString);

impl StaticCredential {
    pub fn new(value: impl Into<SecretString>) -> Self {
        Self(value.into())
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn acquire(&self) -> Result<SecretString> {
        if self.0.is_blank() {
            bail!("configured Trends session cookie is empty");
        }
        Ok(self.0.clone())
    }
}

/// Requests the Trends landing page and keeps the `NID` cookie it sets.
pub struct TrendsCookieProvider {
    base_url: String,
}

impl TrendsCookieProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for TrendsCookieProvider {
    async fn acquire(&self) -> Result<SecretString> {
        tracing::info!(base_url = %self.base_url, "Requesting Trends session cookie");

        let cookie = trends_client::fetch_session_cookie(&self.base_url)
            .await
            .context("Failed to retrieve NID cookie")?;

        Ok(SecretString::new(cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn secrets_are_redacted() {
        let secret = SecretString::new("511=abc");
        assert_eq!(format!("{:?}", secret), "SecretString(\"[REDACTED]\")");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "511=abc");
    }

    #[tokio::test]
    async fn static_credential_rejects_blank_values() {
        assert!(StaticCredential::new("  ").acquire().await.is_err());

        let cookie = StaticCredential::new("511=abc").acquire().await.unwrap();
        assert_eq!(cookie.expose(), "511=abc");
    }

    #[tokio::test]
    async fn cookie_provider_reads_set_cookie() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "NID=511=xyz; path=/"))
            .mount(&server)
            .await;

        let cookie = TrendsCookieProvider::new(server.uri()).acquire().await.unwrap();
        assert_eq!(cookie.expose(), "511=xyz");
    }

    #[tokio::test]
    async fn cookie_provider_fails_without_cookie() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(TrendsCookieProvider::new(server.uri()).acquire().await.is_err());
    }
}
