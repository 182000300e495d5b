//! Service-account authentication for Google APIs.
//!
//! Mints access tokens with the OAuth 2.0 JWT-bearer grant: a short-lived
//! RS256 assertion signed with the service account's private key is exchanged
//! at the key's `token_uri`. Tokens are cached in memory until shortly before
//! they expire.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::ServiceAccountKey;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion; Google caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// An access token together with when it stops being usable.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(access_token: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs)
                - Duration::seconds(EXPIRY_MARGIN_SECS),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Claims of the JWT-bearer assertion.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, scopes: &[String], now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: scopes.join(" "),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// Produces bearer tokens for Google APIs from a service-account key.
#[derive(Debug)]
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(
        key: ServiceAccountKey,
        scopes: Vec<String>,
        timeout: StdDuration,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            key,
            scopes,
            http_client,
            cached: RwLock::new(None),
        })
    }

    /// Returns a valid access token, minting a new one if the cache is empty
    /// or expired.
    pub async fn token(&self) -> ProviderResult<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.mint().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Signs the assertion for the current time.
    pub fn assertion(&self) -> ProviderResult<String> {
        let claims = AssertionClaims::new(&self.key, &self.scopes, Utc::now());

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes()).map_err(|e| {
            ProviderError::configuration(format!("invalid service account private key: {}", e))
        })?;

        jsonwebtoken::encode(&header, &claims, &signing_key)
            .map_err(|e| ProviderError::internal(format!("failed to sign assertion: {}", e)))
    }

    async fn mint(&self) -> ProviderResult<CachedToken> {
        let assertion = self.assertion()?;
        debug!(client_email = %self.key.client_email, "requesting service account token");

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::from_request("service account token request", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "service account token exchange failed ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        info!(expires_in = token.expires_in, "obtained service account token");
        Ok(CachedToken::new(token.access_token, token.expires_in))
    }
}
