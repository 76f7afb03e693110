//! Bearer token acquisition and background refresh.
//!
//! The speech service accepts a short-lived bearer token (valid for 10 minutes)
//! that is obtained by POSTing the subscription key to a regional token endpoint.
//! This module provides:
//! - `TokenIssuer`: the seam that produces a fresh token (HTTP in production)
//! - `TokenManager`: holds the current `Credential` and replaces it wholesale
//! - `RefreshHandle`: controls the single background task that keeps the token fresh
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use azure_tts_common::auth::{HttpTokenIssuer, TokenManager, DEFAULT_REFRESH_INTERVAL};
//!
//! # async fn run() -> Result<(), azure_tts_common::AuthError> {
//! let issuer = HttpTokenIssuer::new(
//!     "https://westus2.api.cognitive.microsoft.com/sts/v1.0/issueToken",
//!     std::env::var("AZUREKEY").unwrap_or_default(),
//! );
//! let manager = Arc::new(TokenManager::new(Arc::new(issuer)).await?);
//! let refresher = manager.start_refresher(DEFAULT_REFRESH_INTERVAL);
//!
//! let token = manager.token().await;
//! # let _ = token;
//!
//! // Required cleanup: stop the background task.
//! refresher.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::AuthError;

/// Header carrying the subscription key on token requests.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// How long a token request may take before it is abandoned.
pub const TOKEN_REFRESH_TIMEOUT: Duration = Duration::from_secs(15);

/// Refresh cadence, kept below the provider's 10 minute token lifetime.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(9 * 60);

/// A bearer token and the time it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    acquired_at: SystemTime,
}

impl Credential {
    /// Wrap a freshly issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            acquired_at: SystemTime::now(),
        }
    }

    /// The raw token string.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token was stored.
    pub fn acquired_at(&self) -> SystemTime {
        self.acquired_at
    }

    /// Time elapsed since the token was stored.
    pub fn age(&self) -> Duration {
        self.acquired_at.elapsed().unwrap_or_default()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Source of fresh bearer tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Obtain a new token.
    async fn issue(&self) -> Result<String, AuthError>;
}

/// Issues tokens by exchanging the subscription key at the token endpoint.
pub struct HttpTokenIssuer {
    http: reqwest::Client,
    endpoint: String,
    subscription_key: String,
}

impl HttpTokenIssuer {
    /// Create an issuer with its own HTTP client.
    pub fn new(endpoint: impl Into<String>, subscription_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, subscription_key)
    }

    /// Create an issuer sharing an existing HTTP client.
    pub fn with_client(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            subscription_key: subscription_key.into(),
        }
    }

    /// The token endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTokenIssuer")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    #[instrument(level = "debug", name = "issue_token", skip(self), fields(endpoint = %self.endpoint))]
    async fn issue(&self) -> Result<String, AuthError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .body("")
            .timeout(TOKEN_REFRESH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::request(&self.endpoint, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(status = status.as_u16(), "Token endpoint rejected request");
            return Err(AuthError::unexpected_status(&self.endpoint, status.as_u16()));
        }

        let token = response
            .text()
            .await
            .map_err(|e| AuthError::request(&self.endpoint, e.to_string()))?;

        debug!("Token obtained successfully");
        Ok(token)
    }
}

/// Holds the current credential and refreshes it on demand.
///
/// The credential is replaced wholesale, so readers always see one complete
/// token. There is no ordering between a refresh and requests already using
/// the previous token.
pub struct TokenManager {
    issuer: Arc<dyn TokenIssuer>,
    current: RwLock<Arc<Credential>>,
}

impl TokenManager {
    /// Create a manager and perform the initial token fetch.
    ///
    /// # Errors
    ///
    /// Returns the issuer's error if the first token cannot be obtained; no
    /// manager is created in that case.
    #[instrument(level = "debug", name = "token_manager_new", skip_all)]
    pub async fn new(issuer: Arc<dyn TokenIssuer>) -> Result<Self, AuthError> {
        let token = issuer.issue().await?;
        info!("Initial bearer token acquired");

        Ok(Self {
            issuer,
            current: RwLock::new(Arc::new(Credential::new(token))),
        })
    }

    /// Fetch a new token and publish it.
    ///
    /// On failure the previous credential stays in place.
    pub async fn acquire(&self) -> Result<Arc<Credential>, AuthError> {
        let token = self.issuer.issue().await?;
        let credential = Arc::new(Credential::new(token));
        *self.current.write().await = Arc::clone(&credential);
        debug!("Bearer token replaced");
        Ok(credential)
    }

    /// The latest credential.
    pub async fn credential(&self) -> Arc<Credential> {
        Arc::clone(&*self.current.read().await)
    }

    /// The latest token string.
    pub async fn token(&self) -> String {
        self.current.read().await.token().to_string()
    }

    /// Start the background refresh loop.
    ///
    /// The first refresh happens one `interval` after this call. Failures are
    /// logged and retried on the next tick; they never stop the loop.
    ///
    /// A zero `interval` falls back to [`DEFAULT_REFRESH_INTERVAL`].
    ///
    /// The returned handle must be shut down (or dropped) to stop the task.
    pub fn start_refresher(self: &Arc<Self>, interval: Duration) -> RefreshHandle {
        let interval = if interval.is_zero() {
            warn!(
                fallback_secs = DEFAULT_REFRESH_INTERVAL.as_secs(),
                "Zero refresh interval, using default"
            );
            DEFAULT_REFRESH_INTERVAL
        } else {
            interval
        };
        let cancel = CancellationToken::new();
        let task = tokio::spawn(refresh_loop(Arc::clone(self), interval, cancel.clone()));
        info!(interval_secs = interval.as_secs(), "Token refresher started");
        RefreshHandle { cancel, task }
    }
}

async fn refresh_loop(manager: Arc<TokenManager>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    result = manager.acquire() => {
                        if let Err(e) = result {
                            warn!(error = %e, "Failed to refresh token, keeping previous token");
                        }
                    }
                }
            }
        }
    }

    info!("Token refresher stopped");
}

/// Control handle for the background refresh task.
///
/// Stopping is permanent; there is no restart. Dropping the handle stops the
/// task as well.
#[derive(Debug)]
pub struct RefreshHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal the loop to stop. Idempotent.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether a stop has been signalled.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "Token refresher task ended abnormally");
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_format() {
        let credential = Credential::new("SYS49152");
        assert_eq!(credential.bearer(), "Bearer SYS49152");
        assert_eq!(credential.token(), "SYS49152");
    }

    #[test]
    fn test_credential_age_is_small_when_fresh() {
        let credential = Credential::new("t");
        assert!(credential.age() < Duration::from_secs(5));
    }

    #[test]
    fn test_refresh_interval_below_token_lifetime() {
        assert!(DEFAULT_REFRESH_INTERVAL < Duration::from_secs(10 * 60));
    }

    #[test]
    fn test_issuer_debug_hides_key() {
        let issuer = HttpTokenIssuer::new("https://token.invalid", "secret-key");
        let debug_str = format!("{:?}", issuer);
        assert!(debug_str.contains("token.invalid"));
        assert!(!debug_str.contains("secret-key"));
    }
}
