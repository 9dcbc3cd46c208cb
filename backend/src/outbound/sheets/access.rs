//! Access tokens for the Sheets API, cached per credential.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::debug;

use super::SheetsError;
use super::credentials::{Credential, CredentialChain, EXPIRY_MARGIN_SECS, OAuthToken};
use super::oauth::GoogleOAuth;
use super::service_account::ServiceAccountExchange;

#[derive(Debug, Clone)]
struct CachedToken {
    key: String,
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn usable_for(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.key == key
            && self
                .expires_at
                .is_none_or(|at| at - Duration::seconds(EXPIRY_MARGIN_SECS) > now)
    }
}

/// Resolves a credential on each call and hands out a bearer token for it.
///
/// Tokens are reused until one minute before expiry, or until the chain
/// starts yielding a different credential.
pub struct AccessTokenSource {
    chain: CredentialChain,
    exchange: ServiceAccountExchange,
    oauth: Option<GoogleOAuth>,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<CachedToken>>,
}

impl AccessTokenSource {
    /// Token source trying `chain` in order, refreshing through `oauth`.
    pub fn new(
        chain: CredentialChain,
        exchange: ServiceAccountExchange,
        oauth: Option<GoogleOAuth>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain,
            exchange,
            oauth,
            clock,
            cache: Mutex::new(None),
        }
    }

    /// A bearer token valid for at least the next minute.
    ///
    /// # Errors
    /// [`SheetsError::NoCredentials`] when the chain is empty, otherwise any
    /// exchange or refresh failure.
    pub async fn access_token(&self) -> Result<String, SheetsError> {
        let credential = self.chain.resolve()?;
        let key = credential.cache_key();
        let now = self.clock.utc();

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref().filter(|cached| cached.usable_for(&key, now)) {
            return Ok(cached.access_token.clone());
        }

        let fresh = match credential {
            Credential::ServiceAccount(service_account) => {
                let issued = self.exchange.exchange(&service_account, now).await?;
                debug!(account = %service_account.client_email, "service-account token issued");
                CachedToken {
                    key,
                    access_token: issued.access_token,
                    expires_at: Some(issued.expires_at),
                }
            }
            Credential::OAuth(token) => {
                let current = self.current_oauth_token(token, now).await?;
                CachedToken {
                    key,
                    expires_at: current.expires_at(),
                    access_token: current.access_token,
                }
            }
        };
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }

    async fn current_oauth_token(
        &self,
        token: OAuthToken,
        now: DateTime<Utc>,
    ) -> Result<OAuthToken, SheetsError> {
        if !token.needs_refresh(now) {
            return Ok(token);
        }
        if token.refresh_token.is_none() {
            return Err(SheetsError::RefreshUnavailable);
        }
        let oauth = self.oauth.as_ref().ok_or(SheetsError::OAuthNotConfigured)?;
        let refreshed = oauth.refresh(&token, now).await?;
        debug!("OAuth access token refreshed");
        Ok(refreshed)
    }
}
