//! Session token cache
//!
//! Session tokens are cached per integration with a fixed time-to-live.
//! Each integration has its own async lock, so concurrent callers wait for a
//! single login instead of each logging in. A cached token is only reused
//! when it was obtained with the same base URL and username; anything else
//! forces a fresh login.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;

use core_kernel::IntegrationId;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    fingerprint: String,
    obtained_at: Instant,
}

type Slot = Arc<AsyncMutex<Option<CachedToken>>>;

/// Per-integration session token cache
#[derive(Debug)]
pub struct SessionTokenCache {
    ttl: Duration,
    slots: Mutex<HashMap<IntegrationId, Slot>>,
}

impl SessionTokenCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, integration_id: IntegrationId) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(integration_id).or_default().clone()
    }

    /// Returns the cached token, or runs `login` and caches its result
    ///
    /// `fingerprint` identifies the credentials the token belongs to.
    /// Login failures are returned as-is and leave the slot empty.
    pub async fn get_or_login<F, Fut, E>(
        &self,
        integration_id: IntegrationId,
        fingerprint: &str,
        login: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let slot = self.slot(integration_id);
        let mut cached = slot.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.fingerprint == fingerprint && entry.obtained_at.elapsed() < self.ttl {
                return Ok(entry.token.clone());
            }
        }

        *cached = None;
        let token = login().await?;
        *cached = Some(CachedToken {
            token: token.clone(),
            fingerprint: fingerprint.to_string(),
            obtained_at: Instant::now(),
        });
        Ok(token)
    }

    /// Drops the cached token if it is still `stale_token`
    ///
    /// A token refreshed by a concurrent caller in the meantime is kept.
    pub async fn invalidate(&self, integration_id: IntegrationId, stale_token: &str) {
        let slot = self.slot(integration_id);
        let mut cached = slot.lock().await;
        if cached.as_ref().is_some_and(|entry| entry.token == stale_token) {
            *cached = None;
        }
    }
}

/// Fingerprint of the credentials a session token was obtained with
pub fn fingerprint(api_url: &str, username: &str) -> String {
    format!("{}|{}", api_url, username)
}
