//! Webhook rate limiting.

use crate::error::BotError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};
use tracing::warn;

/// Quota shared by every caller of the webhook.
#[derive(Clone)]
pub struct WebhookRateLimit(Arc<DefaultDirectRateLimiter>);

impl WebhookRateLimit {
    /// Zero is treated as one request per minute.
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self(Arc::new(RateLimiter::direct(quota)))
    }

    fn check(&self) -> Result<(), BotError> {
        self.0.check().map_err(|_| {
            warn!("Webhook rate limit exceeded");
            BotError::RateLimitExceeded
        })
    }
}

/// Reject with 429 once the quota is used up.
pub async fn limit_webhook(
    State(limit): State<WebhookRateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, BotError> {
    limit.check()?;
    Ok(next.run(request).await)
}
