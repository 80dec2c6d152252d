//! Rate limiting middleware using tower-governor

use std::sync::Arc;

use axum::Router;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

use crate::config::RateLimitConfig;

/// Token replenishment interval and burst size for a per-minute budget.
///
/// 120 requests per minute refills one token every 500ms and allows a burst
/// of 120.
pub fn quota(requests_per_minute: u32) -> Option<(u64, u32)> {
    if requests_per_minute == 0 {
        return None;
    }
    let replenishment_ms = (60_000 / u64::from(requests_per_minute)).max(1);
    Some((replenishment_ms, requests_per_minute))
}

/// Wrap `router` with a per-client-IP limiter. Zero requests per minute
/// leaves the router untouched.
///
/// The key extractor reads forwarding headers first and falls back to the
/// peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn apply_rate_limit(router: Router, config: &RateLimitConfig) -> Router {
    let Some((replenishment_ms, burst_size)) = quota(config.requests_per_minute) else {
        tracing::info!("Rate limiting disabled");
        return router;
    };

    let Some(governor_conf) = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(replenishment_ms)
        .burst_size(burst_size)
        .finish()
    else {
        tracing::warn!(
            requests_per_minute = config.requests_per_minute,
            "Invalid rate limit quota, rate limiting disabled"
        );
        return router;
    };

    tracing::info!(
        requests_per_minute = config.requests_per_minute,
        "Rate limiting enabled"
    );

    router.layer(GovernorLayer {
        config: Arc::new(governor_conf),
    })
}
