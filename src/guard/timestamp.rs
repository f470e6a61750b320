//! Timestamp freshness check

use tracing::warn;

use super::{RequestGuard, HEADER_SHOPBACK_TIMESTAMP};
use crate::error::BadRequestError;
use crate::filter::Request;

impl RequestGuard {
    /// Require a millisecond timestamp header strictly inside the window around now
    pub fn check_timestamp(&self, req: &Request) -> Result<(), BadRequestError> {
        let now = self.clock.now_millis();
        let window = self.config.timestamp_window_ms;

        let fresh = req
            .header(HEADER_SHOPBACK_TIMESTAMP)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .is_some_and(|ts| {
                now.saturating_sub(window) < ts && ts < now.saturating_add(window)
            });

        if !fresh {
            warn!(
                timestamp = ?req.header(HEADER_SHOPBACK_TIMESTAMP),
                now,
                "Timestamp check failed"
            );
            return Err(BadRequestError::new(
                "check x-shopback-timestamp should be present and time stamp is out of date",
            ));
        }

        Ok(())
    }
}
