use super::{DirectoryError, DirectoryResult};
use rand::Rng;
use std::ops::Range;
use std::time::Duration;

/// Transport simulation in front of every directory operation: one round
/// trip costs one delay and one independent chance of transient failure.
#[async_trait::async_trait]
pub trait Link: Send + Sync {
    async fn transfer(&self) -> DirectoryResult<()>;
}

/// Sleeps for a uniformly random duration, then fails with the configured
/// probability. Failures are independent per call, never sticky.
pub struct FlakyLink {
    delay_ms: Range<u64>,
    failure_rate: f32,
}

impl FlakyLink {
    pub fn new(delay_ms: Range<u64>, failure_rate: f32) -> Self {
        Self { delay_ms, failure_rate }
    }
}

#[async_trait::async_trait]
impl Link for FlakyLink {
    async fn transfer(&self) -> DirectoryResult<()> {
        if !self.delay_ms.is_empty() {
            let wait = rand::rng().random_range(self.delay_ms.clone());
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }

        if rand::rng().random::<f32>() < self.failure_rate {
            tracing::debug!("simulated transfer failed");
            return Err(DirectoryError::NotAvailable);
        }

        Ok(())
    }
}

/// No delay, no failures. Used by tests and the demo binary's `--instant`
/// mode.
pub struct InstantLink;

#[async_trait::async_trait]
impl Link for InstantLink {
    async fn transfer(&self) -> DirectoryResult<()> {
        Ok(())
    }
}
