//! Request pacing for batch classification.
//!
//! The public Nominatim instance allows roughly one request per second.
//! Rather than sleeping inside the geocoding strategy, [`classify_batch`]
//! asks a [`Throttle`] before every lookup. [`BatchPauseThrottle`] pauses
//! once per batch of lookups through a [`Sleeper`], which tests replace to
//! observe pauses without waiting.
//!
//! [`classify_batch`]: crate::classify_batch

use std::time::Duration;

/// Something that can wait for a duration.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Paces a sequence of lookups.
#[async_trait::async_trait]
pub trait Throttle: Send + Sync {
    /// Called before lookup `index` (0-based) of `total`.
    async fn before_lookup(&self, index: usize, total: usize);
}

/// Never waits. Used for local lookups such as the boundary strategy.
pub struct NoThrottle;

#[async_trait::async_trait]
impl Throttle for NoThrottle {
    async fn before_lookup(&self, _index: usize, _total: usize) {}
}

/// Pauses once every `batch_size` lookups.
///
/// With a batch size of 10 the pauses happen before lookups 10, 20, 30,
/// and so on; never before the first lookup.
pub struct BatchPauseThrottle<S: Sleeper = TokioSleeper> {
    batch_size: usize,
    pause: Duration,
    sleeper: S,
}

impl BatchPauseThrottle {
    /// Creates a throttle that really sleeps.
    #[must_use]
    pub const fn new(batch_size: usize, pause: Duration) -> Self {
        Self::with_sleeper(batch_size, pause, TokioSleeper)
    }
}

impl<S: Sleeper> BatchPauseThrottle<S> {
    /// Creates a throttle that waits through `sleeper`.
    #[must_use]
    pub const fn with_sleeper(batch_size: usize, pause: Duration, sleeper: S) -> Self {
        Self {
            batch_size,
            pause,
            sleeper,
        }
    }

    /// Whether lookup `index` is preceded by a pause.
    #[must_use]
    pub const fn pauses_before(&self, index: usize) -> bool {
        self.batch_size > 0 && index > 0 && index % self.batch_size == 0
    }
}

#[async_trait::async_trait]
impl<S: Sleeper> Throttle for BatchPauseThrottle<S> {
    async fn before_lookup(&self, index: usize, total: usize) {
        if self.pauses_before(index) {
            log::info!("Reverse geocoding progress: {index}/{total}");
            self.sleeper.sleep(self.pause).await;
        }
    }
}
