//! Process-wide request rate limiting
//!
//! One limiter instance is shared by every worker of a stage-run. A
//! background task ticks at the configured rate into a capacity-1 channel;
//! ticks nobody is waiting for are dropped, so an idle limiter banks at most
//! one token of burst.

use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Token source gating how often any network call may proceed
///
/// `acquire()` blocks the calling task until a token is available. Tokens are
/// replenished at a fixed rate, so no more than `requests_per_second`
/// acquisitions are granted per second across all concurrent callers,
/// independent of worker-pool size. Acquisition cannot fail, only delay.
pub struct RateLimiter {
    tokens: Mutex<mpsc::Receiver<()>>,
    ticker: JoinHandle<()>,
}

impl RateLimiter {
    /// Creates a limiter granting `requests_per_second` tokens per second
    pub fn new(requests_per_second: f64) -> Self {
        let rate = requests_per_second.max(0.001);
        let period = Duration::from_secs_f64(1.0 / rate);

        let (tx, rx) = mpsc::channel(1);
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.is_closed() {
                    break;
                }
                // A full channel means nobody is waiting; drop the tick
                let _ = tx.try_send(());
            }
        });

        Self {
            tokens: Mutex::new(rx),
            ticker,
        }
    }

    /// Waits until a token is available
    pub async fn acquire(&self) {
        // Returns None only after stop(), at which point there is nothing
        // left to gate.
        let _ = self.tokens.lock().await.recv().await;
    }

    /// Releases the underlying ticking task
    pub fn stop(&self) {
        self.ticker.abort();
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_first_token_is_immediate() {
        let limiter = RateLimiter::new(1.0);

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_acquisitions_are_paced() {
        let limiter = RateLimiter::new(20.0); // 50ms period

        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        let elapsed = start.elapsed();

        // 5 tokens at 20/sec: first immediate, four more at 50ms spacing
        assert!(
            elapsed >= Duration::from_millis(150),
            "acquired too fast: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_shared_across_tasks() {
        let limiter = Arc::new(RateLimiter::new(20.0));

        let start = Instant::now();
        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Four callers still share one token stream
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_stop_releases_ticker() {
        let limiter = RateLimiter::new(10.0);
        limiter.acquire().await;
        limiter.stop();

        // After stop the channel drains and closes; acquire must not hang
        tokio::time::timeout(Duration::from_secs(1), limiter.acquire())
            .await
            .expect("acquire hung after stop");
    }
}
