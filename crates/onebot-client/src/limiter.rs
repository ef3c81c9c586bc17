//! Admission control for outbound calls.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::errors::CallError;

/// What happens to a call when no token is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePolicy {
    /// Park the caller until a token accrues.
    Wait,
    /// Fail the call immediately with [`CallError::RateLimited`].
    Drop,
}

/// A token bucket: burst of `capacity`, refilled continuously at
/// `refill_per_sec`.
///
/// Starts full. A zero refill rate never accrues new tokens, so
/// wait-policy callers park forever once the burst is spent.
#[derive(Debug)]
pub struct TokenBucket {
    refill_per_sec: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    updated: Instant,
}

impl TokenBucket {
    /// A full bucket.
    #[must_use]
    pub fn new(refill_per_sec: f64, capacity: u32) -> Self {
        Self {
            refill_per_sec: refill_per_sec.max(0.0),
            capacity: f64::from(capacity),
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                updated: Instant::now(),
            }),
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let accrued = now.duration_since(state.updated).as_secs_f64() * self.refill_per_sec;
        state.tokens = (state.tokens + accrued).min(self.capacity);
        state.updated = now;
    }

    /// Take a token if one is available right now.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Take a token, sleeping until one accrues.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock();
                self.refill(&mut state);
                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                if self.refill_per_sec > 0.0 {
                    Some(Duration::from_secs_f64(
                        (1.0 - state.tokens) / self.refill_per_sec,
                    ))
                } else {
                    None
                }
            };
            match wait {
                Some(wait) => tokio::time::sleep(wait).await,
                None => std::future::pending::<()>().await,
            }
        }
    }
}

/// A bucket with a policy attached, gating every outbound call.
#[derive(Debug)]
pub(crate) struct RateGate {
    policy: RatePolicy,
    bucket: TokenBucket,
}

impl RateGate {
    pub fn new(policy: RatePolicy, bucket: TokenBucket) -> Self {
        Self { policy, bucket }
    }

    /// Admit or reject one call according to the policy.
    pub async fn admit(&self) -> Result<(), CallError> {
        match self.policy {
            RatePolicy::Wait => {
                self.bucket.acquire().await;
                Ok(())
            }
            RatePolicy::Drop => {
                if self.bucket.try_acquire() {
                    Ok(())
                } else {
                    Err(CallError::RateLimited)
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn burst_is_bounded_by_capacity() {
        let bucket = TokenBucket::new(0.0, 2);
        assert!(bucket.try_acquire());
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn tokens_accrue_over_time_up_to_capacity() {
        let bucket = TokenBucket::new(1.0, 2);
        assert!(bucket.try_acquire());
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(bucket.try_acquire());

        // a long idle stretch still refills to at most two tokens
        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(bucket.try_acquire());
        assert!(bucket.try_acquire());
        assert!(!bucket.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_policy_parks_until_a_token_accrues() {
        let gate = RateGate::new(RatePolicy::Wait, TokenBucket::new(10.0, 1));
        gate.admit().await.unwrap();

        let before = Instant::now();
        gate.admit().await.unwrap();
        assert!(before.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_policy_rejects_until_refill() {
        let gate = RateGate::new(RatePolicy::Drop, TokenBucket::new(1.0, 1));
        gate.admit().await.unwrap();
        assert_matches!(gate.admit().await, Err(CallError::RateLimited));

        tokio::time::advance(Duration::from_secs(1)).await;
        gate.admit().await.unwrap();
    }
}
