use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Clock source returning nanoseconds since the Unix epoch
pub type NanoClock = fn() -> u64;

/// Strictly increasing nonce source for one credential
///
/// Each value is the wall clock in nanoseconds, unless that would not exceed the
/// previously issued nonce, in which case it is the previous nonce plus one.
/// Issuance is a single compare-and-swap, so concurrent callers always observe
/// distinct, ordered values.
#[derive(Debug)]
pub struct NonceGenerator {
    last: AtomicU64,
    clock: NanoClock,
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::with_clock(system_nanos)
    }

    pub fn with_clock(clock: NanoClock) -> Self {
        Self {
            last: AtomicU64::new(0),
            clock,
        }
    }

    /// Issue the next nonce
    pub fn next(&self) -> u64 {
        let now = (self.clock)();
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = if now > current { now } else { current + 1 };
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if now < current {
                        warn!(
                            clock = now,
                            last = current,
                            "clock went backwards; nonce advanced past last issued"
                        );
                    }
                    return candidate;
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Last nonce handed out, zero before the first call
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

fn system_nanos() -> u64 {
    // A clock before the epoch reads as zero; `next` still advances from the last nonce.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_nonce_strictly_increasing() {
        let nonces = NonceGenerator::new();
        let mut previous = nonces.next();
        for _ in 0..10_000 {
            let next = nonces.next();
            assert!(next > previous);
            previous = next;
        }
        assert_eq!(nonces.last(), previous);
    }

    #[test]
    fn test_frozen_clock_still_increases() {
        let nonces = NonceGenerator::with_clock(|| 1_000);
        assert_eq!(nonces.next(), 1_000);
        assert_eq!(nonces.next(), 1_001);
        assert_eq!(nonces.next(), 1_002);
    }

    #[test]
    fn test_clock_going_backwards() {
        static TICKS: AtomicU64 = AtomicU64::new(0);
        // 5_000, 4_000, 3_000, ...
        fn falling_clock() -> u64 {
            5_000 - TICKS.fetch_add(1, Ordering::SeqCst) * 1_000
        }

        let nonces = NonceGenerator::with_clock(falling_clock);
        let first = nonces.next();
        let second = nonces.next();
        let third = nonces.next();
        assert_eq!(first, 5_000);
        assert_eq!(second, 5_001);
        assert_eq!(third, 5_002);
    }

    #[test]
    fn test_concurrent_nonces_are_unique() {
        let nonces = Arc::new(NonceGenerator::with_clock(|| 42));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let nonces = Arc::clone(&nonces);
                thread::spawn(move || {
                    let mut issued = Vec::with_capacity(1_000);
                    for _ in 0..1_000 {
                        issued.push(nonces.next());
                    }
                    issued
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            let issued = handle.join().unwrap();
            assert!(issued.windows(2).all(|w| w[0] < w[1]));
            for nonce in issued {
                assert!(all.insert(nonce), "duplicate nonce {}", nonce);
            }
        }
        assert_eq!(all.len(), 8_000);
        assert_eq!(nonces.last(), 42 + 7_999);
    }
}
