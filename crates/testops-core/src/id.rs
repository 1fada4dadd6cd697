//! Identifier generation for sessions and messages.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use uuid::{Builder, Uuid};

/// Produces unique identifiers for sessions and messages.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn next_id(&self) -> String;
}

/// Generates version-4 UUIDs.
///
/// Random bytes come from the operating system's cryptographic source. When
/// that source reports an error the generator switches to a `SmallRng` seeded
/// from the clock and a per-generator counter. Both paths produce the same
/// `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx` shape; only the collision bound of the
/// fallback is weaker.
#[derive(Debug, Default)]
pub struct UuidGenerator {
    counter: AtomicU64,
    warned: AtomicBool,
}

impl UuidGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn os_bytes() -> Result<[u8; 16], getrandom::Error> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes)?;
        Ok(bytes)
    }

    fn software_bytes(&self) -> [u8; 16] {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default() as u64;
        let seed = nanos ^ sequence.wrapping_mul(0x9E37_79B9_7F4A_7C15);

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        bytes
    }

    fn fallback_uuid(&self) -> Uuid {
        Builder::from_random_bytes(self.software_bytes()).into_uuid()
    }
}

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        let uuid = match Self::os_bytes() {
            Ok(bytes) => Builder::from_random_bytes(bytes).into_uuid(),
            Err(err) => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    tracing::warn!(
                        "[UuidGenerator] OS random source unavailable ({}), using software fallback",
                        err
                    );
                }
                self.fallback_uuid()
            }
        };
        uuid.to_string()
    }
}

/// Deterministic generator producing `{prefix}-{n}` identifiers.
///
/// Intended for tests and fixtures where stable identifiers make assertions
/// readable.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}
