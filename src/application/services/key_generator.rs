//! Random short key generation with collision avoidance.

use std::sync::Mutex;

use metrics::counter;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::domain::repositories::ShortLinkRepository;
use crate::domain::short_key::{ALPHABET, SHORT_KEY_LENGTH};
use crate::error::AppError;

/// Draws short keys from an injected random source.
///
/// Production instances are seeded from the operating system (`StdRng` is a
/// CSPRNG); tests pass a seeded generator for reproducible keys.
pub struct KeyGenerator {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl KeyGenerator {
    /// Creates a generator seeded from the operating system's entropy source.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS random source is unavailable.
    pub fn from_os_rng() -> anyhow::Result<Self> {
        let rng = StdRng::try_from_os_rng()
            .map_err(|e| anyhow::anyhow!("Failed to seed key generator: {e}"))?;
        Ok(Self::with_rng(rng))
    }

    /// Creates a generator with a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates a generator over any random source.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Draws one candidate key: six independent uniform picks from the alphabet.
    ///
    /// The candidate is not checked against the store.
    pub fn generate_candidate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..SHORT_KEY_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// Draws candidates until one is not assigned in the store.
    ///
    /// There is no retry limit: with 62^6 keys a long run of collisions is not
    /// a realistic outcome. Store errors are returned on the first failure and
    /// never retried. The check is not a reservation; the store's insert path
    /// still has the final word on uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the existence check fails.
    pub async fn generate_unique_key<R>(&self, repository: &R) -> Result<String, AppError>
    where
        R: ShortLinkRepository + ?Sized,
    {
        loop {
            let candidate = self.generate_candidate();

            if !repository.exists_by_key(&candidate).await? {
                return Ok(candidate);
            }

            counter!("short_key_collisions_total", "stage" => "precheck").increment(1);
            debug!(short_key = %candidate, "Short key already assigned, drawing another");
        }
    }
}
