//! Seed handling, salted stream derivation, and weighted sampling.
//!
//! # Stream Derivation
//!
//! A root seed string is turned into a 32-byte root key with BLAKE3 in
//! key-derivation mode. Each salt label is then hashed under that key, and the
//! 32-byte digest seeds a ChaCha8 stream:
//!
//! ```text
//! root_key = BLAKE3-derive_key(ROOT_CONTEXT, seed)
//! stream   = ChaCha8(BLAKE3-keyed_hash(root_key, salt))
//! ```
//!
//! Both steps are one-way, so a derived stream reveals neither the root key
//! nor the seed, and distinct salts give independent streams.
//!
//! # Reproducibility
//!
//! The same `(seed, salt)` pair always produces the same sequence on every
//! platform. ChaCha output is defined in terms of bytes, not native words.

use rand::{Rng, SeedableRng, TryRngCore};
use rand_chacha::ChaCha8Rng;

use crate::error::RollError;

/// Random stream owned by a caster.
pub type Stream = ChaCha8Rng;

const ROOT_CONTEXT: &str = "u-roll 2025-01 root key from seed string";
const SEED_CONTEXT: &str = "u-roll 2025-01 random seed from os entropy";

/// Derives the 32-byte root key for a seed string.
///
/// # Examples
/// ```
/// use u_roll::random::root_key;
/// assert_eq!(root_key("campaign-1"), root_key("campaign-1"));
/// assert_ne!(root_key("campaign-1"), root_key("campaign-2"));
/// ```
pub fn root_key(seed: &str) -> [u8; 32] {
    blake3::derive_key(ROOT_CONTEXT, seed.as_bytes())
}

/// Derives the stream for `salt` under an already derived root key.
pub fn derive_stream(root_key: &[u8; 32], salt: &str) -> Stream {
    let stream_seed = blake3::keyed_hash(root_key, salt.as_bytes());
    ChaCha8Rng::from_seed(*stream_seed.as_bytes())
}

/// Derives the stream for `(seed, salt)` in one step.
///
/// # Examples
/// ```
/// use u_roll::random::stream;
/// use rand::Rng;
/// let mut a = stream("world", "goblin-7");
/// let mut b = stream("world", "goblin-7");
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn stream(seed: &str, salt: &str) -> Stream {
    derive_stream(&root_key(seed), salt)
}

/// Generates a fresh seed string from the operating system entropy source.
///
/// 32 bytes are read once, passed through BLAKE3 key derivation and returned
/// as 64 lowercase hex characters.
///
/// # Errors
/// Returns [`RollError::Entropy`] if the OS source cannot be read.
pub fn random_seed() -> Result<String, RollError> {
    let mut entropy = [0u8; 32];
    rand::rngs::OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| RollError::Entropy(e.to_string()))?;
    let derived = blake3::derive_key(SEED_CONTEXT, &entropy);
    Ok(blake3::Hash::from(derived).to_hex().to_string())
}

/// Pre-computed cumulative-weight sampler.
///
/// Negative weights count as zero. Sampling draws `u·total` with
/// `u ~ U[0, 1)` and returns the first index whose cumulative weight is
/// strictly greater than the draw, so zero-weight entries are never chosen
/// while any positive weight exists.
///
/// # Algorithm
/// CDF table with binary search (`partition_point`).
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use u_roll::random::{stream, WeightedSampler};
/// let sampler = WeightedSampler::new(&[1.0, 0.0, 3.0]).unwrap();
/// let mut rng = stream("seed", "salt");
/// let idx = sampler.sample(&mut rng);
/// assert!(idx == 0 || idx == 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Creates a sampler from the given weights.
    ///
    /// # Returns
    /// - `None` if `weights` is empty.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights {
            if w > 0.0 {
                total += w;
            }
            cumulative.push(total);
        }

        Some(Self { cumulative, total })
    }

    /// Samples an index according to the weights.
    ///
    /// Always consumes exactly one uniform draw. With zero total weight the
    /// last index is returned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let threshold = rng.random::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|c| *c <= threshold);
        idx.min(self.cumulative.len() - 1)
    }

    /// Returns the number of categories.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Returns true if there are no categories.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Returns the total (non-negative) weight.
    pub fn total_weight(&self) -> f64 {
        self.total
    }
}

// ============================================================================
// Tests
// ============================================================================
