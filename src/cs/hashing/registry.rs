//! # Hash Parameters
//!
//! The **modulus/base registry** for the multi-base rolling hash: a fixed prime
//! modulus `P` and `B` multipliers ("bases") chosen once and then held immutable.
//!
//! ## Key Features
//! - **Fixed safe prime** `P = 2^32 - 13337`. Both `P` and `(P - 1) / 2` are prime, which
//!   leaves little multiplicative structure for a degenerate base to exploit.
//! - **Randomized bases** drawn uniformly from `[0.1·P, 0.9·P]`, staying away from `0` and
//!   `P - 1` where many distinct inputs would collapse to the same value.
//! - **Reproducible** draws through an explicit seed, or **fixed** bases for tests.
//! - **Builder pattern** for parameter specification, validated at setup time.
//!
//! There is no hidden global state: a [`HashParams`] value is created once and handed to a
//! [`PowerTable`](super::power_table::PowerTable), which every hash index references.
//!
//! ## Example
//! ```rust
//! use multihash_rolling::cs::hashing::registry::{HashParamsBuilder, HASH_P};
//!
//! let params = HashParamsBuilder::new().count(2).seed(7).build().unwrap();
//! assert_eq!(params.count(), 2);
//! assert!(params.bases().iter().all(|&b| b < HASH_P));
//! ```

use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};

/// The prime modulus `2^32 - 13337`.
pub const HASH_P: u64 = (1u64 << 32) - 13337;

/// Number of bases drawn when none is specified. Two bases fill the 64-bit combined hash.
pub const DEFAULT_HASH_COUNT: usize = 2;

/// Only the first two bases are packed into a combined hash.
const COMBINED_BASES: usize = 2;

/// Inclusive range random bases are drawn from: `[round(0.1·P), round(0.9·P)]`.
pub fn base_range() -> (u64, u64) {
    let p = HASH_P as f64;
    ((0.1 * p).round() as u64, (0.9 * p).round() as u64)
}

/// Immutable modulus and base multipliers shared by every hash index built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParams {
    modulus: u64,
    bases: Vec<u64>,
}

impl HashParams {
    /// Draws `count` bases from an OS-seeded generator.
    pub fn random(count: usize) -> Result<Self> {
        HashParamsBuilder::new().count(count).build()
    }

    /// Uses the given bases verbatim. See [`HashParamsBuilder::bases`].
    pub fn with_bases(bases: Vec<u64>) -> Result<Self> {
        HashParamsBuilder::new().bases(bases).build()
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of configured bases, `B`.
    pub fn count(&self) -> usize {
        self.bases.len()
    }

    pub fn bases(&self) -> &[u64] {
        &self.bases
    }

    /// The multiplier for `base_id`.
    pub fn base(&self, base_id: usize) -> Result<u64> {
        self.bases
            .get(base_id)
            .copied()
            .ok_or(Error::UnknownBase {
                base_id,
                count: self.bases.len(),
            })
    }

    /// Number of bases that feed the combined hash: `min(B, 2)`.
    pub fn combined_width(&self) -> usize {
        self.bases.len().min(COMBINED_BASES)
    }
}

impl Default for HashParams {
    /// Two bases from an OS-seeded generator.
    fn default() -> Self {
        let mut rng = StdRng::from_entropy();
        Self {
            modulus: HASH_P,
            bases: draw_bases(&mut rng, DEFAULT_HASH_COUNT),
        }
    }
}

/// A builder for [`HashParams`], allowing you to set the base count, a seed, or fixed bases.
#[derive(Debug, Clone)]
pub struct HashParamsBuilder {
    count: usize,
    seed: Option<u64>,
    bases: Option<Vec<u64>>,
}

impl Default for HashParamsBuilder {
    fn default() -> Self {
        Self {
            count: DEFAULT_HASH_COUNT,
            seed: None,
            bases: None,
        }
    }
}

impl HashParamsBuilder {
    /// Creates a new builder for two randomly drawn bases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of bases to draw. More bases lower the collision probability at a
    /// proportional cost per element.
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets an explicit seed for the base draw.
    /// If not called, the generator is seeded from the OS.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provide your own bases, bypassing random generation and ignoring `count`.
    /// Each base must be in `[0, P)`; bases outside the random draw window are allowed.
    pub fn bases(mut self, bases: Vec<u64>) -> Self {
        self.bases = Some(bases);
        self
    }

    /// Validates the configuration and produces the immutable parameter set.
    pub fn build(self) -> Result<HashParams> {
        let bases = match self.bases {
            Some(bases) => {
                for &base in &bases {
                    if base >= HASH_P {
                        return Err(Error::BaseOutOfField {
                            base,
                            modulus: HASH_P,
                        });
                    }
                    if base < 2 {
                        warn!("degenerate hash base {}: hashes ignore element order", base);
                    }
                }
                bases
            }
            None => match self.seed {
                // ChaCha keeps seeded draws stable across platforms and rand releases.
                Some(seed) => draw_bases(&mut ChaCha20Rng::seed_from_u64(seed), self.count),
                None => draw_bases(&mut StdRng::from_entropy(), self.count),
            },
        };

        if bases.is_empty() {
            return Err(Error::NoBases);
        }
        if bases.len() > COMBINED_BASES {
            warn!(
                "{} hash bases configured; only the first {} feed combined_hash",
                bases.len(),
                COMBINED_BASES
            );
        }
        debug!("hash params: modulus={} bases={:?}", HASH_P, bases);

        Ok(HashParams {
            modulus: HASH_P,
            bases,
        })
    }
}

fn draw_bases<R: Rng>(rng: &mut R, count: usize) -> Vec<u64> {
    let (lo, hi) = base_range();
    (0..count).map(|_| rng.gen_range(lo..=hi)).collect()
}
