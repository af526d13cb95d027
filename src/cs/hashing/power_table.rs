//! # Power Table Cache
//!
//! Precomputed powers `base^i mod P` for every configured base, shared by all hash indices
//! built from the same [`HashParams`]. Tables grow on demand and never shrink, so a process
//! hashing many sequences only pays for the powers of its longest one.
//!
//! ## Thread Safety
//! Each base has its own `RwLock`. Lookups take the read lock. [`PowerTable::ensure_pow`]
//! checks the length under the read lock first and only takes the write lock when the table
//! actually needs to grow (re-checking under the write lock). Any number of indices may be
//! built concurrently against one `Arc<PowerTable>`.
//!
//! ## Example
//! ```rust
//! use multihash_rolling::cs::hashing::power_table::PowerTable;
//! use multihash_rolling::cs::hashing::registry::HashParams;
//!
//! let table = PowerTable::new(HashParams::with_bases(vec![10]).unwrap());
//! table.ensure_pow(0, 3).unwrap();
//! assert_eq!(table.power(0, 3).unwrap(), 1000);
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use super::modular::mul_mod;
use super::registry::HashParams;
use crate::error::{Error, Result};

/// Growable per-base tables of `base^i mod P`, starting at `base^0 = 1`.
#[derive(Debug)]
pub struct PowerTable {
    params: HashParams,
    powers: Vec<RwLock<Vec<u32>>>,
}

impl PowerTable {
    /// Creates tables holding only `base^0` for each base.
    pub fn new(params: HashParams) -> Self {
        let powers = (0..params.count()).map(|_| RwLock::new(vec![1])).collect();
        Self { params, powers }
    }

    /// Convenience for the usual shared handle.
    pub fn shared(params: HashParams) -> Arc<Self> {
        Arc::new(Self::new(params))
    }

    pub fn params(&self) -> &HashParams {
        &self.params
    }

    /// Guarantees `powers[base_id]` holds at least `min_length + 1` entries.
    /// Calls that do not need growth only take the read lock.
    pub fn ensure_pow(&self, base_id: usize, min_length: usize) -> Result<()> {
        let lock = self.slot(base_id)?;
        let base = self.params.base(base_id)?;
        self.grow(base_id, lock, base, min_length);
        Ok(())
    }

    /// [`ensure_pow`](Self::ensure_pow) for every base.
    pub(crate) fn ensure_all(&self, min_length: usize) {
        for (base_id, (lock, &base)) in self.powers.iter().zip(self.params.bases()).enumerate() {
            self.grow(base_id, lock, base, min_length);
        }
    }

    fn grow(&self, base_id: usize, lock: &RwLock<Vec<u32>>, base: u64, min_length: usize) {
        if read(lock).len() > min_length {
            return;
        }

        let p = self.params.modulus();
        let mut table = write(lock);
        let old_len = table.len();
        if old_len > min_length {
            // Another writer got here first.
            return;
        }
        table.reserve(min_length + 1 - old_len);
        let mut last = table[old_len - 1] as u64;
        while table.len() <= min_length {
            last = mul_mod(base, last, p);
            table.push(last as u32);
        }
        debug!(
            "power table for base {} grown from {} to {} entries",
            base_id,
            old_len,
            table.len()
        );
    }

    /// `base^exponent mod P`, read from the table.
    pub fn power(&self, base_id: usize, exponent: usize) -> Result<u64> {
        let table = read(self.slot(base_id)?);
        table
            .get(exponent)
            .map(|&v| v as u64)
            .ok_or(Error::PowerNotMaterialized {
                base_id,
                exponent,
                len: table.len(),
            })
    }

    /// Number of materialized entries for `base_id` (always at least 1).
    pub fn len(&self, base_id: usize) -> Result<usize> {
        Ok(read(self.slot(base_id)?).len())
    }

    /// Copies out the materialized powers of `base_id`.
    pub fn snapshot(&self, base_id: usize) -> Result<Vec<u32>> {
        Ok(read(self.slot(base_id)?).clone())
    }

    fn slot(&self, base_id: usize) -> Result<&RwLock<Vec<u32>>> {
        self.powers.get(base_id).ok_or(Error::UnknownBase {
            base_id,
            count: self.powers.len(),
        })
    }
}

// Tables are append-only and every pushed entry is final, so a poisoned lock still guards
// a valid prefix of the table.
fn read(lock: &RwLock<Vec<u32>>) -> RwLockReadGuard<'_, Vec<u32>> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(lock: &RwLock<Vec<u32>>) -> RwLockWriteGuard<'_, Vec<u32>> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::hashing::registry::HASH_P;
    use std::thread;

    fn table(bases: Vec<u64>) -> PowerTable {
        PowerTable::new(HashParams::with_bases(bases).unwrap())
    }

    #[test]
    fn test_starts_with_one() {
        let t = table(vec![31, 37]);
        assert_eq!(t.len(0).unwrap(), 1);
        assert_eq!(t.power(1, 0).unwrap(), 1);
    }

    #[test]
    fn test_recurrence() {
        let t = table(vec![HASH_P - 2]);
        t.ensure_pow(0, 64).unwrap();
        let powers = t.snapshot(0).unwrap();
        assert_eq!(powers.len(), 65);
        let mut expected = 1u128;
        for &p in &powers {
            assert_eq!(p as u128, expected);
            expected = expected * (HASH_P - 2) as u128 % HASH_P as u128;
        }
    }

    #[test]
    fn test_ensure_is_idempotent_and_never_shrinks() {
        let t = table(vec![3]);
        t.ensure_pow(0, 10).unwrap();
        assert_eq!(t.len(0).unwrap(), 11);
        t.ensure_pow(0, 4).unwrap();
        t.ensure_pow(0, 10).unwrap();
        assert_eq!(t.len(0).unwrap(), 11);
        assert_eq!(t.power(0, 10).unwrap(), 59049);
    }

    #[test]
    fn test_errors() {
        let t = table(vec![3]);
        assert_eq!(
            t.ensure_pow(1, 2),
            Err(Error::UnknownBase {
                base_id: 1,
                count: 1
            })
        );
        assert_eq!(
            t.power(0, 5),
            Err(Error::PowerNotMaterialized {
                base_id: 0,
                exponent: 5,
                len: 1
            })
        );
    }

    #[test]
    fn test_concurrent_growth() {
        let t = Arc::new(table(vec![7, 11]));
        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let t = Arc::clone(&t);
                thread::spawn(move || {
                    for n in 0..100 * i {
                        t.ensure_pow(n % 2, n).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(t.len(1).unwrap(), 800);
        t.ensure_pow(0, 799).unwrap();

        let serial = table(vec![7, 11]);
        serial.ensure_pow(0, 799).unwrap();
        serial.ensure_pow(1, 799).unwrap();
        for b in 0..2 {
            assert_eq!(t.snapshot(b).unwrap(), serial.snapshot(b).unwrap());
        }
    }
}
