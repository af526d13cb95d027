//! # Multi-Base Polynomial Rolling Hash
//!
//! This module implements a **double (multi-base) polynomial rolling hash index** over
//! sequences, built for adversarial settings such as hack-resistant judges where a single
//! fixed base and modulus can be attacked with crafted collisions.
//!
//! For each base `x` the index keeps prefix hashes
//!
//! ```text
//!   prefix[0] = 0
//!   prefix[i] = (x * prefix[i-1] + s[i-1]) mod P
//! ```
//!
//! so the hash of any sub-range `[start, end)` is
//! `prefix[end] - prefix[start] * x^(end - start)  (mod P)`, an O(1) lookup.
//!
//! ## Key Features
//! - **Several independent bases** drawn at random (see [`registry`](super::registry)),
//!   packed two at a time into a 64-bit **combined hash**.
//! - **Shared power tables**: powers of each base live in a [`PowerTable`] referenced by
//!   every index, so repeated builds never recompute them.
//! - **Incremental append** with [`StringHash::add_char`], producing exactly the prefix table a
//!   full [`StringHash::build`] would.
//! - **Checked queries**: out-of-range sub-ranges are reported as errors, never clamped.
//! - **Parallel builds** of many sequences against one table with [`StringHash::build_all`].
//!
//! **Note**: This is **not** a cryptographic hash. Collisions are improbable for inputs chosen
//! without knowledge of the bases, nothing more.
//!
//! ## Example
//! ```rust
//! use multihash_rolling::cs::hashing::polynomial_rolling::StringHash;
//! use multihash_rolling::cs::hashing::power_table::PowerTable;
//! use multihash_rolling::cs::hashing::registry::HashParams;
//!
//! let table = PowerTable::shared(HashParams::random(2).unwrap());
//! let hash = StringHash::from_text(&table, "abcab");
//!
//! // "ab" occurs at offsets 0 and 3.
//! assert_eq!(hash.combined_hash(0, 2).unwrap(), hash.combined_hash(3, 5).unwrap());
//! assert!(hash.combined_hash(10, 12).is_err());
//! ```

use std::ops::Range;
use std::sync::Arc;

use log::trace;
use rayon::prelude::*;

use super::modular::{mul_add_mod, sub_shifted_mod};
use super::power_table::PowerTable;
use super::registry::HashParams;
use crate::error::{Error, Result};

/// An element that can be hashed: anything with a non-negative integer code.
/// Codes are reduced modulo `P` before they enter the recurrence.
pub trait Symbol {
    fn code(&self) -> u64;
}

macro_rules! impl_symbol {
    ($($t:ty),*) => {
        $(
            impl Symbol for $t {
                #[inline]
                fn code(&self) -> u64 {
                    *self as u64
                }
            }
        )*
    };
}

impl_symbol!(u8, u16, u32, u64, usize, char);

impl<T: Symbol + ?Sized> Symbol for &T {
    #[inline]
    fn code(&self) -> u64 {
        (**self).code()
    }
}

/// Prefix hashes of one sequence under every base of a shared [`PowerTable`].
#[derive(Debug, Clone)]
pub struct StringHash {
    table: Arc<PowerTable>,
    /// `prefix[b]` has `len + 1` entries, all `< P`.
    prefix: Vec<Vec<u32>>,
    /// Element codes, kept only when requested.
    snapshot: Option<Vec<u64>>,
}

impl StringHash {
    /// An empty index over `table`.
    pub fn new(table: &Arc<PowerTable>) -> Self {
        Self {
            table: Arc::clone(table),
            prefix: vec![vec![0]; table.params().count()],
            snapshot: None,
        }
    }

    /// An empty index that also retains the codes of every element it hashes.
    pub fn with_snapshot(table: &Arc<PowerTable>) -> Self {
        Self {
            snapshot: Some(Vec::new()),
            ..Self::new(table)
        }
    }

    pub fn from_seq<T: Symbol>(table: &Arc<PowerTable>, seq: &[T]) -> Self {
        let mut hash = Self::new(table);
        hash.build(seq);
        hash
    }

    /// Hashes the `char`s of `text`.
    pub fn from_text(table: &Arc<PowerTable>, text: &str) -> Self {
        let mut hash = Self::new(table);
        hash.build_str(text);
        hash
    }

    pub fn from_bytes(table: &Arc<PowerTable>, bytes: &[u8]) -> Self {
        Self::from_seq(table, bytes)
    }

    /// Builds one index per sequence in parallel. The shared table is grown once up front
    /// for the longest sequence so workers only ever take read locks.
    pub fn build_all<S, T>(table: &Arc<PowerTable>, seqs: &[S]) -> Vec<Self>
    where
        S: AsRef<[T]> + Sync,
        T: Symbol + Sync,
    {
        let longest = seqs.iter().map(|s| s.as_ref().len()).max().unwrap_or(0);
        table.ensure_all(longest);
        seqs.par_iter()
            .map(|s| Self::from_seq(table, s.as_ref()))
            .collect()
    }

    /// Replaces the content of the index with `seq` in a single pass.
    pub fn build<T: Symbol>(&mut self, seq: &[T]) {
        let params = self.table.params();
        let p = params.modulus();
        self.table.ensure_all(seq.len());

        for (prefix, &base) in self.prefix.iter_mut().zip(params.bases()) {
            prefix.clear();
            prefix.reserve(seq.len() + 1);
            prefix.push(0);
            let mut h = 0u64;
            for item in seq {
                h = mul_add_mod(base, h, item.code(), p);
                prefix.push(h as u32);
            }
        }

        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.clear();
            snapshot.extend(seq.iter().map(Symbol::code));
        }
        trace!("built string hash of length {}", seq.len());
    }

    pub fn build_str(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        self.build(&chars);
    }

    /// Appends one element, extending every prefix table by one entry.
    pub fn add_char<T: Symbol>(&mut self, item: T) {
        let params = self.table.params();
        let p = params.modulus();
        let code = item.code();
        self.table.ensure_all(self.len() + 1);

        for (prefix, &base) in self.prefix.iter_mut().zip(params.bases()) {
            if prefix.is_empty() {
                prefix.push(0);
            }
            let prev = prefix.last().map_or(0, |&h| h as u64);
            prefix.push(mul_add_mod(base, prev, code, p) as u32);
        }

        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.push(code);
        }
    }

    /// Number of hashed elements.
    pub fn len(&self) -> usize {
        self.prefix
            .first()
            .map_or(0, |prefix| prefix.len().saturating_sub(1))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hash of `[start, end)` under base `base_id`, in `[0, P)`.
    pub fn substring_hash(&self, base_id: usize, start: usize, end: usize) -> Result<u64> {
        self.check_range(start, end)?;
        let prefix = self.prefix.get(base_id).ok_or(Error::UnknownBase {
            base_id,
            count: self.prefix.len(),
        })?;
        let shift = self.table.power(base_id, end - start)?;
        Ok(sub_shifted_mod(
            prefix[end] as u64,
            prefix[start] as u64,
            shift,
            self.table.params().modulus(),
        ))
    }

    /// Base 0 in the low 32 bits and base 1 (if configured) in the high 32 bits.
    /// Bases past the second never contribute.
    pub fn combined_hash(&self, start: usize, end: usize) -> Result<u64> {
        let low = self.substring_hash(0, start, end)?;
        if self.prefix.len() < 2 {
            return Ok(low);
        }
        let high = self.substring_hash(1, start, end)?;
        Ok(high << 32 | low)
    }

    /// Compares two sub-ranges under every configured base, including those that do not
    /// feed [`combined_hash`](Self::combined_hash).
    pub fn substrings_equal(&self, a: Range<usize>, b: Range<usize>) -> Result<bool> {
        self.check_range(a.start, a.end)?;
        self.check_range(b.start, b.end)?;
        if a.len() != b.len() {
            return Ok(false);
        }
        for base_id in 0..self.prefix.len() {
            if self.substring_hash(base_id, a.start, a.end)?
                != self.substring_hash(base_id, b.start, b.end)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The `len + 1` prefix hashes under `base_id`.
    pub fn prefix_hashes(&self, base_id: usize) -> Result<&[u32]> {
        self.prefix
            .get(base_id)
            .map(Vec::as_slice)
            .ok_or(Error::UnknownBase {
                base_id,
                count: self.prefix.len(),
            })
    }

    /// Codes of the hashed elements, if this index was created with
    /// [`with_snapshot`](Self::with_snapshot).
    pub fn snapshot(&self) -> Option<&[u64]> {
        self.snapshot.as_deref()
    }

    pub fn retains_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn table(&self) -> &Arc<PowerTable> {
        &self.table
    }

    pub fn params(&self) -> &HashParams {
        self.table.params()
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        if start > end || end > len {
            return Err(Error::RangeOutOfBounds { start, end, len });
        }
        Ok(())
    }
}

impl<T: Symbol> Extend<T> for StringHash {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add_char(item);
        }
    }
}
