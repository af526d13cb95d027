//! # Modular Arithmetic Helpers
//!
//! Low-level operations over the prime field `Z/PZ` used by the rolling hash.
//! Every value stored in a prefix or power table is `< P < 2^32`, so products of
//! two stored values fit in a `u64`; these helpers rely on that and never widen
//! further.
//!
//! The subtraction idiom used for substring hashes adds `P·P` before
//! subtracting a product of two field elements, so the intermediate never goes
//! negative. With `P < 2^32` we have `P·P + P < 2^64`, so the whole expression
//! stays inside `u64`.

/// One step of the polynomial recurrence: `(base * prev + code) mod p`.
///
/// `base` and `prev` must already be reduced modulo `p`; `code` is reduced here.
#[inline]
pub fn mul_add_mod(base: u64, prev: u64, code: u64, p: u64) -> u64 {
    debug_assert!(base < p && prev < p);
    (base * prev + code % p) % p
}

/// Multiplication of two field elements: `(a * b) mod p`.
#[inline]
pub fn mul_mod(a: u64, b: u64, p: u64) -> u64 {
    debug_assert!(a < p && b < p);
    a * b % p
}

/// Removes a shifted prefix from a longer prefix hash:
/// `(full + p*p - head * shift) mod p`.
///
/// `full`, `head` and `shift` must all be field elements.
#[inline]
pub fn sub_shifted_mod(full: u64, head: u64, shift: u64, p: u64) -> u64 {
    debug_assert!(full < p && head < p && shift < p);
    (full + p * p - head * shift) % p
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_prime::nt_funcs::is_prime64;

    const P: u64 = 4_294_953_959;

    #[test]
    fn test_recurrence_step_at_field_edge() {
        // Largest possible operands must not overflow.
        let v = mul_add_mod(P - 1, P - 1, u32::MAX as u64, P);
        let expected = (((P - 1) as u128 * (P - 1) as u128 + (u32::MAX as u128 % P as u128))
            % P as u128) as u64;
        assert_eq!(v, expected);
    }

    #[test]
    fn test_code_is_reduced() {
        assert_eq!(mul_add_mod(7, 0, P + 5, P), 5);
        assert_eq!(mul_add_mod(7, 0, u64::MAX, P), u64::MAX % P);
    }

    #[test]
    fn test_sub_shifted_matches_wide_arithmetic() {
        let cases = [(0, P - 1, P - 1), (P - 1, 0, 1), (12345, 67890, 424242), (5, 5, 1)];
        for &(full, head, shift) in &cases {
            let wide = ((full as i128 - head as i128 * shift as i128).rem_euclid(P as i128)) as u64;
            assert_eq!(sub_shifted_mod(full, head, shift, P), wide);
        }
    }

    #[test]
    fn test_mul_mod() {
        assert_eq!(mul_mod(P - 1, P - 1, P), 1);
        assert_eq!(mul_mod(0, P - 1, P), 0);
    }

    #[test]
    fn test_modulus_and_half_are_prime() {
        assert!(is_prime64(P));
        assert!(is_prime64((P - 1) / 2));
        assert!(is_prime64(18_446_744_073_709_551_557));
        assert!(!is_prime64(P - 2));
    }
}
