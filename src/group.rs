//! Fixed-modulus big-integer arithmetic over the composite RSA group.
//!
//! Everything else in the crate sits on top of two operations: modular
//! exponentiation with an arbitrary exponent, and iterated squaring
//! `x -> x^2 mod n` applied `t` times. The iterated squaring is a strict
//! sequential dependency chain, each output feeding the next input; that
//! chain length is what enforces the minimum elapsed-time guarantee, so it
//! must never be batched or vectorized across the `t` steps of one instance.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Width of one limb in the circuit-facing decomposition.
pub const LIMB_WIDTH: usize = 64;
/// Number of limbs covering a 2048-bit group element.
pub const LIMB_COUNT: usize = 32;
/// Modulus size the proof circuits are built for.
pub const BITS_LEN: usize = LIMB_WIDTH * LIMB_COUNT;

/// Reject malformed `(g, n, t)` tuples before any computation proceeds.
///
/// `n` must be an odd composite of more than one bit (an even modulus cannot
/// be a product of two large primes), `g` must be a nontrivial group element,
/// and `t` must be positive so the squaring chain has nonzero length.
pub fn validate_group_params(g: &BigUint, n: &BigUint, t: u32) -> Result<()> {
    if t == 0 {
        return Err(Error::MalformedParameter("time exponent t must be positive".into()));
    }
    if n.bits() < 2 {
        return Err(Error::MalformedParameter("modulus n is too small".into()));
    }
    if (n % 2u32).is_zero() {
        return Err(Error::MalformedParameter("modulus n must be odd".into()));
    }
    if n.bits() as usize > BITS_LEN {
        return Err(Error::MalformedParameter(format!(
            "modulus n exceeds the supported {BITS_LEN}-bit range"
        )));
    }
    if g <= &BigUint::one() || g >= n {
        return Err(Error::MalformedParameter("generator g must satisfy 1 < g < n".into()));
    }
    Ok(())
}

/// `base^exp mod n`.
pub fn mod_exp(base: &BigUint, exp: &BigUint, n: &BigUint) -> BigUint {
    base.modpow(exp, n)
}

/// `x^(2^t) mod n` by `t` sequential squarings.
///
/// Each squaring consumes the previous result; there is no internal
/// parallelism and no shortcut other than factoring `n`. Cost is linear in
/// `t`, which is the tunable delay knob.
pub fn sequential_square(x: &BigUint, t: u32, n: &BigUint) -> BigUint {
    let mut acc = x % n;
    for _ in 0..t {
        acc = (&acc * &acc) % n;
    }
    acc
}

/// Decompose `value` into exactly [`LIMB_COUNT`] little-endian 64-bit limbs.
pub fn decompose_biguint(value: &BigUint) -> Result<[u64; LIMB_COUNT]> {
    let digits = value.to_u64_digits();
    if digits.len() > LIMB_COUNT {
        return Err(Error::MalformedParameter(format!(
            "value of {} bits exceeds the {BITS_LEN}-bit group range",
            value.bits()
        )));
    }
    let mut limbs = [0u64; LIMB_COUNT];
    limbs[..digits.len()].copy_from_slice(&digits);
    Ok(limbs)
}

/// Recompose little-endian 64-bit limbs into a `BigUint`.
pub fn compose_limbs(limbs: &[u64]) -> BigUint {
    let mut value = BigUint::zero();
    for limb in limbs.iter().rev() {
        value = (value << LIMB_WIDTH) | BigUint::from(*limb);
    }
    value
}
