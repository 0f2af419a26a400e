//! Time-lock puzzle construction and the sequential solver.
//!
//! A puzzle binds a secret group element `k` behind `t` sequential squarings:
//! the committer samples a short exponent `s` and publishes `o = g^s mod n`,
//! while keeping `k = y^s mod n` where `y = g^(2^t)`. Since
//! `o^(2^t) = g^(s*2^t) = y^s = k`, any party recovers `k` by squaring `o`
//! exactly `t` times — and by no faster route short of factoring `n`.
//!
//! Alongside `o` the committer publishes `k_two = k^2 mod n`, the Poseidon
//! commitment `k_hash_value = H1(k)`, and the sigma-protocol blinding
//! commitments `(r1, r2, z)` consumed by [`sigma`] and the proof circuit.

pub mod circuit;
pub mod sigma;
pub mod zkp;

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::{mod_exp, sequential_square, validate_group_params};
use crate::hash::{derive_key, hash_commitment, HashValue, SymmetricKey};

/// Generator for the standard parameter epoch.
pub const STANDARD_GENERATOR: &str = "5";

/// RSA-2048 modulus used for the standard parameter epoch. The factorization
/// is not known to any party.
pub const STANDARD_MODULUS: &str = "25195908475657893494027183240048398571429282126204032027777137836043662020707595556264018525880784406918290641249515082189298559149176184502808489120072844992687392807287776735971418347270261896375014971824691165077613379859095700097330459748808428401797429100642458691817195118746121515172654632282216869987549182422433637259085141865462043576798423387184774447920739934236584823824281198163815010674810451660377306056201619676256133844143603833904414952634432190114657544454178424020924616515723350778707749817125772467962926386356373289912154831438167899885040445364023527381951378636564391212010397122822120720357";

/// Puzzle-independent setup output for one parameter epoch: derived once,
/// immutable thereafter. `y` and `y_two` are deterministic in `(g, n, t)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockPuzzleParam {
    pub g: BigUint,
    pub n: BigUint,
    pub t: u32,
    pub y: BigUint,
    pub y_two: BigUint,
}

/// Published per-instance puzzle data. Derivable from the secret input and
/// parameters, and never revealing the secret by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockPuzzlePublicInput {
    pub r1: BigUint,
    pub r2: BigUint,
    pub z: BigUint,
    pub o: BigUint,
    pub k_two: BigUint,
    pub k_hash_value: HashValue,
}

/// Committer-only secret. Ephemeral: destroyed after commit and re-derived
/// independently by any solver after the delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLockPuzzleSecretInput {
    pub k: BigUint,
}

/// Derive epoch parameters over the standard 2048-bit modulus.
pub fn generate_param(t: u32) -> Result<TimeLockPuzzleParam> {
    let g = BigUint::parse_bytes(STANDARD_GENERATOR.as_bytes(), 10)
        .ok_or_else(|| Error::MalformedParameter("bad generator constant".into()))?;
    let n = BigUint::parse_bytes(STANDARD_MODULUS.as_bytes(), 10)
        .ok_or_else(|| Error::MalformedParameter("bad modulus constant".into()))?;
    generate_param_with(g, n, t)
}

/// Derive epoch parameters from a caller-supplied `(g, n, t)`. Deterministic:
/// the same tuple always reproduces identical `y` and `y_two`.
pub fn generate_param_with(g: BigUint, n: BigUint, t: u32) -> Result<TimeLockPuzzleParam> {
    validate_group_params(&g, &n, t)?;
    let y = sequential_square(&g, t, &n);
    let y_two = (&y * &y) % &n;
    Ok(TimeLockPuzzleParam { g, n, t, y, y_two })
}

/// Create one puzzle instance: the ephemeral secret (returned to the caller,
/// never published) and the public tuple.
pub fn generate_puzzle(
    param: &TimeLockPuzzleParam,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(TimeLockPuzzleSecretInput, TimeLockPuzzlePublicInput)> {
    validate_group_params(&param.g, &param.n, param.t)?;

    let s = sample_exponent(rng);
    let r = sample_exponent(rng);

    let o = mod_exp(&param.g, &s, &param.n);
    let k = mod_exp(&param.y, &s, &param.n);
    let k_two = mod_exp(&param.y_two, &s, &param.n);

    let r1 = mod_exp(&param.g, &r, &param.n);
    let r2 = mod_exp(&param.y_two, &r, &param.n);
    let c = sigma::challenge(&r1, &r2)?;
    // The group order is unknown, so the response stays unreduced; reducing
    // mod n would break the verification equations for small moduli.
    let z = &r + &s * &c;

    let k_hash_value = hash_commitment(&k)?;

    let secret = TimeLockPuzzleSecretInput { k };
    let public = TimeLockPuzzlePublicInput { r1, r2, z, o, k_two, k_hash_value };
    Ok((secret, public))
}

/// 128-bit nonzero blinding exponent.
fn sample_exponent(rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    loop {
        let mut buf = [0u8; 16];
        rng.fill_bytes(&mut buf);
        let value = BigUint::from_bytes_le(&buf);
        if !value.is_zero() {
            return value;
        }
    }
}

/// Recover the puzzle secret by exactly `t` sequential squarings of `o`.
/// Stateless: every invocation recomputes from scratch, and an in-flight
/// solve may be abandoned at any step with no corruption risk.
pub fn solve(o: &BigUint, t: u32, n: &BigUint) -> BigUint {
    sequential_square(o, t, n)
}

/// Solve and check the recovered value against the published commitments.
/// A mismatch means corrupted public input or a wrong parameter epoch.
pub fn solve_puzzle(
    public: &TimeLockPuzzlePublicInput,
    param: &TimeLockPuzzleParam,
) -> Result<BigUint> {
    let k = solve(&public.o, param.t, &param.n);

    let recovered_hash = hash_commitment(&k)?;
    if !recovered_hash.ct_eq(&public.k_hash_value) {
        return Err(Error::SolveMismatch);
    }
    if (&k * &k) % &param.n != public.k_two {
        return Err(Error::SolveMismatch);
    }
    Ok(k)
}

/// Solve and derive the symmetric key in one call.
pub fn get_decryption_key(o: &BigUint, t: u32, n: &BigUint) -> Result<SymmetricKey> {
    let k = solve(o, t, n);
    derive_key(&k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;

    fn small_param(t: u32) -> TimeLockPuzzleParam {
        generate_param(t).unwrap()
    }

    #[test]
    fn param_generation_is_deterministic() {
        let a = small_param(16);
        let b = small_param(16);
        assert_eq!(a.y, b.y);
        assert_eq!(a.y_two, b.y_two);
    }

    #[test]
    fn rejects_zero_time_exponent() {
        assert!(generate_param(0).is_err());
    }

    #[test]
    fn solve_recovers_secret_for_small_t() {
        let mut rng = StdRng::seed_from_u64(11);
        for t in [1u32, 16] {
            let param = small_param(t);
            let (secret, public) = generate_puzzle(&param, &mut rng).unwrap();
            assert_eq!(solve(&public.o, param.t, &param.n), secret.k);
        }
    }

    #[test]
    fn solve_recovers_secret_for_large_t() {
        let mut rng = StdRng::seed_from_u64(12);
        let param = small_param(1024);
        let (secret, public) = generate_puzzle(&param, &mut rng).unwrap();
        assert_eq!(solve_puzzle(&public, &param).unwrap(), secret.k);
    }

    #[test]
    fn corrupted_commitment_is_a_solve_mismatch() {
        let mut rng = StdRng::seed_from_u64(13);
        let param = small_param(16);
        let (_, mut public) = generate_puzzle(&param, &mut rng).unwrap();
        public.k_two += 1u32;
        assert!(matches!(solve_puzzle(&public, &param), Err(Error::SolveMismatch)));
    }

    #[test]
    fn decryption_key_matches_committer_side() {
        let mut rng = StdRng::seed_from_u64(14);
        let param = small_param(16);
        let (secret, public) = generate_puzzle(&param, &mut rng).unwrap();
        let solver_key = get_decryption_key(&public.o, param.t, &param.n).unwrap();
        assert_eq!(solver_key, derive_key(&secret.k).unwrap());
    }

    #[test]
    fn param_serde_round_trip_is_exact() {
        let param = small_param(16);
        let json = serde_json::to_string(&param).unwrap();
        let back: TimeLockPuzzleParam = serde_json::from_str(&json).unwrap();
        assert_eq!(param, back);
    }
}
