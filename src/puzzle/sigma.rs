//! Sigma-protocol check binding `o` and `k_two` to one blinding exponent.
//!
//! The committer proves knowledge of `s` with `o = g^s` and `k_two = y_two^s`
//! through the commitments `r1 = g^r`, `r2 = y_two^r` and the response
//! `z = r + s*c`, where the challenge `c` is the Poseidon hash of the
//! commitments. Verification is public-coin and secret-independent; the
//! Groth16 circuit covers the remaining hash/square relation on `k` itself.

use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::Result;
use crate::group::mod_exp;
use crate::hash::pack_limbs;
use crate::poseidon::{domain_tag, new_sponge};
use crate::puzzle::{TimeLockPuzzleParam, TimeLockPuzzlePublicInput};

pub const CHALLENGE_DOMAIN: &[u8] = b"pvde/sigma/challenge/v1";

/// Fiat-Shamir challenge `c = Poseidon(r1, r2)`.
pub fn challenge(r1: &BigUint, r2: &BigUint) -> Result<BigUint> {
    let mut sponge = new_sponge();
    sponge.absorb(&domain_tag(CHALLENGE_DOMAIN));
    sponge.absorb(&pack_limbs(r1)?);
    sponge.absorb(&pack_limbs(r2)?);
    let element = sponge.squeeze_native_field_elements(1)[0];
    Ok(BigUint::from_bytes_le(&element.into_bigint().to_bytes_le()))
}

/// Check the two verification equations:
/// `g^z == r1 * o^c mod n` and `y_two^z == r2 * k_two^c mod n`.
///
/// Deterministic and secret-independent. Any malformed input (values outside
/// the supported group range) yields `false`, never a panic.
pub fn verify(public: &TimeLockPuzzlePublicInput, param: &TimeLockPuzzleParam) -> bool {
    let c = match challenge(&public.r1, &public.r2) {
        Ok(c) => c,
        Err(_) => return false,
    };

    let left = mod_exp(&param.g, &public.z, &param.n);
    let right = (&public.r1 * mod_exp(&public.o, &c, &param.n)) % &param.n;
    if left != right {
        return false;
    }

    let left = mod_exp(&param.y_two, &public.z, &param.n);
    let right = (&public.r2 * mod_exp(&public.k_two, &c, &param.n)) % &param.n;
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{generate_param, generate_puzzle};
    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;

    #[test]
    fn accepts_honest_commitments() {
        let mut rng = StdRng::seed_from_u64(21);
        let param = generate_param(16).unwrap();
        let (_, public) = generate_puzzle(&param, &mut rng).unwrap();
        assert!(verify(&public, &param));
    }

    #[test]
    fn rejects_tampered_commitment() {
        let mut rng = StdRng::seed_from_u64(22);
        let param = generate_param(16).unwrap();
        let (_, mut public) = generate_puzzle(&param, &mut rng).unwrap();
        public.r1 += 1u32;
        assert!(!verify(&public, &param));
    }

    #[test]
    fn rejects_swapped_locked_value() {
        let mut rng = StdRng::seed_from_u64(23);
        let param = generate_param(16).unwrap();
        let (_, public_a) = generate_puzzle(&param, &mut rng).unwrap();
        let (_, mut public_b) = generate_puzzle(&param, &mut rng).unwrap();
        public_b.o = public_a.o;
        assert!(!verify(&public_b, &param));
    }

    #[test]
    fn accepts_honest_commitments_over_small_modulus() {
        use crate::puzzle::generate_param_with;
        let mut rng = StdRng::seed_from_u64(24);
        let param =
            generate_param_with(BigUint::from(5u32), BigUint::from(0x1ffffffffffffff1u64), 8)
                .unwrap();
        let (_, public) = generate_puzzle(&param, &mut rng).unwrap();
        assert!(verify(&public, &param));
    }

    #[test]
    fn challenge_is_deterministic() {
        let r1 = BigUint::from(17u32);
        let r2 = BigUint::from(23u32);
        assert_eq!(challenge(&r1, &r2).unwrap(), challenge(&r1, &r2).unwrap());
        assert_ne!(challenge(&r1, &r2).unwrap(), challenge(&r2, &r1).unwrap());
    }
}
