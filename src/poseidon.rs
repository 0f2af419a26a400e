//! Deterministic Poseidon parameters for BLS12-381 Fr, width 3.
//!
//! One parameter set backs every sponge use in the crate: the secret
//! commitment hash, symmetric key derivation, the sigma-protocol challenge,
//! and the delay cipher, both host-side and inside the Groth16 circuits.
//! Keeping a single width-3 instance means the native sponge and the R1CS
//! sponge gadget walk through identical state transitions.

use ark_bls12_381::Fr;
use ark_crypto_primitives::sponge::poseidon::{
    find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge,
};
use ark_crypto_primitives::sponge::CryptographicSponge;
use ark_ff::PrimeField;
use once_cell::sync::Lazy;

pub const RATE: usize = 2;
const CAPACITY: usize = 1;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 56;
const ALPHA: u64 = 5;

/// Process-wide Poseidon configuration, generated once and read-only after.
pub static POSEIDON_FR_PARAMS: Lazy<PoseidonConfig<Fr>> = Lazy::new(|| {
    let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
        Fr::MODULUS_BIT_SIZE as u64,
        RATE,
        FULL_ROUNDS as u64,
        PARTIAL_ROUNDS as u64,
        0,
    );
    PoseidonConfig {
        full_rounds: FULL_ROUNDS,
        partial_rounds: PARTIAL_ROUNDS,
        alpha: ALPHA,
        ark,
        mds,
        rate: RATE,
        capacity: CAPACITY,
    }
});

/// Fresh sponge over the shared parameter set.
pub fn new_sponge() -> PoseidonSponge<Fr> {
    PoseidonSponge::new(&POSEIDON_FR_PARAMS)
}

/// Map a domain-separation byte string to a field element absorbed as the
/// first sponge input. Tags must stay fixed within a parameter epoch.
pub fn domain_tag(domain: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_crypto_primitives::sponge::FieldBasedCryptographicSponge;

    #[test]
    fn params_are_deterministic() {
        let (ark_a, mds_a) = find_poseidon_ark_and_mds::<Fr>(255, RATE, 8, 56, 0);
        let (ark_b, mds_b) = find_poseidon_ark_and_mds::<Fr>(255, RATE, 8, 56, 0);
        assert_eq!(ark_a, ark_b);
        assert_eq!(mds_a, mds_b);
    }

    #[test]
    fn sponge_is_reproducible() {
        let mut a = new_sponge();
        let mut b = new_sponge();
        a.absorb(&Fr::from(7u64));
        b.absorb(&Fr::from(7u64));
        assert_eq!(
            a.squeeze_native_field_elements(2),
            b.squeeze_native_field_elements(2)
        );
    }

    #[test]
    fn distinct_domains_diverge() {
        assert_ne!(domain_tag(b"pvde/a"), domain_tag(b"pvde/b"));
    }
}
