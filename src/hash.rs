//! Poseidon commitments over group elements and symmetric key derivation.
//!
//! A group element is decomposed into 64-bit limbs, packed three limbs per
//! field element (base 2^64), and absorbed behind a domain tag. Two squeezed
//! field elements form the digest. The commitment hash and the key-derivation
//! hash share the packing but use distinct domain tags, so publishing
//! `k_hash_value` at commit time reveals nothing about the cipher key.

use ark_bls12_381::Fr;
use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::Result;
use crate::group::{decompose_biguint, LIMB_COUNT};
use crate::poseidon::{domain_tag, new_sponge};

pub const COMMITMENT_DOMAIN: &[u8] = b"pvde/hash/commitment/v1";
pub const KEY_DOMAIN: &[u8] = b"pvde/hash/key/v1";

/// Number of field elements a packed group element occupies: three 64-bit
/// limbs per element, with the final element holding the two leftover limbs.
pub const PACKED_LEN: usize = LIMB_COUNT / 3 + 1;

/// Two-component Poseidon digest of a secret group element, published as the
/// puzzle commitment. Serialized as two little-endian 32-byte words so field
/// presence is exact across the serialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashValue([[u8; 32]; 2]);

impl HashValue {
    pub fn from_elements(elements: [Fr; 2]) -> Self {
        HashValue([fr_to_bytes(&elements[0]), fr_to_bytes(&elements[1])])
    }

    pub fn to_elements(&self) -> [Fr; 2] {
        [fr_from_bytes(&self.0[0]), fr_from_bytes(&self.0[1])]
    }

    pub fn as_bytes(&self) -> &[[u8; 32]; 2] {
        &self.0
    }

    /// Constant-time equality, for checking a freshly recovered secret
    /// against the published commitment.
    pub fn ct_eq(&self, other: &HashValue) -> bool {
        let lhs: Vec<u8> = self.0.iter().flatten().copied().collect();
        let rhs: Vec<u8> = other.0.iter().flatten().copied().collect();
        lhs.ct_eq(&rhs).unwrap_u8() == 1
    }
}

/// Symmetric key material for the delay cipher: a deterministic function of
/// the puzzle secret, structured as two field-element components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetricKey([[u8; 32]; 2]);

impl SymmetricKey {
    pub fn to_elements(&self) -> [Fr; 2] {
        [fr_from_bytes(&self.0[0]), fr_from_bytes(&self.0[1])]
    }
}

pub(crate) fn fr_to_bytes(element: &Fr) -> [u8; 32] {
    let bytes = element.into_bigint().to_bytes_le();
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

pub(crate) fn fr_from_bytes(bytes: &[u8; 32]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

/// Pack the 64-bit limbs of `value` into [`PACKED_LEN`] field elements.
pub fn pack_limbs(value: &BigUint) -> Result<Vec<Fr>> {
    let limbs = decompose_biguint(value)?;
    Ok(pack_limb_words(&limbs))
}

/// Packing over raw limb words; the circuits mirror this with constants.
pub fn pack_limb_words(limbs: &[u64; LIMB_COUNT]) -> Vec<Fr> {
    let base1 = Fr::from(1u128 << 64);
    let base2 = base1 * base1;

    let mut packed = Vec::with_capacity(PACKED_LEN);
    for group in 0..LIMB_COUNT / 3 {
        let a = Fr::from(limbs[3 * group]);
        let b = Fr::from(limbs[3 * group + 1]);
        let c = Fr::from(limbs[3 * group + 2]);
        packed.push(a + base1 * b + base2 * c);
    }
    // 32 = 3 * 10 + 2: the tail element carries the two remaining limbs.
    let tail = Fr::from(limbs[LIMB_COUNT - 2]) + base1 * Fr::from(limbs[LIMB_COUNT - 1]);
    packed.push(tail);
    packed
}

fn hash_with_domain(domain: &[u8], value: &BigUint) -> Result<[Fr; 2]> {
    let mut sponge = new_sponge();
    sponge.absorb(&domain_tag(domain));
    sponge.absorb(&pack_limbs(value)?);
    let squeezed = sponge.squeeze_native_field_elements(2);
    Ok([squeezed[0], squeezed[1]])
}

/// Commitment hash `H1(k)`, published alongside the puzzle.
pub fn hash_commitment(k: &BigUint) -> Result<HashValue> {
    Ok(HashValue::from_elements(hash_with_domain(COMMITMENT_DOMAIN, k)?))
}

/// Key derivation `H2(k)`: collision-resistant map from the group element to
/// the delay-cipher key. Pure function; identical `k` gives an identical key.
pub fn derive_key(k: &BigUint) -> Result<SymmetricKey> {
    let elements = hash_with_domain(KEY_DOMAIN, k)?;
    Ok(SymmetricKey([fr_to_bytes(&elements[0]), fr_to_bytes(&elements[1])]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BigUint {
        BigUint::parse_bytes(b"98765432109876543210987654321098765432109876543210", 10).unwrap()
    }

    #[test]
    fn commitment_is_deterministic() {
        assert_eq!(hash_commitment(&sample()).unwrap(), hash_commitment(&sample()).unwrap());
    }

    #[test]
    fn commitment_and_key_domains_are_separated() {
        let commitment = hash_commitment(&sample()).unwrap();
        let key = derive_key(&sample()).unwrap();
        assert_ne!(commitment.to_elements(), key.to_elements());
    }

    #[test]
    fn nearby_inputs_diverge() {
        let a = hash_commitment(&sample()).unwrap();
        let b = hash_commitment(&(sample() + 1u32)).unwrap();
        assert!(!a.ct_eq(&b));
    }

    #[test]
    fn packing_matches_limb_words() {
        let value = sample();
        let limbs = decompose_biguint(&value).unwrap();
        assert_eq!(pack_limbs(&value).unwrap(), pack_limb_words(&limbs));
        assert_eq!(pack_limbs(&value).unwrap().len(), PACKED_LEN);
    }

    #[test]
    fn hash_value_serde_round_trip() {
        let value = hash_commitment(&sample()).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let back: HashValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
