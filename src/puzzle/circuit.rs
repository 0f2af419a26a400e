//! Puzzle-correctness circuit.
//!
//! Relation: there exists `k` such that `k_hash_value = H1(k)` and
//! `k_two = k^2 mod n`. Public inputs are the 32 limbs of `k_two` followed by
//! the two digest elements of `k_hash_value`; the witness is the limb
//! decomposition of `k` and of the quotient `q = k^2 div n`. The modulus is a
//! circuit constant, so proving and verifying keys are bound to one parameter
//! epoch — a proof never verifies against keys from another epoch.

use ark_bls12_381::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use num_bigint::BigUint;
use num_traits::Zero as _;

use crate::gadgets::limbs::{alloc_limbs, enforce_square_congruence, pack_limbs_var};
use crate::gadgets::poseidon_digest_var;
use crate::group::decompose_biguint;
use crate::hash::COMMITMENT_DOMAIN;

#[derive(Clone)]
pub struct KeyValidationCircuit {
    pub n: BigUint,
    pub k: Option<BigUint>,
    pub k_two: Option<BigUint>,
    pub k_hash: Option<[Fr; 2]>,
}

impl KeyValidationCircuit {
    /// Structure-only instance for key generation.
    pub fn blank(n: BigUint) -> Self {
        Self { n, k: None, k_two: None, k_hash: None }
    }

    pub fn with_witness(n: BigUint, k: BigUint, k_two: BigUint, k_hash: [Fr; 2]) -> Self {
        Self { n, k: Some(k), k_two: Some(k_two), k_hash: Some(k_hash) }
    }
}

impl ConstraintSynthesizer<Fr> for KeyValidationCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let k = self.k.unwrap_or_default();
        let k_two = self.k_two.unwrap_or_default();
        let k_hash = self.k_hash.unwrap_or([Fr::from(0u64); 2]);
        if self.n.is_zero() {
            return Err(SynthesisError::Unsatisfiable);
        }
        let quotient = (&k * &k) / &self.n;

        let k_values = decompose_biguint(&k).map_err(|_| SynthesisError::Unsatisfiable)?;
        let q_values = decompose_biguint(&quotient).map_err(|_| SynthesisError::Unsatisfiable)?;
        let r_values = decompose_biguint(&k_two).map_err(|_| SynthesisError::Unsatisfiable)?;

        // Public inputs, in verification order: k_two limbs, then the digest.
        let mut r_limbs = Vec::with_capacity(r_values.len());
        for limb in r_values.iter() {
            r_limbs.push(FpVar::new_input(cs.clone(), || Ok(Fr::from(*limb)))?);
        }
        let hash_inputs = [
            FpVar::new_input(cs.clone(), || Ok(k_hash[0]))?,
            FpVar::new_input(cs.clone(), || Ok(k_hash[1]))?,
        ];

        let k_limbs = alloc_limbs(cs.clone(), &k_values)?;
        let q_limbs = alloc_limbs(cs.clone(), &q_values)?;

        enforce_square_congruence(
            cs.clone(),
            &k_limbs,
            &k_values,
            &q_limbs,
            &q_values,
            &self.n,
            &r_limbs,
            &r_values,
        )?;

        let packed = pack_limbs_var(&k_limbs);
        let digest = poseidon_digest_var(cs, COMMITMENT_DOMAIN, &packed)?;
        digest[0].enforce_equal(&hash_inputs[0])?;
        digest[1].enforce_equal(&hash_inputs[1])?;
        Ok(())
    }
}
