//! Encryption-correctness circuit.
//!
//! Relation: there exist `k` and a fixed-size message block `data` such that
//! `k_hash_value = H1(k)` and `encrypted_data = Enc(H2(k), data)`. Public
//! inputs are the [`CIPHER_SIZE`] ciphertext elements followed by the two
//! digest elements; witnesses are the limb decomposition of `k` and the
//! packed message block. The cipher runs in-circuit via
//! [`encrypt_elements_var`], which mirrors the native duplex exactly, so a
//! satisfied circuit pins the published ciphertext to the committed secret.

use ark_bls12_381::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use num_bigint::BigUint;

use crate::cipher::{encrypt_elements_var, CIPHER_SIZE, MESSAGE_CAPACITY};
use crate::gadgets::limbs::{alloc_limbs, pack_limbs_var};
use crate::gadgets::poseidon_digest_var;
use crate::group::decompose_biguint;
use crate::hash::{COMMITMENT_DOMAIN, KEY_DOMAIN};

#[derive(Clone)]
pub struct EncryptionCircuit {
    pub k: Option<BigUint>,
    pub data: Option<[Fr; MESSAGE_CAPACITY]>,
    pub cipher: Option<[Fr; CIPHER_SIZE]>,
    pub k_hash: Option<[Fr; 2]>,
}

impl EncryptionCircuit {
    /// Structure-only instance for key generation.
    pub fn blank() -> Self {
        Self { k: None, data: None, cipher: None, k_hash: None }
    }

    pub fn with_witness(
        k: BigUint,
        data: [Fr; MESSAGE_CAPACITY],
        cipher: [Fr; CIPHER_SIZE],
        k_hash: [Fr; 2],
    ) -> Self {
        Self { k: Some(k), data: Some(data), cipher: Some(cipher), k_hash: Some(k_hash) }
    }
}

impl ConstraintSynthesizer<Fr> for EncryptionCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let k = self.k.unwrap_or_default();
        let data = self.data.unwrap_or([Fr::from(0u64); MESSAGE_CAPACITY]);
        let cipher = self.cipher.unwrap_or([Fr::from(0u64); CIPHER_SIZE]);
        let k_hash = self.k_hash.unwrap_or([Fr::from(0u64); 2]);

        let k_values = decompose_biguint(&k).map_err(|_| SynthesisError::Unsatisfiable)?;

        // Public inputs, in verification order: ciphertext, then the digest.
        let mut cipher_inputs = Vec::with_capacity(CIPHER_SIZE);
        for element in cipher.iter() {
            cipher_inputs.push(FpVar::new_input(cs.clone(), || Ok(*element))?);
        }
        let hash_inputs = [
            FpVar::new_input(cs.clone(), || Ok(k_hash[0]))?,
            FpVar::new_input(cs.clone(), || Ok(k_hash[1]))?,
        ];

        let k_limbs = alloc_limbs(cs.clone(), &k_values)?;
        let mut data_vars = Vec::with_capacity(MESSAGE_CAPACITY);
        for element in data.iter() {
            data_vars.push(FpVar::new_witness(cs.clone(), || Ok(*element))?);
        }

        let packed = pack_limbs_var(&k_limbs);
        let digest = poseidon_digest_var(cs.clone(), COMMITMENT_DOMAIN, &packed)?;
        digest[0].enforce_equal(&hash_inputs[0])?;
        digest[1].enforce_equal(&hash_inputs[1])?;

        let key = poseidon_digest_var(cs.clone(), KEY_DOMAIN, &packed)?;
        let computed = encrypt_elements_var(cs, &data_vars, &key)?;
        for (computed, published) in computed.iter().zip(cipher_inputs.iter()) {
            computed.enforce_equal(published)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{encrypt_elements, pack_message};
    use crate::hash::{derive_key, hash_commitment};
    use ark_relations::r1cs::ConstraintSystem;

    fn witness_circuit(tamper_cipher: bool) -> EncryptionCircuit {
        let k = BigUint::from(0x1234_5678_9abc_def0u64);
        let data = pack_message("the vault combination is 7-21-9").unwrap();
        let key = derive_key(&k).unwrap();
        let mut cipher = encrypt_elements(&data, &key);
        if tamper_cipher {
            cipher[0] += Fr::from(1u64);
        }
        let k_hash = hash_commitment(&k).unwrap().to_elements();
        EncryptionCircuit::with_witness(k, data, cipher, k_hash)
    }

    #[test]
    fn honest_witness_satisfies() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        witness_circuit(false).generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn tampered_ciphertext_is_unsatisfiable() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        witness_circuit(true).generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn blank_circuit_builds_constraints() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        cs.set_mode(ark_relations::r1cs::SynthesisMode::Setup);
        EncryptionCircuit::blank().generate_constraints(cs.clone()).unwrap();
        assert!(cs.num_constraints() > 0);
    }
}
