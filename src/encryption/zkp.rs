//! Groth16 prove/verify entry points for the encryption-correctness relation.

use ark_bls12_381::{Bls12_381, Fr};
use ark_groth16::{prepare_verifying_key, Groth16, Proof, ProvingKey, VerifyingKey};
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::cipher::{encrypt_elements, pack_message};
use crate::encryption::circuit::EncryptionCircuit;
use crate::encryption::{EncryptionPublicInput, EncryptionSecretInput};
use crate::error::{Error, Result};
use crate::hash::{derive_key, hash_commitment};
use crate::io::{deserialize_canonical, serialize_canonical};

/// Generate the proving/verifying key pair. The relation has no modulus
/// dependency, so one pair serves every parameter epoch.
pub fn setup(
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(ProvingKey<Bls12_381>, VerifyingKey<Bls12_381>)> {
    let circuit = EncryptionCircuit::blank();
    let proving_key = Groth16::<Bls12_381>::generate_random_parameters_with_reduction(circuit, rng)
        .map_err(|e| Error::Crypto(format!("encryption-correctness setup failed: {e}")))?;
    let verifying_key = proving_key.vk.clone();
    Ok((proving_key, verifying_key))
}

/// Prove the published ciphertext encrypts the witness message under the key
/// derived from the committed secret. Inputs are cross-checked first so
/// either a complete valid proof is produced or nothing is.
pub fn prove(
    proving_key: &ProvingKey<Bls12_381>,
    public: &EncryptionPublicInput,
    secret: &EncryptionSecretInput,
) -> Result<Vec<u8>> {
    let k_hash = hash_commitment(&secret.k)?;
    if k_hash != public.k_hash_value {
        return Err(Error::Crypto("secret does not hash to the published commitment".into()));
    }
    let data = pack_message(&secret.data)?;
    let key = derive_key(&secret.k)?;
    let cipher = encrypt_elements(&data, &key);
    if cipher != public.encrypted_data.to_elements() {
        return Err(Error::Crypto("witness does not encrypt to the published ciphertext".into()));
    }

    let circuit =
        EncryptionCircuit::with_witness(secret.k.clone(), data, cipher, k_hash.to_elements());
    let proof =
        Groth16::<Bls12_381>::create_random_proof_with_reduction(circuit, proving_key, &mut OsRng)
            .map_err(|e| Error::Crypto(format!("encryption-correctness proving failed: {e}")))?;
    serialize_canonical(&proof)
}

/// Verify proof bytes against the published public input. Secret-independent;
/// malformed bytes yield `false`, never a panic.
pub fn verify(
    verifying_key: &VerifyingKey<Bls12_381>,
    public: &EncryptionPublicInput,
    proof_bytes: &[u8],
) -> bool {
    let proof: Proof<Bls12_381> = match deserialize_canonical(proof_bytes) {
        Ok(proof) => proof,
        Err(_) => return false,
    };
    let inputs = assemble_public_inputs(public);

    let prepared = prepare_verifying_key(verifying_key);
    if inputs.len() + 1 != prepared.vk.gamma_abc_g1.len() {
        return false;
    }
    let prepared_inputs = match Groth16::<Bls12_381>::prepare_inputs(&prepared, &inputs) {
        Ok(prepared_inputs) => prepared_inputs,
        Err(_) => return false,
    };
    Groth16::<Bls12_381>::verify_proof_with_prepared_inputs(&prepared, &proof, &prepared_inputs)
        .unwrap_or(false)
}

/// Field-element assembly matching the circuit's input allocation order.
pub(crate) fn assemble_public_inputs(public: &EncryptionPublicInput) -> Vec<Fr> {
    let mut inputs = public.encrypted_data.to_elements().to_vec();
    inputs.extend(public.k_hash_value.to_elements());
    inputs
}
