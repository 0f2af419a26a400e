//! Groth16 prove/verify entry points for the puzzle-correctness relation.
//!
//! Proofs travel as opaque canonical byte blobs. Verification is a pure
//! boolean check: malformed proof bytes, oversized public inputs, or keys
//! from a different parameter epoch all yield `false`, never a panic.

use ark_bls12_381::{Bls12_381, Fr};
use ark_groth16::{prepare_verifying_key, Groth16, Proof, ProvingKey, VerifyingKey};
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::error::{Error, Result};
use crate::group::decompose_biguint;
use crate::hash::hash_commitment;
use crate::io::{deserialize_canonical, serialize_canonical};
use crate::puzzle::circuit::KeyValidationCircuit;
use crate::puzzle::{
    sigma, TimeLockPuzzleParam, TimeLockPuzzlePublicInput, TimeLockPuzzleSecretInput,
};

/// Generate the proving/verifying key pair for one parameter epoch. The
/// modulus is baked into the circuit, so a new epoch needs a new pair.
pub fn setup(
    param: &TimeLockPuzzleParam,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(ProvingKey<Bls12_381>, VerifyingKey<Bls12_381>)> {
    let circuit = KeyValidationCircuit::blank(param.n.clone());
    let proving_key = Groth16::<Bls12_381>::generate_random_parameters_with_reduction(circuit, rng)
        .map_err(|e| Error::Crypto(format!("puzzle-correctness setup failed: {e}")))?;
    let verifying_key = proving_key.vk.clone();
    Ok((proving_key, verifying_key))
}

/// Prove that the published `(k_two, k_hash_value)` commit to the witness
/// secret. The inputs are cross-checked first so either a complete valid
/// proof is produced or nothing is.
pub fn prove(
    param: &TimeLockPuzzleParam,
    proving_key: &ProvingKey<Bls12_381>,
    public: &TimeLockPuzzlePublicInput,
    secret: &TimeLockPuzzleSecretInput,
) -> Result<Vec<u8>> {
    if (&secret.k * &secret.k) % &param.n != public.k_two {
        return Err(Error::Crypto("secret does not square to the published k_two".into()));
    }
    let k_hash = hash_commitment(&secret.k)?;
    if k_hash != public.k_hash_value {
        return Err(Error::Crypto("secret does not hash to the published commitment".into()));
    }

    let circuit = KeyValidationCircuit::with_witness(
        param.n.clone(),
        secret.k.clone(),
        public.k_two.clone(),
        k_hash.to_elements(),
    );
    let proof =
        Groth16::<Bls12_381>::create_random_proof_with_reduction(circuit, proving_key, &mut OsRng)
            .map_err(|e| Error::Crypto(format!("puzzle-correctness proving failed: {e}")))?;
    serialize_canonical(&proof)
}

/// Verify proof bytes against the published public input. Secret-independent.
pub fn verify(
    verifying_key: &VerifyingKey<Bls12_381>,
    public: &TimeLockPuzzlePublicInput,
    proof_bytes: &[u8],
) -> bool {
    let proof: Proof<Bls12_381> = match deserialize_canonical(proof_bytes) {
        Ok(proof) => proof,
        Err(_) => return false,
    };
    let inputs = match assemble_public_inputs(public) {
        Ok(inputs) => inputs,
        Err(_) => return false,
    };

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

/// Full puzzle verification at commit time: the sigma-protocol equations on
/// `(o, k_two, r1, r2, z)` plus the Groth16 proof over `(k_two, k_hash)`.
pub fn verify_puzzle(
    param: &TimeLockPuzzleParam,
    verifying_key: &VerifyingKey<Bls12_381>,
    public: &TimeLockPuzzlePublicInput,
    proof_bytes: &[u8],
) -> bool {
    sigma::verify(public, param) && verify(verifying_key, public, proof_bytes)
}

/// Field-element assembly matching the circuit's input allocation order.
pub(crate) fn assemble_public_inputs(public: &TimeLockPuzzlePublicInput) -> Result<Vec<Fr>> {
    let limbs = decompose_biguint(&public.k_two)?;
    let mut inputs: Vec<Fr> = limbs.iter().map(|limb| Fr::from(*limb)).collect();
    inputs.extend(public.k_hash_value.to_elements());
    Ok(inputs)
}
