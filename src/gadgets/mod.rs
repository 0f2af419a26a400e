//! R1CS gadgets shared by the two proof circuits.

pub mod limbs;

use ark_bls12_381::Fr;
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::{domain_tag, POSEIDON_FR_PARAMS};

/// In-circuit mirror of the host-side domain-tagged Poseidon digest:
/// absorb the tag, absorb the packed limbs, squeeze two elements.
pub fn poseidon_digest_var(
    cs: ConstraintSystemRef<Fr>,
    domain: &[u8],
    packed: &[FpVar<Fr>],
) -> Result<[FpVar<Fr>; 2], SynthesisError> {
    let mut sponge = PoseidonSpongeVar::new(cs, &POSEIDON_FR_PARAMS);
    sponge.absorb(&FpVar::constant(domain_tag(domain)))?;
    sponge.absorb(&packed.to_vec())?;
    let squeezed = sponge.squeeze_field_elements(2)?;
    Ok([squeezed[0].clone(), squeezed[1].clone()])
}
