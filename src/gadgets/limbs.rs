//! 64-bit limb gadgets for the non-native RSA-group relation.
//!
//! The puzzle-correctness circuit must enforce `k * k = q * n + k_two` over
//! 2048-bit integers inside the BLS12-381 scalar field. Values are split into
//! 64-bit limbs (witnesses bit-decomposed for range soundness), the schoolbook
//! product is accumulated per column, and the two sides are equated through a
//! carry chain. Carries can be negative column-locally, so they are allocated
//! shifted by [`CARRY_OFFSET_BITS`] and range-checked to [`CARRY_BITS`] bits.

use ark_bls12_381::Fr;
use ark_ff::PrimeField;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::group::{decompose_biguint, LIMB_COUNT, LIMB_WIDTH};

/// Columns of the schoolbook product of two [`LIMB_COUNT`]-limb values.
pub const COLUMNS: usize = 2 * LIMB_COUNT - 1;
/// Shifted-carry range: |true carry| < 2^70, offset 2^72, so 73 bits suffice.
pub const CARRY_BITS: usize = 73;
const CARRY_OFFSET_BITS: usize = 72;

fn carry_offset() -> BigInt {
    BigInt::from(1) << CARRY_OFFSET_BITS
}

/// Allocate `value` as a witness restricted to `bits` bits: one Boolean per
/// bit, recomposed into a single field variable.
pub fn alloc_ranged(
    cs: ConstraintSystemRef<Fr>,
    value: &BigUint,
    bits: usize,
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut booleans = Vec::with_capacity(bits);
    for position in 0..bits {
        let bit = value.bit(position as u64);
        booleans.push(Boolean::new_witness(cs.clone(), || Ok(bit))?);
    }
    Boolean::le_bits_to_fp_var(&booleans)
}

/// Allocate a full limb vector, each limb range-checked to [`LIMB_WIDTH`] bits.
pub fn alloc_limbs(
    cs: ConstraintSystemRef<Fr>,
    limbs: &[u64; LIMB_COUNT],
) -> Result<Vec<FpVar<Fr>>, SynthesisError> {
    limbs
        .iter()
        .map(|limb| alloc_ranged(cs.clone(), &BigUint::from(*limb), LIMB_WIDTH))
        .collect()
}

/// In-circuit mirror of `hash::pack_limb_words`: three limbs per field
/// element in base 2^64, the tail element carrying the final two limbs.
pub fn pack_limbs_var(limbs: &[FpVar<Fr>]) -> Vec<FpVar<Fr>> {
    debug_assert_eq!(limbs.len(), LIMB_COUNT);
    let base1 = Fr::from(1u128 << 64);
    let base2 = base1 * base1;

    let mut packed = Vec::with_capacity(LIMB_COUNT / 3 + 1);
    for group in 0..LIMB_COUNT / 3 {
        let element = &limbs[3 * group]
            + &limbs[3 * group + 1] * base1
            + &limbs[3 * group + 2] * base2;
        packed.push(element);
    }
    packed.push(&limbs[LIMB_COUNT - 2] + &limbs[LIMB_COUNT - 1] * base1);
    packed
}

/// Enforce `k * k = q * n + r` over limb vectors, where `n` is a circuit
/// constant and `r` is supplied as (public-input) limb variables.
///
/// `k_limbs`/`q_limbs` must already be range-checked to 64 bits. The concrete
/// limb values are needed alongside the variables to assign carry witnesses;
/// in setup mode the assignments are ignored and only the constraint shape
/// matters.
#[allow(clippy::too_many_arguments)]
pub fn enforce_square_congruence(
    cs: ConstraintSystemRef<Fr>,
    k_limbs: &[FpVar<Fr>],
    k_values: &[u64; LIMB_COUNT],
    q_limbs: &[FpVar<Fr>],
    q_values: &[u64; LIMB_COUNT],
    n: &BigUint,
    r_limbs: &[FpVar<Fr>],
    r_values: &[u64; LIMB_COUNT],
) -> Result<(), SynthesisError> {
    let n_values = decompose_biguint(n).map_err(|_| SynthesisError::Unsatisfiable)?;
    let n_constants: Vec<Fr> = n_values.iter().map(|limb| Fr::from(*limb)).collect();

    // Upper-triangle products of k with itself; the symmetric term is doubled
    // when accumulating columns. 528 multiplications instead of 1024.
    let mut products: Vec<Vec<FpVar<Fr>>> = Vec::with_capacity(LIMB_COUNT);
    for a in 0..LIMB_COUNT {
        let mut row = Vec::with_capacity(LIMB_COUNT - a);
        for b in a..LIMB_COUNT {
            row.push(&k_limbs[a] * &k_limbs[b]);
        }
        products.push(row);
    }

    let mut lhs_columns = vec![FpVar::<Fr>::constant(Fr::from(0u64)); COLUMNS];
    for a in 0..LIMB_COUNT {
        for b in a..LIMB_COUNT {
            let product = &products[a][b - a];
            let column = &mut lhs_columns[a + b];
            if a == b {
                *column += product;
            } else {
                *column += product * Fr::from(2u64);
            }
        }
    }

    let mut rhs_columns = vec![FpVar::<Fr>::constant(Fr::from(0u64)); COLUMNS];
    for a in 0..LIMB_COUNT {
        for b in 0..LIMB_COUNT {
            // Constant-scalar products stay linear; no extra constraints.
            rhs_columns[a + b] += &q_limbs[a] * n_constants[b];
        }
    }
    for (column, r_limb) in rhs_columns.iter_mut().zip(r_limbs.iter()) {
        *column += r_limb;
    }

    let carries = column_carries(k_values, q_values, &n_values, r_values);
    let offset = carry_offset();
    let offset_fr = bigint_to_fr(&offset);
    let base = Fr::from(1u128 << LIMB_WIDTH);

    let mut carry_vars = Vec::with_capacity(COLUMNS - 1);
    for carry in carries.iter().take(COLUMNS - 1) {
        let shifted = (carry + &offset)
            .to_biguint()
            .ok_or(SynthesisError::Unsatisfiable)?;
        carry_vars.push(alloc_ranged(cs.clone(), &shifted, CARRY_BITS)?);
    }

    // Column i: lhs_i + c_{i-1} = rhs_i + c_i * 2^64, with shifted carries
    // c' = c + 2^72 so both sides stay non-negative in the field.
    for i in 0..COLUMNS {
        let carry_in = if i == 0 {
            FpVar::constant(offset_fr)
        } else {
            carry_vars[i - 1].clone()
        };
        let carry_out = if i == COLUMNS - 1 {
            FpVar::constant(offset_fr)
        } else {
            carry_vars[i].clone()
        };
        let lhs = &lhs_columns[i] + &carry_in + FpVar::constant(offset_fr * base);
        let rhs = &rhs_columns[i] + &carry_out * base + FpVar::constant(offset_fr);
        lhs.enforce_equal(&rhs)?;
    }
    Ok(())
}

/// Prover-side carry assignments for the column equations. For a satisfying
/// witness the final carry is zero; garbage inputs (blank setup circuits)
/// simply produce unsatisfiable assignments, which setup mode ignores.
fn column_carries(
    k: &[u64; LIMB_COUNT],
    q: &[u64; LIMB_COUNT],
    n: &[u64; LIMB_COUNT],
    r: &[u64; LIMB_COUNT],
) -> Vec<BigInt> {
    let mut difference = vec![BigInt::zero(); COLUMNS];
    for a in 0..LIMB_COUNT {
        for b in 0..LIMB_COUNT {
            let product = BigInt::from(k[a] as u128 * k[b] as u128)
                - BigInt::from(q[a] as u128 * n[b] as u128);
            difference[a + b] += product;
        }
    }
    for (column, limb) in difference.iter_mut().zip(r.iter()) {
        *column -= BigInt::from(*limb);
    }

    let mut carries = Vec::with_capacity(COLUMNS);
    let mut carry = BigInt::zero();
    for column in &difference {
        carry = (column + &carry) >> LIMB_WIDTH;
        carries.push(carry.clone());
    }
    carries
}

fn bigint_to_fr(value: &BigInt) -> Fr {
    let magnitude = value.magnitude().to_bytes_le();
    Fr::from_le_bytes_mod_order(&magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;
    use ark_r1cs_std::R1CSVar;
    use num_bigint::RandBigInt;

    fn test_modulus() -> BigUint {
        // Odd 2048-bit value; only the limb algebra is under test here.
        (BigUint::from(1u32) << 2047) + 990001u32
    }

    #[test]
    fn square_congruence_satisfied_for_valid_witness() {
        let n = test_modulus();
        let mut rng = ark_std::test_rng();
        let k = rng.gen_biguint(2040) % &n;
        let k_squared = &k * &k;
        let q = &k_squared / &n;
        let r = &k_squared % &n;

        let k_values = decompose_biguint(&k).unwrap();
        let q_values = decompose_biguint(&q).unwrap();
        let r_values = decompose_biguint(&r).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let k_limbs = alloc_limbs(cs.clone(), &k_values).unwrap();
        let q_limbs = alloc_limbs(cs.clone(), &q_values).unwrap();
        let r_limbs = alloc_limbs(cs.clone(), &r_values).unwrap();

        enforce_square_congruence(
            cs.clone(),
            &k_limbs,
            &k_values,
            &q_limbs,
            &q_values,
            &n,
            &r_limbs,
            &r_values,
        )
        .unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn square_congruence_rejects_wrong_remainder() {
        let n = test_modulus();
        let k = BigUint::from(0xdeadbeefcafeu64);
        let k_squared = &k * &k;
        let q = &k_squared / &n;
        let r = (&k_squared % &n) + 1u32;

        let k_values = decompose_biguint(&k).unwrap();
        let q_values = decompose_biguint(&q).unwrap();
        let r_values = decompose_biguint(&r).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        let k_limbs = alloc_limbs(cs.clone(), &k_values).unwrap();
        let q_limbs = alloc_limbs(cs.clone(), &q_values).unwrap();
        let r_limbs = alloc_limbs(cs.clone(), &r_values).unwrap();

        enforce_square_congruence(
            cs.clone(),
            &k_limbs,
            &k_values,
            &q_limbs,
            &q_values,
            &n,
            &r_limbs,
            &r_values,
        )
        .unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn packed_limbs_match_host_packing() {
        let value = BigUint::from(u128::MAX) << 700;
        let limbs = decompose_biguint(&value).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        let limb_vars = alloc_limbs(cs.clone(), &limbs).unwrap();
        let packed_vars = pack_limbs_var(&limb_vars);
        let packed_host = crate::hash::pack_limb_words(&limbs);
        for (var, host) in packed_vars.iter().zip(packed_host.iter()) {
            assert_eq!(var.value().unwrap(), *host);
        }
    }
}
