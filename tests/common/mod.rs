//! Shared SNARK fixtures. Groth16 setup over the 2048-bit limb circuits is
//! expensive, so each test binary builds the keys once behind a `Lazy`.

use ark_bls12_381::Bls12_381;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use once_cell::sync::Lazy;

use pvde::encryption;
use pvde::puzzle::{self, TimeLockPuzzleParam};

pub struct Fixture {
    pub param: TimeLockPuzzleParam,
    pub puzzle_pk: ProvingKey<Bls12_381>,
    pub puzzle_vk: VerifyingKey<Bls12_381>,
    pub encryption_pk: ProvingKey<Bls12_381>,
    pub encryption_vk: VerifyingKey<Bls12_381>,
}

pub static FIXTURE: Lazy<Fixture> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(0xde1a7);
    let param = puzzle::generate_param(16).expect("standard parameters");
    let (puzzle_pk, puzzle_vk) = puzzle::zkp::setup(&param, &mut rng).expect("puzzle setup");
    let (encryption_pk, encryption_vk) =
        encryption::zkp::setup(&mut rng).expect("encryption setup");
    Fixture { param, puzzle_pk, puzzle_vk, encryption_pk, encryption_vk }
});
