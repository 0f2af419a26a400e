//! Practical Verifiable Delay Encryption over an RSA group
//!
//! This crate implements delay encryption backed by RSW time-lock puzzles:
//! a committer encrypts a message so that anyone can decrypt it after `t`
//! sequential squarings modulo an RSA-2048 modulus, and no one can sooner.
//!
//! Properties:
//! - Commit-and-reveal without a reveal step (the solve is the reveal)
//! - Publicly verifiable commitments (sigma protocol + Groth16 proofs)
//! - Ciphertext bound to the committed secret (encryption-correctness proof)
//! - Solver-side recovery is deterministic and offline
//!
//! The crate also includes a multi-party parameter set where a committee
//! shares the group and an aggregated key replaces the sequential solve.

pub mod cipher;
pub mod encryption;
pub mod error;
pub mod gadgets;
pub mod group;
pub mod hash;
pub mod io;
pub mod multi_party;
pub mod poseidon;
pub mod puzzle;

// Re-exports - Public API
pub use cipher::{CipherText, CIPHER_SIZE, MAX_MESSAGE_BYTES, MESSAGE_CAPACITY};
pub use encryption::{EncryptionPublicInput, EncryptionSecretInput};
pub use error::{Error, Result};
pub use hash::{derive_key, hash_commitment, HashValue, SymmetricKey};
pub use puzzle::{
    generate_param, generate_param_with, generate_puzzle, get_decryption_key, solve, solve_puzzle,
    TimeLockPuzzleParam, TimeLockPuzzlePublicInput, TimeLockPuzzleSecretInput,
};
