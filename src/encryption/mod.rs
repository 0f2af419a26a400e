//! Delay encryption: the message API over the cipher, plus the
//! encryption-correctness proof.
//!
//! The committer derives the symmetric key from the puzzle secret, encrypts,
//! and proves in zero knowledge that the published ciphertext really is the
//! encryption of the witness message under the key derived from the same `k`
//! that `k_hash_value` commits to. A solver who recovers `k` after the delay
//! derives the identical key and decrypts.

pub mod circuit;
pub mod zkp;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::cipher::{self, CipherText};
use crate::error::Result;
use crate::hash::{derive_key, HashValue, SymmetricKey};

/// Published alongside the puzzle: ciphertext plus the secret commitment
/// shared with [`crate::puzzle::TimeLockPuzzlePublicInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionPublicInput {
    pub encrypted_data: CipherText,
    pub k_hash_value: HashValue,
}

/// Committer-only witness for the encryption-correctness proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionSecretInput {
    pub data: String,
    pub k: BigUint,
}

/// Encrypt a message under the key derived from the puzzle secret.
///
/// Messages are zero-padded to the cipher block; see [`cipher::encrypt`] for
/// the NUL-byte caveat this implies.
pub fn encrypt(message: &str, k: &BigUint) -> Result<CipherText> {
    let key = derive_key(k)?;
    cipher::encrypt(message, &key)
}

/// Decrypt with an already-derived symmetric key (the solver path).
pub fn decrypt(encrypted: &CipherText, key: &SymmetricKey) -> Result<String> {
    cipher::decrypt(encrypted, key)
}
