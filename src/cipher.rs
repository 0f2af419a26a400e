//! Delay cipher: a Poseidon duplex stream cipher keyed by the derived
//! symmetric key.
//!
//! The sponge absorbs the two key components, then for every plaintext chunk
//! squeezes a keystream (ciphertext = message + keystream) and absorbs the
//! plaintext back into the state. The final squeezed element travels with the
//! ciphertext as a parity word. The parity is a sanity check only — real
//! integrity comes from the encryption-correctness proof, so decryption
//! output stays provisional until that proof verifies.
//!
//! The native path and the R1CS path ([`encrypt_elements_var`]) are kept side
//! by side and must perform identical sponge transitions.

use ark_bls12_381::Fr;
use ark_crypto_primitives::sponge::{CryptographicSponge, FieldBasedCryptographicSponge};
use ark_ff::Zero;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{fr_from_bytes, fr_to_bytes, SymmetricKey};
use crate::poseidon::{new_sponge, RATE};

/// Fixed message capacity in field elements; the encryption circuit is built
/// for exactly this many.
pub const MESSAGE_CAPACITY: usize = 11;
/// Ciphertext length: message elements plus the parity word.
pub const CIPHER_SIZE: usize = MESSAGE_CAPACITY + 1;
/// Plaintext bytes packed per field element (248 bits < |Fr|).
pub const BYTES_PER_ELEMENT: usize = 31;
/// Longest message one ciphertext can carry.
pub const MAX_MESSAGE_BYTES: usize = MESSAGE_CAPACITY * BYTES_PER_ELEMENT;

/// Published ciphertext: [`CIPHER_SIZE`] field elements as little-endian
/// 32-byte words. Serde-exact; no field may be silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherText([[u8; 32]; CIPHER_SIZE]);

impl CipherText {
    pub fn from_elements(elements: &[Fr; CIPHER_SIZE]) -> Self {
        let mut words = [[0u8; 32]; CIPHER_SIZE];
        for (word, element) in words.iter_mut().zip(elements.iter()) {
            *word = fr_to_bytes(element);
        }
        CipherText(words)
    }

    pub fn to_elements(&self) -> [Fr; CIPHER_SIZE] {
        let mut elements = [Fr::zero(); CIPHER_SIZE];
        for (element, word) in elements.iter_mut().zip(self.0.iter()) {
            *element = fr_from_bytes(word);
        }
        elements
    }
}

/// Encrypt a fixed-size block of field elements.
pub fn encrypt_elements(data: &[Fr; MESSAGE_CAPACITY], key: &SymmetricKey) -> [Fr; CIPHER_SIZE] {
    let key = key.to_elements();
    let mut sponge = new_sponge();
    sponge.absorb(&key.to_vec());

    let mut cipher = [Fr::zero(); CIPHER_SIZE];
    let mut filled = 0;
    for chunk in data.chunks(RATE) {
        let keystream = sponge.squeeze_native_field_elements(chunk.len());
        for (message, mask) in chunk.iter().zip(keystream.iter()) {
            cipher[filled] = *message + *mask;
            filled += 1;
        }
        sponge.absorb(&chunk.to_vec());
    }
    cipher[MESSAGE_CAPACITY] = sponge.squeeze_native_field_elements(1)[0];
    cipher
}

/// Decrypt a fixed-size block and check the parity word.
pub fn decrypt_elements(
    cipher: &[Fr; CIPHER_SIZE],
    key: &SymmetricKey,
) -> Result<[Fr; MESSAGE_CAPACITY]> {
    let key = key.to_elements();
    let mut sponge = new_sponge();
    sponge.absorb(&key.to_vec());

    let mut data = [Fr::zero(); MESSAGE_CAPACITY];
    let mut filled = 0;
    for chunk in cipher[..MESSAGE_CAPACITY].chunks(RATE) {
        let keystream = sponge.squeeze_native_field_elements(chunk.len());
        for (encrypted, mask) in chunk.iter().zip(keystream.iter()) {
            data[filled] = *encrypted - *mask;
            filled += 1;
        }
        sponge.absorb(&data[filled - chunk.len()..filled].to_vec());
    }

    let parity = sponge.squeeze_native_field_elements(1)[0];
    if parity != cipher[MESSAGE_CAPACITY] {
        return Err(Error::CipherIntegrity);
    }
    Ok(data)
}

/// Encrypt a UTF-8 message, zero-padded to the fixed block size.
///
/// Padding and message NUL bytes are indistinguishable: decryption trims
/// trailing `\0` bytes, and a chunk-leading `\0` inside the message does not
/// survive the round trip. Callers with NUL-bearing payloads must apply
/// their own framing.
pub fn encrypt(message: &str, key: &SymmetricKey) -> Result<CipherText> {
    let data = pack_message(message)?;
    Ok(CipherText::from_elements(&encrypt_elements(&data, key)))
}

/// Decrypt back to a UTF-8 message, stripping the zero padding.
pub fn decrypt(cipher: &CipherText, key: &SymmetricKey) -> Result<String> {
    let data = decrypt_elements(&cipher.to_elements(), key)?;
    unpack_message(&data)
}

/// Pack message bytes big-endian, [`BYTES_PER_ELEMENT`] per field element.
pub fn pack_message(message: &str) -> Result<[Fr; MESSAGE_CAPACITY]> {
    let bytes = message.as_bytes();
    if bytes.len() > MAX_MESSAGE_BYTES {
        return Err(Error::MessageTooLong { len: bytes.len(), max: MAX_MESSAGE_BYTES });
    }
    let mut data = [Fr::zero(); MESSAGE_CAPACITY];
    for (slot, chunk) in data.iter_mut().zip(bytes.chunks(BYTES_PER_ELEMENT)) {
        let packed = BigUint::from_bytes_be(chunk);
        let mut word = [0u8; 32];
        let le = packed.to_bytes_le();
        word[..le.len()].copy_from_slice(&le);
        *slot = fr_from_bytes(&word);
    }
    Ok(data)
}

/// Inverse of [`pack_message`]. Trailing zero padding is dropped, matching
/// the packing's inability to carry leading zero bytes in a chunk.
pub fn unpack_message(data: &[Fr; MESSAGE_CAPACITY]) -> Result<String> {
    let mut bytes = Vec::with_capacity(MAX_MESSAGE_BYTES);
    for element in data {
        let word = fr_to_bytes(element);
        let packed = BigUint::from_bytes_le(&word);
        bytes.extend_from_slice(&packed.to_bytes_be());
    }
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|e| Error::Crypto(format!("decrypted bytes are not UTF-8: {e}")))
}

use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::poseidon::POSEIDON_FR_PARAMS;

/// R1CS mirror of [`encrypt_elements`]: same key absorption, same chunking,
/// same parity word. Returns [`CIPHER_SIZE`] ciphertext variables.
pub fn encrypt_elements_var(
    cs: ConstraintSystemRef<Fr>,
    data: &[FpVar<Fr>],
    key: &[FpVar<Fr>; 2],
) -> core::result::Result<Vec<FpVar<Fr>>, SynthesisError> {
    debug_assert_eq!(data.len(), MESSAGE_CAPACITY);
    let mut sponge = PoseidonSpongeVar::new(cs, &POSEIDON_FR_PARAMS);
    sponge.absorb(&key.to_vec())?;

    let mut cipher = Vec::with_capacity(CIPHER_SIZE);
    for chunk in data.chunks(RATE) {
        let keystream = sponge.squeeze_field_elements(chunk.len())?;
        for (message, mask) in chunk.iter().zip(keystream.iter()) {
            cipher.push(message + mask);
        }
        sponge.absorb(&chunk.to_vec())?;
    }
    cipher.push(sponge.squeeze_field_elements(1)?[0].clone());
    Ok(cipher)
}
