//! Canonical serialization for cross-boundary byte blobs.
//!
//! Proofs and proving/verifying keys cross the protocol boundary as opaque,
//! immutable byte buffers. Deserialization always validates (`Validate::Yes`)
//! so malformed blobs are rejected at the boundary instead of corrupting a
//! later prove/verify call. Key provisioning (fetching, caching) is the
//! caller's concern; these helpers only translate bytes.

use ark_bls12_381::Bls12_381;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};

use crate::error::Result;

/// Serialize to canonical compressed bytes.
pub fn serialize_canonical<T: CanonicalSerialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    value.serialize_with_mode(&mut out, Compress::Yes)?;
    Ok(out)
}

/// Deserialize with canonical validation from a byte slice.
pub fn deserialize_canonical<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T> {
    let mut cursor = std::io::Cursor::new(bytes);
    Ok(T::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)?)
}

/// Export a proving key as an opaque blob.
pub fn export_proving_key(proving_key: &ProvingKey<Bls12_381>) -> Result<Vec<u8>> {
    serialize_canonical(proving_key)
}

/// Import a proving key from an opaque blob.
pub fn import_proving_key(bytes: &[u8]) -> Result<ProvingKey<Bls12_381>> {
    deserialize_canonical(bytes)
}

/// Export a verifying key as an opaque blob.
pub fn export_verifying_key(verifying_key: &VerifyingKey<Bls12_381>) -> Result<Vec<u8>> {
    serialize_canonical(verifying_key)
}

/// Import a verifying key from an opaque blob.
pub fn import_verifying_key(bytes: &[u8]) -> Result<VerifyingKey<Bls12_381>> {
    deserialize_canonical(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;

    #[test]
    fn field_element_round_trip() {
        use ark_ff::One;
        let value = Fr::one();
        let bytes = serialize_canonical(&value).unwrap();
        let back: Fr = deserialize_canonical(&bytes).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        use ark_ff::One;
        let bytes = serialize_canonical(&Fr::one()).unwrap();
        let result: Result<Fr> = deserialize_canonical(&bytes[..bytes.len() - 1]);
        assert!(result.is_err());
    }
}
