// src/error.rs

/// Failure modes surfaced by the delay-encryption protocol.
///
/// Proof verification failure is deliberately *not* represented here: the
/// `verify` entry points return `bool`, and a negative result is a normal
/// outcome the caller branches on.
#[derive(Debug)]
pub enum Error {
    /// Invalid modulus, generator, or time exponent. Rejected before any
    /// computation proceeds.
    MalformedParameter(String),
    /// Plaintext exceeds the fixed message capacity of the delay cipher.
    MessageTooLong { len: usize, max: usize },
    /// The duplex parity word did not match during decryption. The cipher
    /// carries no real authentication; treat every decryption as provisional
    /// until corroborated by an encryption-correctness proof.
    CipherIntegrity,
    /// The recovered secret failed its commitment checks
    /// (`Hash(k) == k_hash_value` and `k^2 mod n == k_two`): corrupted public
    /// input or a non-matching parameter epoch.
    SolveMismatch,
    /// Key aggregation exceeded the session participant bound.
    TooManyParticipants { count: usize, max: u32 },
    /// Canonical (de)serialization of proofs or key material failed.
    Serialization(String),
    /// Other cryptographic failure with context.
    Crypto(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MalformedParameter(msg) => write!(f, "malformed parameter: {msg}"),
            Error::MessageTooLong { len, max } => {
                write!(f, "message of {len} bytes exceeds cipher capacity of {max}")
            }
            Error::CipherIntegrity => write!(f, "cipher parity check failed"),
            Error::SolveMismatch => {
                write!(f, "recovered secret does not satisfy the published commitments")
            }
            Error::TooManyParticipants { count, max } => {
                write!(f, "{count} participants exceed the session bound of {max}")
            }
            Error::Serialization(msg) => write!(f, "serialization failure: {msg}"),
            Error::Crypto(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ark_serialize::SerializationError> for Error {
    fn from(err: ark_serialize::SerializationError) -> Self {
        Error::Serialization(err.to_string())
    }
}
