//! Multi-party delay parameter set.
//!
//! A committee shares one RSA group and delay exponent. Each participant
//! publishes `(u, v) = (g^sk, h^sk)` where `h = g^(2^t)`; the products of the
//! published pairs form an aggregated key no proper subset controls. Senders
//! run an ElGamal-style KEM against the aggregated `v`: `c1 = h^r`, shared
//! secret `v^r`, message body under the delay cipher keyed by
//! `derive_key(shared)`. Holders of the combined exponent recover the shared
//! secret as `c1^(sum sk_i)` without any sequential solve.

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::cipher::{self, CipherText};
use crate::error::{Error, Result};
use crate::group::{mod_exp, sequential_square, validate_group_params};
use crate::hash::derive_key;

/// Committee-wide parameters. `h` is deterministic in `(g, n, t)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPartyParams {
    pub n: BigUint,
    pub g: BigUint,
    pub t: u32,
    pub h: BigUint,
    pub max_participants: u32,
}

/// One participant's published key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantKey {
    pub u: BigUint,
    pub v: BigUint,
}

/// One participant's secret exponent. Never published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSecret {
    pub sk: BigUint,
}

/// Product of the committee's published pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedKey {
    pub u: BigUint,
    pub v: BigUint,
}

/// KEM ciphertext: the encapsulation `c1 = h^r` plus the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiPartyCipherText {
    pub c1: BigUint,
    pub body: CipherText,
}

/// Derive committee parameters. The `t` squarings here are a one-time setup
/// cost, not a per-message delay.
pub fn generate_params(
    g: BigUint,
    n: BigUint,
    t: u32,
    max_participants: u32,
) -> Result<MultiPartyParams> {
    validate_group_params(&g, &n, t)?;
    if max_participants == 0 {
        return Err(Error::MalformedParameter("max_participants must be positive".into()));
    }
    let h = sequential_square(&g, t, &n);
    Ok(MultiPartyParams { n, g, t, h, max_participants })
}

/// Sample a fresh participant key pair.
pub fn keygen(
    params: &MultiPartyParams,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<(ParticipantSecret, ParticipantKey)> {
    let sk = sample_secret(rng);
    let u = mod_exp(&params.g, &sk, &params.n);
    let v = mod_exp(&params.h, &sk, &params.n);
    Ok((ParticipantSecret { sk }, ParticipantKey { u, v }))
}

/// Multiply the committee's published pairs into one aggregated key.
pub fn aggregate_keys(
    params: &MultiPartyParams,
    keys: &[ParticipantKey],
) -> Result<AggregatedKey> {
    check_participant_count(params, keys.len())?;
    let mut u = BigUint::from(1u32);
    let mut v = BigUint::from(1u32);
    for key in keys {
        if key.u.is_zero() || key.u >= params.n || key.v.is_zero() || key.v >= params.n {
            return Err(Error::MalformedParameter("participant key outside the group".into()));
        }
        u = (&u * &key.u) % &params.n;
        v = (&v * &key.v) % &params.n;
    }
    Ok(AggregatedKey { u, v })
}

/// Sum the committee's secret exponents; the result decrypts against the
/// matching [`aggregate_keys`] output.
pub fn aggregate_secrets(
    params: &MultiPartyParams,
    secrets: &[ParticipantSecret],
) -> Result<BigUint> {
    check_participant_count(params, secrets.len())?;
    Ok(secrets.iter().fold(BigUint::zero(), |sum, secret| sum + &secret.sk))
}

/// Encrypt a message to the committee.
pub fn encrypt(
    params: &MultiPartyParams,
    key: &AggregatedKey,
    message: &str,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<MultiPartyCipherText> {
    let r = sample_secret(rng);
    let c1 = mod_exp(&params.h, &r, &params.n);
    let shared = mod_exp(&key.v, &r, &params.n);
    let body = cipher::encrypt(message, &derive_key(&shared)?)?;
    Ok(MultiPartyCipherText { c1, body })
}

/// Decrypt with the aggregated secret exponent.
pub fn decrypt(
    params: &MultiPartyParams,
    secret_sum: &BigUint,
    encrypted: &MultiPartyCipherText,
) -> Result<String> {
    let shared = mod_exp(&encrypted.c1, secret_sum, &params.n);
    cipher::decrypt(&encrypted.body, &derive_key(&shared)?)
}

fn check_participant_count(params: &MultiPartyParams, count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::MalformedParameter("empty participant set".into()));
    }
    if count > params.max_participants as usize {
        return Err(Error::TooManyParticipants { count, max: params.max_participants });
    }
    Ok(())
}

/// 256-bit nonzero secret exponent.
fn sample_secret(rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
    loop {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf);
        let value = BigUint::from_bytes_le(&buf);
        if !value.is_zero() {
            return value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{STANDARD_GENERATOR, STANDARD_MODULUS};
    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;

    fn committee_params(max_participants: u32) -> MultiPartyParams {
        let g = BigUint::parse_bytes(STANDARD_GENERATOR.as_bytes(), 10).unwrap();
        let n = BigUint::parse_bytes(STANDARD_MODULUS.as_bytes(), 10).unwrap();
        generate_params(g, n, 8, max_participants).unwrap()
    }

    #[test]
    fn committee_round_trip() {
        let mut rng = StdRng::seed_from_u64(51);
        let params = committee_params(4);

        let pairs: Vec<_> = (0..3).map(|_| keygen(&params, &mut rng).unwrap()).collect();
        let keys: Vec<_> = pairs.iter().map(|(_, key)| key.clone()).collect();
        let secrets: Vec<_> = pairs.into_iter().map(|(secret, _)| secret).collect();

        let aggregated = aggregate_keys(&params, &keys).unwrap();
        let encrypted = encrypt(&params, &aggregated, "committee message", &mut rng).unwrap();

        let secret_sum = aggregate_secrets(&params, &secrets).unwrap();
        assert_eq!(decrypt(&params, &secret_sum, &encrypted).unwrap(), "committee message");
    }

    #[test]
    fn participant_cap_is_enforced() {
        let mut rng = StdRng::seed_from_u64(52);
        let params = committee_params(2);
        let keys: Vec<_> = (0..3).map(|_| keygen(&params, &mut rng).unwrap().1).collect();
        assert!(matches!(
            aggregate_keys(&params, &keys),
            Err(Error::TooManyParticipants { count: 3, max: 2 })
        ));
    }

    #[test]
    fn subset_of_secrets_cannot_decrypt() {
        let mut rng = StdRng::seed_from_u64(53);
        let params = committee_params(4);

        let pairs: Vec<_> = (0..3).map(|_| keygen(&params, &mut rng).unwrap()).collect();
        let keys: Vec<_> = pairs.iter().map(|(_, key)| key.clone()).collect();
        let aggregated = aggregate_keys(&params, &keys).unwrap();
        let encrypted = encrypt(&params, &aggregated, "committee message", &mut rng).unwrap();

        let partial: Vec<_> =
            pairs.iter().take(2).map(|(secret, _)| secret.clone()).collect();
        let partial_sum = aggregate_secrets(&params, &partial).unwrap();
        assert!(decrypt(&params, &partial_sum, &encrypted).is_err());
    }

    #[test]
    fn rejects_out_of_group_participant_key() {
        let mut rng = StdRng::seed_from_u64(54);
        let params = committee_params(4);
        let mut key = keygen(&params, &mut rng).unwrap().1;
        key.v = params.n.clone();
        assert!(aggregate_keys(&params, &[key]).is_err());
    }
}
