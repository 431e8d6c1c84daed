use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::KeygenError;

const KEY_TYPE_RSA: &str = "RSA";

/// JWS algorithms an RSA key can be tagged with (RFC 7518 §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    RS256,
    RS384,
    RS512,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
        }
    }
}

/// Public members of an RSA JSON Web Key (RFC 7518 §6.3.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicJwk {
    pub kty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    pub n: String,
    pub e: String,
}

/// Full RSA JSON Web Key, public members plus the private ones
/// (RFC 7518 §6.3.2). Multi-prime keys (`oth`) are not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateJwk {
    #[serde(flatten)]
    pub public: RsaPublicJwk,
    pub d: String,
    pub p: String,
    pub q: String,
    pub dp: String,
    pub dq: String,
    pub qi: String,
}

/// Encode an unsigned integer as Base64urlUInt: minimal big-endian bytes,
/// base64url without padding.
pub fn encode_uint(value: &BigUint) -> String {
    URL_SAFE_NO_PAD.encode(value.to_bytes_be())
}

pub fn decode_uint(member: &str, value: &str) -> Result<BigUint, KeygenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| KeygenError::InvalidKey(format!("Member {member} is not base64url: {e}")))?;
    if bytes.is_empty() {
        return Err(KeygenError::InvalidKey(format!("Member {member} is empty")));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// RFC 7638 JWK thumbprint of an RSA key.
pub fn thumbprint(n: &str, e: &str) -> String {
    // Required members only, lexicographic order, no whitespace.
    let canonical = format!(r#"{{"e":"{e}","kty":"{KEY_TYPE_RSA}","n":"{n}"}}"#);
    URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()))
}

impl RsaPublicJwk {
    /// Build the public document for `key`. The key ID is the JWK thumbprint.
    pub fn from_key(key: &RsaPublicKey, alg: Algorithm) -> Self {
        let n = encode_uint(key.n());
        let e = encode_uint(key.e());
        let kid = thumbprint(&n, &e);

        Self {
            kty: KEY_TYPE_RSA.to_string(),
            alg: Some(alg),
            kid: Some(kid),
            n,
            e,
        }
    }

    pub fn thumbprint(&self) -> String {
        thumbprint(&self.n, &self.e)
    }

    /// Bit length of the decoded modulus.
    pub fn modulus_bits(&self) -> Result<usize, KeygenError> {
        Ok(decode_uint("n", &self.n)?.bits())
    }

    pub fn to_key(&self) -> Result<RsaPublicKey, KeygenError> {
        check_key_type(&self.kty)?;
        let n = decode_uint("n", &self.n)?;
        let e = decode_uint("e", &self.e)?;

        RsaPublicKey::new(n, e)
            .map_err(|e| KeygenError::InvalidKey(format!("Failed to build public key: {e}")))
    }
}

impl RsaPrivateJwk {
    /// Build the full document for `key`, computing the CRT parameters if the
    /// key does not carry them yet.
    pub fn from_key(key: &RsaPrivateKey, alg: Algorithm) -> Result<Self, KeygenError> {
        let mut key = key.clone();
        key.precompute()
            .map_err(|e| KeygenError::InvalidKey(format!("Failed to compute CRT values: {e}")))?;

        let [p, q] = key.primes() else {
            return Err(KeygenError::InvalidKey(format!(
                "Expected 2 primes, found {}",
                key.primes().len()
            )));
        };

        let dp = key
            .dp()
            .ok_or_else(|| KeygenError::InvalidKey("Missing dp".into()))?;
        let dq = key
            .dq()
            .ok_or_else(|| KeygenError::InvalidKey("Missing dq".into()))?;
        let qi = key
            .crt_coefficient()
            .ok_or_else(|| KeygenError::InvalidKey("Missing qi".into()))?;

        Ok(Self {
            public: RsaPublicJwk::from_key(&key.to_public_key(), alg),
            d: encode_uint(key.d()),
            p: encode_uint(p),
            q: encode_uint(q),
            dp: encode_uint(dp),
            dq: encode_uint(dq),
            qi: encode_uint(&qi),
        })
    }

    /// Reconstruct the private key and check its consistency.
    pub fn to_key(&self) -> Result<RsaPrivateKey, KeygenError> {
        check_key_type(&self.public.kty)?;
        let n = decode_uint("n", &self.public.n)?;
        let e = decode_uint("e", &self.public.e)?;
        let d = decode_uint("d", &self.d)?;
        let p = decode_uint("p", &self.p)?;
        let q = decode_uint("q", &self.q)?;

        let mut key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
            .map_err(|e| KeygenError::InvalidKey(format!("Failed to build private key: {e}")))?;
        key.validate()
            .map_err(|e| KeygenError::InvalidKey(format!("Inconsistent private key: {e}")))?;
        key.precompute()
            .map_err(|e| KeygenError::InvalidKey(format!("Failed to compute CRT values: {e}")))?;

        let crt = [
            ("dp", &self.dp, key.dp().cloned()),
            ("dq", &self.dq, key.dq().cloned()),
            ("qi", &self.qi, key.crt_coefficient()),
        ];
        for (member, value, computed) in crt {
            if computed.as_ref() != Some(&decode_uint(member, value)?) {
                return Err(KeygenError::InvalidKey(format!(
                    "Member {member} does not match the key"
                )));
            }
        }

        Ok(key)
    }
}

fn check_key_type(kty: &str) -> Result<(), KeygenError> {
    if kty != KEY_TYPE_RSA {
        return Err(KeygenError::InvalidKey(format!(
            "Expected kty {KEY_TYPE_RSA}, found {kty}"
        )));
    }
    Ok(())
}
