use rand_core::{CryptoRngCore, OsRng};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::KeygenError;
use crate::jwk::{Algorithm, RsaPrivateJwk, RsaPublicJwk};

pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::RS256;
pub const DEFAULT_MODULUS_BITS: usize = 4096;

/// RFC 7518 §3.3 forbids shorter keys for the RS* algorithms.
pub const MIN_MODULUS_BITS: usize = 2048;

/// Parameters for a new key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParams {
    pub algorithm: Algorithm,
    pub bits: usize,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM,
            bits: DEFAULT_MODULUS_BITS,
        }
    }
}

impl KeyParams {
    /// Generate a key pair from the operating system's CSPRNG.
    pub fn generate(&self) -> Result<KeyPair, KeygenError> {
        self.generate_with_rng(&mut OsRng)
    }

    /// Errors reported by `rsa` become [`KeygenError::Generation`]. `rsa`
    /// reads `rng` through the infallible `fill_bytes`, so a failing entropy
    /// source panics inside `rsa` instead.
    pub fn generate_with_rng<R: CryptoRngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<KeyPair, KeygenError> {
        if self.bits < MIN_MODULUS_BITS {
            return Err(KeygenError::Generation(format!(
                "Modulus of {} bits is below the {MIN_MODULUS_BITS}-bit minimum for {}",
                self.bits,
                self.algorithm.as_str()
            )));
        }

        tracing::debug!(
            bits = self.bits,
            alg = self.algorithm.as_str(),
            "Generating RSA key"
        );

        let key = RsaPrivateKey::new(rng, self.bits)
            .map_err(|e| KeygenError::Generation(format!("Failed to generate RSA key: {e}")))?;

        let pair = KeyPair {
            key,
            algorithm: self.algorithm,
        };

        tracing::info!(
            bits = pair.bits(),
            alg = pair.algorithm.as_str(),
            kid = %pair.public_jwk().thumbprint(),
            "Generated RSA key pair"
        );

        Ok(pair)
    }
}

/// An RSA key pair tagged with the JWS algorithm it is meant for.
#[derive(Debug, Clone)]
pub struct KeyPair {
    key: RsaPrivateKey,
    algorithm: Algorithm,
}

impl KeyPair {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.key.n().bits()
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.key
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }

    pub fn private_jwk(&self) -> Result<RsaPrivateJwk, KeygenError> {
        RsaPrivateJwk::from_key(&self.key, self.algorithm)
    }

    pub fn public_jwk(&self) -> RsaPublicJwk {
        RsaPublicJwk::from_key(&self.public_key(), self.algorithm)
    }
}

/// Generate a fresh RS256 key pair with a 4096-bit modulus.
pub fn generate() -> Result<KeyPair, KeygenError> {
    KeyParams::default().generate()
}

/// Serialize the full key, private members included, as JWK JSON.
pub fn export_private(pair: &KeyPair) -> Result<String, KeygenError> {
    serde_json::to_string(&pair.private_jwk()?)
        .map_err(|e| KeygenError::Serialization(format!("Failed to encode private JWK: {e}")))
}

/// Serialize only the members needed to verify signatures as JWK JSON.
pub fn export_public(pair: &KeyPair) -> Result<String, KeygenError> {
    serde_json::to_string(&pair.public_jwk())
        .map_err(|e| KeygenError::Serialization(format!("Failed to encode public JWK: {e}")))
}
