//! Salted password derivation
//!
//! Every derivation draws a fresh salt from the OS random source. The hash is a
//! deterministic function of the password and the salt, so it can be recomputed
//! from a stored record.

use argon2::Argon2;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::warn;

use crate::domain::user::PasswordCredential;

type HmacSha512 = Hmac<Sha512>;

/// Length of a generated salt, in characters
pub const SALT_LENGTH: usize = 16;

const ARGON2_OUTPUT_LENGTH: usize = 32;

/// Trait for deriving and checking salted password hashes
pub trait CredentialDeriver: Send + Sync + Debug {
    /// Derive a credential with a fresh salt
    fn derive(&self, password: &str) -> PasswordCredential {
        let salt = generate_salt();
        let hash = self.hash_with_salt(password, &salt);
        PasswordCredential::new(hash, salt)
    }

    /// Deterministic hash of `(password, salt)`
    fn hash_with_salt(&self, password: &str, salt: &str) -> String;

    /// Recompute the hash and compare it with the stored one
    fn verify(&self, password: &str, credential: &PasswordCredential) -> bool {
        let computed = self.hash_with_salt(password, &credential.salt);
        constant_time_compare(&computed, &credential.hash)
    }
}

/// HMAC-SHA512 keyed by the salt, hex encoded
///
/// Matches the layout of records created before Argon2 support.
#[derive(Debug, Clone, Default)]
pub struct HmacSha512Deriver;

impl HmacSha512Deriver {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialDeriver for HmacSha512Deriver {
    fn hash_with_salt(&self, password: &str, salt: &str) -> String {
        let mut mac =
            HmacSha512::new_from_slice(salt.as_bytes()).expect("HMAC can take key of any size");
        mac.update(password.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Argon2id raw hash over the salt bytes, hex encoded
#[derive(Debug, Clone, Default)]
pub struct Argon2Deriver;

impl Argon2Deriver {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialDeriver for Argon2Deriver {
    fn hash_with_salt(&self, password: &str, salt: &str) -> String {
        let mut output = [0u8; ARGON2_OUTPUT_LENGTH];

        // Default parameters accept any salt of 8 bytes or more
        Argon2::default()
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut output)
            .expect("Argon2 accepts a 16 byte salt with default parameters");

        hex::encode(output)
    }
}

/// Supported derivation algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeriverAlgorithm {
    #[default]
    HmacSha512,
    Argon2,
}

impl DeriverAlgorithm {
    /// Parse a configured algorithm name, falling back to the default
    pub fn from_config(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(algorithm = %value, "Unknown credential algorithm, using hmac-sha512");
            Self::default()
        })
    }

    pub fn build(&self) -> Box<dyn CredentialDeriver> {
        match self {
            Self::HmacSha512 => Box::new(HmacSha512Deriver::new()),
            Self::Argon2 => Box::new(Argon2Deriver::new()),
        }
    }
}

impl FromStr for DeriverAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hmac-sha512" | "hmac_sha512" | "sha512" => Ok(Self::HmacSha512),
            "argon2" | "argon2id" => Ok(Self::Argon2),
            _ => Err(format!("Unknown credential algorithm: {}", s)),
        }
    }
}

/// Random salt of `SALT_LENGTH` hex characters
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LENGTH / 2];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
