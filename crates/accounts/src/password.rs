//! Salted password hashing (PBKDF2-HMAC-SHA256).
//!
//! Encoded form: `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const ALGORITHM: &str = "pbkdf2_sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

pub const DEFAULT_ITERATIONS: u32 = 260_000;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("iteration count must be positive")]
    ZeroIterations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self, PasswordError> {
        if iterations == 0 {
            return Err(PasswordError::ZeroIterations);
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        self.hash_with_salt(password, &salt)
    }

    fn hash_with_salt(&self, password: &str, salt: &[u8]) -> String {
        let derived = derive(password.as_bytes(), salt, self.iterations);
        format!(
            "{ALGORITHM}${}${}${}",
            self.iterations,
            BASE64.encode(salt),
            BASE64.encode(derived)
        )
    }

    /// Check `password` against an encoded hash. Malformed encodings never verify.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Some((iterations, salt, expected)) = decode(encoded) else {
            return false;
        };
        let actual = derive(password.as_bytes(), &salt, iterations);
        actual.as_slice().ct_eq(&expected).into()
    }

    /// Burn the same work as a real verification. Used for unknown usernames
    /// so response timing does not reveal which accounts exist.
    pub fn verify_decoy(&self, password: &str) {
        let _ = derive(password.as_bytes(), &[0u8; SALT_LEN], self.iterations);
    }
}

fn decode(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != ALGORITHM {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok().filter(|n| *n > 0)?;
    let salt = BASE64.decode(parts.next()?).ok()?;
    let hash = BASE64.decode(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((iterations, salt, hash))
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}
