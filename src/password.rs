use std::num::NonZeroU32;

use base64::engine::general_purpose;
use base64::Engine;
use ring::rand::SecureRandom;
use ring::{digest, pbkdf2, rand};

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => panic!("iteration count must be non-zero"),
};

// Derives a salted PBKDF2 digest from the plaintext, stored as
// `base64(salt)$base64(digest)`.
pub fn hash_password(plaintext: &str) -> Result<String, ring::error::Unspecified> {
    let rng = rand::SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;

    let mut credential = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        plaintext.as_bytes(),
        &mut credential,
    );

    Ok(format!(
        "{}${}",
        general_purpose::STANDARD.encode(salt),
        general_purpose::STANDARD.encode(credential)
    ))
}

// Checks the plaintext against a stored digest. Malformed stored values
// simply fail verification.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let Some((salt, credential)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = general_purpose::STANDARD.decode(salt) else {
        return false;
    };
    let Ok(credential) = general_purpose::STANDARD.decode(credential) else {
        return false;
    };

    pbkdf2::verify(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        plaintext.as_bytes(),
        &credential,
    )
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_original_password() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(verify_password("hunter2", &hash));
    }

    #[test]
    fn rejects_a_wrong_password() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn never_stores_the_plaintext() {
        let hash = hash_password("hunter2").expect("hash");
        assert_ne!(hash, "hunter2");
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn salts_make_repeated_hashes_distinct() {
        let first = hash_password("hunter2").expect("hash");
        let second = hash_password("hunter2").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_malformed_stored_digests() {
        assert!(!verify_password("hunter2", "definitely-not-a-hash"));
        assert!(!verify_password("hunter2", "AAAA$not!base64"));
        assert!(!verify_password("hunter2", ""));
    }
}
