//! Credential digests stored in place of plaintext passwords.
//!
//! The digest is unsalted SHA-256: the same password always produces the same
//! digest, across every user. Lookups depend on that property, so changing the
//! scheme requires migrating stored rows.

use sha2::{Digest, Sha256};

#[must_use]
pub fn hash_credential(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

#[must_use]
pub fn verify_credential(plaintext: &str, stored: &str) -> bool {
    hash_credential(plaintext) == stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_credential_is_sha256_hex() {
        assert_eq!(
            hash_credential("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn identical_credentials_hash_identically() {
        assert_eq!(hash_credential("hunter2"), hash_credential("hunter2"));
        assert_ne!(hash_credential("hunter2"), hash_credential("hunter3"));
    }

    #[test]
    fn verify_credential_matches_only_the_same_plaintext() {
        let stored = hash_credential("secret");
        assert!(verify_credential("secret", &stored));
        assert!(!verify_credential("Secret", &stored));
        assert!(!verify_credential("", &stored));
    }
}
