//! Tamper-evident values: `value|hex(HMAC-SHA256(secret, value))`.
//!
//! There is no per-value salt, so identical values always sign to identical
//! tokens. The value itself travels in clear text.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SEPARATOR: char = '|';

#[derive(Clone)]
pub struct SecureValue {
    secret: SecretString,
}

impl SecureValue {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self, value: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(value.as_bytes());
        mac
    }

    /// Lowercase hex digest of `value` keyed with the shared secret.
    #[must_use]
    pub fn digest(&self, value: &str) -> String {
        hex::encode(self.mac(value).finalize().into_bytes())
    }

    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        format!("{value}{SEPARATOR}{}", self.digest(value))
    }

    /// Returns the value if the token's digest half matches, `None` otherwise.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<String> {
        // The digest is hex, so the last separator always splits it off.
        let (value, digest) = token.rsplit_once(SEPARATOR)?;

        // Only the canonical lowercase encoding produced by `sign` is accepted.
        if !digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return None;
        }

        let expected = hex::decode(digest).ok()?;
        self.mac(value)
            .verify_slice(&expected)
            .ok()
            .map(|()| value.to_string())
    }
}

impl std::fmt::Debug for SecureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureValue")
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SecureValue {
        SecureValue::new(SecretString::from("imsosecret".to_string()))
    }

    #[test]
    fn sign_embeds_value_and_digest() {
        let codec = codec();
        let token = codec.sign("alice");
        let (value, digest) = token.split_once('|').unwrap_or_default();
        assert_eq!(value, "alice");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, codec.digest("alice"));
    }

    #[test]
    fn sign_is_deterministic() {
        let codec = codec();
        assert_eq!(codec.sign("alice"), codec.sign("alice"));
        assert_ne!(codec.sign("alice"), codec.sign("bob"));
    }

    #[test]
    fn verify_round_trips_assorted_values() {
        let codec = codec();
        for value in ["alice", "", "a|b", "||", "ünïcødé", "with space", "a\nb"] {
            assert_eq!(codec.verify(&codec.sign(value)).as_deref(), Some(value));
        }
    }

    #[test]
    fn verify_rejects_every_single_character_mutation() {
        let codec = codec();
        let token = codec.sign("alice");
        let chars: Vec<char> = token.chars().collect();
        for index in 0..chars.len() {
            for replacement in ['a', 'A', '0', 'f', 'F', '|', 'z'] {
                if chars[index] == replacement {
                    continue;
                }
                let mut mutated = chars.clone();
                mutated[index] = replacement;
                let mutated: String = mutated.into_iter().collect();
                assert_eq!(codec.verify(&mutated), None, "accepted {mutated}");
            }
        }
    }

    #[test]
    fn verify_rejects_malformed_tokens() {
        let codec = codec();
        assert_eq!(codec.verify(""), None);
        assert_eq!(codec.verify("alice"), None);
        assert_eq!(codec.verify("alice|"), None);
        assert_eq!(codec.verify("alice|not-hex"), None);
        assert_eq!(codec.verify("alice|abcd"), None);
    }

    #[test]
    fn verify_rejects_uppercase_digest() {
        let codec = codec();
        let token = codec.sign("alice");
        assert_eq!(codec.verify(&token.to_uppercase()), None);
        let (value, digest) = token.split_once('|').unwrap_or_default();
        assert_eq!(
            codec.verify(&format!("{value}|{}", digest.to_uppercase())),
            None
        );
    }

    #[test]
    fn verify_rejects_tokens_from_another_secret() {
        let other = SecureValue::new(SecretString::from("another".to_string()));
        assert_eq!(codec().verify(&other.sign("alice")), None);
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(!format!("{:?}", codec()).contains("imsosecret"));
    }
}
