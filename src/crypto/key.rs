use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Passphrase material: identifier followed by secret.
///
/// The same bytes seed the keystream and feed the stored verification digest.
#[derive(Clone)]
pub struct PassphraseKey {
    material: Zeroizing<String>,
}

impl PassphraseKey {
    pub fn new(identifier: &str, secret: &str) -> Self {
        let mut material = Zeroizing::new(String::with_capacity(identifier.len() + secret.len()));
        material.push_str(identifier);
        material.push_str(secret);
        Self { material }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.material.as_bytes()
    }

    /// Lowercase hex SHA-256 of the material, as stored on the second line.
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.as_bytes()))
    }

    pub fn verify_digest(&self, stored: &str) -> bool {
        stored.trim() == self.digest()
    }
}

impl std::fmt::Debug for PassphraseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PassphraseKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_of_concatenation() {
        let key = PassphraseKey::new("alice", "s3cret");
        assert_eq!(
            key.digest(),
            "d2c49263e049309518a34881b88f76c1ab8796999d2d0a249b4d43dc27d7cf54"
        );
        assert!(key.verify_digest(
            "d2c49263e049309518a34881b88f76c1ab8796999d2d0a249b4d43dc27d7cf54\n"
        ));
        assert!(!PassphraseKey::new("alice", "wrong").verify_digest(&key.digest()));
    }

    #[test]
    fn test_debug_hides_material() {
        let key = PassphraseKey::new("alice", "s3cret");
        assert!(!format!("{key:?}").contains("s3cret"));
    }
}
