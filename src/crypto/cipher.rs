use zeroize::Zeroizing;

use super::key::PassphraseKey;
use super::stream_ops::{keystream, xor_in_place};

/// Seed-derived XOR stream cipher.
///
/// The keystream depends only on the passphrase material and the payload
/// length, so equal plaintexts encrypt to equal ciphertexts.
pub struct Cypher {
    pub(super) key: PassphraseKey,
}

impl Cypher {
    pub const fn new(key: PassphraseKey) -> Self {
        Self { key }
    }

    pub fn from_credentials(identifier: &str, secret: &str) -> Self {
        Self::new(PassphraseKey::new(identifier, secret))
    }

    pub const fn key(&self) -> &PassphraseKey {
        &self.key
    }

    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        let mut result = data.to_vec();
        let stream = keystream(self.key.as_bytes(), result.len());
        xor_in_place(&mut result, &stream);
        result
    }

    pub fn decrypt(&self, data: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut result = Zeroizing::new(data.to_vec());
        let stream = keystream(self.key.as_bytes(), result.len());
        xor_in_place(&mut result, &stream);
        result
    }
}
