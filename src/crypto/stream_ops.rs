use rand_mt::Mt;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

/// Splits `material ‖ SHA-512(material)`, read as one big-endian integer, into
/// 32-bit words, least significant word first. Leading zero bytes carry no
/// bits and are skipped; an all-zero integer yields a single zero word.
pub(crate) fn seed_words(material: &[u8]) -> Vec<u32> {
    let mut bytes = Zeroizing::new(Vec::with_capacity(material.len() + 64));
    bytes.extend_from_slice(material);
    bytes.extend_from_slice(&Sha512::digest(material));

    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let mut words: Vec<u32> = bytes[start..]
        .rchunks(4)
        .map(|chunk| chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
        .collect();
    if words.is_empty() {
        words.push(0);
    }
    words
}

/// Derives `len` keystream bytes from the passphrase material.
///
/// MT19937 seeded through `init_by_array` with [`seed_words`]. Each output word
/// contributes its little-endian bytes; the last, partial word keeps only its
/// top bits.
pub fn keystream(material: &[u8], len: usize) -> Zeroizing<Vec<u8>> {
    let words = seed_words(material);
    let mut mt = Mt::new_with_key(words.iter().copied());

    let mut stream = Zeroizing::new(Vec::with_capacity(len));
    while stream.len() < len {
        let take = (len - stream.len()).min(4);
        let word = mt.next_u32() >> (32 - 8 * take);
        stream.extend_from_slice(&word.to_le_bytes()[..take]);
    }
    stream
}

/// Byte-wise exclusive-or of `data` with the keystream, in place.
pub(crate) fn xor_in_place(data: &mut [u8], stream: &[u8]) {
    debug_assert_eq!(data.len(), stream.len());
    for (byte, key) in data.iter_mut().zip(stream) {
        *byte ^= key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_keystream_known_vectors() {
        assert_eq!(
            hex(&keystream(b"alices3cret", 16)),
            "8e9eb2d51b8688f1272b109981f3c526"
        );
        // Partial trailing word keeps its top bits.
        assert_eq!(hex(&keystream(b"alices3cret", 7)), "8e9eb2d58688f1");
        assert_eq!(hex(&keystream(b"", 5)), "2059d1f574");
        assert_eq!(
            hex(&keystream("ü名".as_bytes(), 33)),
            "061051b374f2e8391f2c2c3ecc924eb881171be3a6587d90946b2eb64fa7b2c21b"
        );
    }

    #[test]
    fn test_keystream_empty() {
        assert!(keystream(b"bob", 0).is_empty());
    }

    #[test]
    fn test_keystream_is_prefix_stable_per_word() {
        let long = keystream(b"material", 64);
        let short = keystream(b"material", 32);
        assert_eq!(&long[..32], &short[..]);
    }

    #[test]
    fn test_seed_words_little_endian_order() {
        let words = seed_words(b"ab");
        // 2 material bytes + 64 digest bytes -> 66 bytes -> 17 words
        assert_eq!(words.len(), 17);
        assert_eq!(*words.last().unwrap(), u32::from_be_bytes([0, 0, b'a', b'b']));
    }

    #[test]
    fn test_xor_is_self_inverse() {
        let stream = keystream(b"k", 5);
        let mut data = *b"hello";
        xor_in_place(&mut data, &stream);
        assert_ne!(&data, b"hello");
        xor_in_place(&mut data, &stream);
        assert_eq!(&data, b"hello");
    }
}
