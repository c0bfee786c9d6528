use crate::constants::FORMAT_TAG;
use crate::error::{KeychainError, Result};

/// On-disk layouts this crate can read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFormat {
    /// Three lines: tag, passphrase digest, base64 payload.
    #[default]
    Keychain,
}

impl FileFormat {
    /// Probes the first line of a vault file to determine its format
    pub fn probe_line(line: &[u8]) -> Result<Self> {
        let tag = line.trim_ascii();
        if tag.eq_ignore_ascii_case(FORMAT_TAG.as_bytes()) {
            Ok(Self::Keychain)
        } else {
            Err(KeychainError::Format)
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Keychain => FORMAT_TAG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_is_case_insensitive() {
        assert_eq!(
            FileFormat::probe_line(b"keychain\n").unwrap(),
            FileFormat::Keychain
        );
        assert_eq!(
            FileFormat::probe_line(b"  KeyChain \r\n").unwrap(),
            FileFormat::Keychain
        );
    }

    #[test]
    fn test_probe_rejects_other_tags() {
        assert!(matches!(
            FileFormat::probe_line(b"KEYCHAIN2"),
            Err(KeychainError::Format)
        ));
        assert!(matches!(
            FileFormat::probe_line(b""),
            Err(KeychainError::Format)
        ));
    }
}
