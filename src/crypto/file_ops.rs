use std::fs;
use std::io::Write;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::cipher::Cypher;
use crate::error::{KeychainError, Result};
use crate::version::FileFormat;

/// Splits off the first line, without its terminator.
fn split_line(data: &[u8]) -> (&[u8], &[u8]) {
    match data.iter().position(|&b| b == b'\n') {
        Some(pos) => (&data[..pos], &data[pos + 1..]),
        None => (data, &[]),
    }
}

impl Cypher {
    /// Renders the three-line file: tag, passphrase digest, base64 payload.
    pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        let payload = STANDARD.encode(self.encrypt(plaintext));
        let mut out = Vec::with_capacity(payload.len() + 80);
        out.extend_from_slice(FileFormat::Keychain.tag().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(self.key.digest().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(payload.as_bytes());
        out.push(b'\n');
        out
    }

    /// Parses a three-line file. The tag and the passphrase digest are checked
    /// before the payload is decoded.
    pub fn open(&self, contents: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let (tag, rest) = split_line(contents);
        FileFormat::probe_line(tag)?;

        let (digest, rest) = split_line(rest);
        let digest = std::str::from_utf8(digest).map_err(|_| KeychainError::Passphrase)?;
        if !self.key.verify_digest(digest) {
            return Err(KeychainError::Passphrase);
        }

        let encrypted = STANDARD
            .decode(rest.trim_ascii())
            .map_err(|e| KeychainError::Encoding(e.to_string()))?;
        Ok(self.decrypt(&encrypted))
    }

    /// Writes the sealed plaintext, creating parent directories. The file is
    /// replaced atomically.
    pub fn write_file(&self, path: &Path, plaintext: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&self.seal(plaintext))?;
        temp.flush()?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), bytes = plaintext.len(), "vault file written");
        Ok(())
    }

    pub fn read_file(&self, path: &Path) -> Result<Zeroizing<Vec<u8>>> {
        let contents = fs::read(path)?;
        let opened = self.open(&contents);
        match &opened {
            Ok(plain) => debug!(path = %path.display(), bytes = plain.len(), "vault file read"),
            Err(KeychainError::Format) => warn!(path = %path.display(), "unknown file format"),
            Err(KeychainError::Passphrase) => {
                warn!(path = %path.display(), "passphrase digest mismatch");
            }
            Err(_) => {}
        }
        opened
    }
}
