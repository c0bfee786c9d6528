use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::info;
use zeroize::Zeroizing;

use super::Vault;
use crate::constants::JSON_INDENT;
use crate::crypto::Cypher;
use crate::error::{KeychainError, Result};

/// Category name → category.
pub type WireVault = BTreeMap<String, WireCategory>;

/// Entry name → entry.
pub type WireCategory = BTreeMap<String, WireEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEntry {
    pub description: Option<String>,
    #[serde(default)]
    pub url: Vec<String>,
    #[serde(default)]
    pub userlist: Vec<WireCredential>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCredential {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub timestamp: f64,
}

/// Pretty JSON with four-space indentation.
pub fn serialize_vault(vault: &Vault, valid_only: bool) -> Result<String> {
    let wire = vault.export(valid_only);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    wire.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| KeychainError::Encoding(e.to_string()))
}

pub fn deserialize_vault(text: &str) -> Result<Vault> {
    let wire: WireVault = serde_json::from_str(text)?;
    Ok(Vault::from_wire_format(wire))
}

/// Loads and decrypts a vault file. Nothing is built unless the tag and the
/// passphrase digest both check out.
pub fn load_vault(cypher: &Cypher, path: &Path) -> Result<Vault> {
    let decrypted = cypher.read_file(path)?;
    let text = std::str::from_utf8(&decrypted)
        .map_err(|e| KeychainError::Encoding(e.to_string()))?;
    let vault = deserialize_vault(text)?;
    info!(path = %path.display(), categories = vault.len(), "vault loaded");
    Ok(vault)
}

/// Encrypts the live members of the vault to `path`.
pub fn save_vault(cypher: &Cypher, vault: &Vault, path: &Path) -> Result<()> {
    let serialized = Zeroizing::new(serialize_vault(vault, true)?);
    cypher.write_file(path, serialized.as_bytes())?;
    info!(path = %path.display(), categories = vault.len(), "vault saved");
    Ok(())
}

impl Vault {
    pub fn to_json(&self, valid_only: bool) -> Result<String> {
        serialize_vault(self, valid_only)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        deserialize_vault(text)
    }
}
