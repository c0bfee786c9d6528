use std::time::Duration;

/// First line of every vault file.
pub const FORMAT_TAG: &str = "KEYCHAIN";

/// File name used when the vault path points at a directory.
pub const DEFAULT_FILENAME: &str = ".keychain";

/// Category assigned to entries that were added without one.
pub const DEFAULT_CATEGORY: &str = "Default";

pub const CSV_HEADER: [&str; 4] = ["name", "url", "username", "password"];

pub const CLIPBOARD_TTL: Duration = Duration::from_secs(10);

/// Indentation of the JSON plaintext inside the vault file.
pub const JSON_INDENT: &[u8] = b"    ";
