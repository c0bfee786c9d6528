use super::Member;
use super::serialization::WireCredential;
use crate::utils::now_timestamp;

/// A single identifier/secret pair with an optional note.
///
/// Changing the identifier or the secret refreshes the timestamp. The
/// identifier of a credential held by an [`Entry`](super::Entry) can only be
/// changed through the entry, which re-keys it.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    identifier: String,
    secret: String,
    note: Option<String>,
    timestamp: f64,
    deleted: bool,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            note: None,
            timestamp: now_timestamp(),
            deleted: false,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Restores a stored modification time instead of the current one.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Detached rename; refreshes the timestamp.
    #[must_use]
    pub fn renamed(mut self, identifier: impl Into<String>) -> Self {
        self.set_identifier(identifier);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub(crate) fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
        self.timestamp = now_timestamp();
    }

    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = secret.into();
        self.timestamp = now_timestamp();
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.note = note;
    }

    pub const fn valid(&self) -> bool {
        !self.deleted
    }

    pub const fn delete(&mut self) -> &mut Self {
        self.deleted = true;
        self
    }

    pub const fn recover(&mut self) -> &mut Self {
        self.deleted = false;
        self
    }

    /// Scalar projection; `None` for a tombstone when `valid_only` is set.
    pub fn export(&self, valid_only: bool) -> Option<WireCredential> {
        if self.deleted && valid_only {
            return None;
        }
        Some(WireCredential {
            username: self.identifier.clone(),
            password: self.secret.clone(),
            notes: self.note.clone(),
            timestamp: self.timestamp,
        })
    }
}

impl From<WireCredential> for Credential {
    fn from(wire: WireCredential) -> Self {
        Self {
            identifier: wire.username,
            secret: wire.password,
            note: wire.notes,
            timestamp: wire.timestamp,
            deleted: false,
        }
    }
}

impl Member for Credential {
    fn member_name(&self) -> &str {
        &self.identifier
    }

    fn is_valid(&self) -> bool {
        self.valid()
    }
}
