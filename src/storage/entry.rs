use indexmap::IndexMap;

use super::serialization::WireEntry;
use super::{Credential, Member, admit, valid_sorted};
use crate::error::{KeychainError, Result};

/// Sorted, de-duplicated set of locations (URLs) with trailing slashes removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locations {
    items: Vec<String>,
}

impl Locations {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Inserts a location in sorted position. Returns false for a duplicate.
    pub fn insert(&mut self, location: &str) -> bool {
        let location = location.trim_end_matches('/');
        match self.items.binary_search_by(|l| l.as_str().cmp(location)) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, location.to_string());
                true
            }
        }
    }

    /// Positional removal; out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn first(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub const fn len(&self) -> usize {
        self.items.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Locations {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut locations = Self::new();
        for location in iter {
            locations.insert(location.as_ref());
        }
        locations
    }
}

/// A named unit holding credentials keyed by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    name: String,
    description: Option<String>,
    category: Option<String>,
    locations: Locations,
    credentials: IndexMap<String, Credential>,
    deleted: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            locations: Locations::new(),
            credentials: IndexMap::new(),
            deleted: false,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        self.locations.insert(location);
        self
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.insert(credential);
        self
    }

    /// Detached rename. Entries already held by a category keep their key.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Declares the category this entry belongs to. A held entry moves on the
    /// next [`Vault::regrouping`](super::Vault::regrouping).
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = Some(category.into());
    }

    pub fn clear_category(&mut self) {
        self.category = None;
    }

    pub const fn locations(&self) -> &Locations {
        &self.locations
    }

    pub fn add_location(&mut self, location: &str) -> bool {
        self.locations.insert(location)
    }

    pub fn remove_location(&mut self, index: usize) -> Option<String> {
        self.locations.remove(index)
    }

    /// Inserts under the credential's identifier following the priority rule.
    pub fn insert(&mut self, credential: Credential) -> bool {
        admit(&mut self.credentials, credential)
    }

    /// Keyed insertion; the key must equal the credential's identifier.
    pub fn insert_as(&mut self, key: &str, credential: Credential) -> Result<bool> {
        if key != credential.identifier() {
            return Err(KeychainError::NameMismatch {
                key: key.to_string(),
                name: credential.identifier().to_string(),
            });
        }
        Ok(self.insert(credential))
    }

    pub fn add_credentials(&mut self, credentials: impl IntoIterator<Item = Credential>) {
        for credential in credentials {
            self.insert(credential);
        }
    }

    /// Re-keys a held credential. The renamed credential is inserted with the
    /// priority rule, so it may be discarded if it is tombstoned and a live
    /// credential already holds the new identifier.
    pub fn rename_credential(&mut self, from: &str, to: &str) -> Result<bool> {
        let mut credential = self
            .credentials
            .shift_remove(from)
            .ok_or_else(|| KeychainError::NotFound(format!("{}/{from}", self.name)))?;
        credential.set_identifier(to);
        Ok(self.insert(credential))
    }

    pub fn credential(&self, identifier: &str) -> Option<&Credential> {
        self.credentials.get(identifier)
    }

    pub fn credential_mut(&mut self, identifier: &str) -> Option<&mut Credential> {
        self.credentials.get_mut(identifier)
    }

    /// All credentials, tombstones included, in insertion order.
    pub fn credentials(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.values()
    }

    pub fn valid_credentials(&self) -> Vec<&Credential> {
        valid_sorted(&self.credentials)
    }

    /// Hard removal, reserved for explicit duplicate merging.
    pub fn purge_credential(&mut self, identifier: &str) -> Option<Credential> {
        self.credentials.shift_remove(identifier)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
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

    pub fn export(&self, valid_only: bool) -> Option<WireEntry> {
        if self.deleted && valid_only {
            return None;
        }
        let mut userlist: Vec<_> = self
            .credentials
            .values()
            .filter_map(|c| c.export(valid_only))
            .collect();
        userlist.sort_by(|a, b| a.username.cmp(&b.username));

        Some(WireEntry {
            description: self.description.clone(),
            url: self.locations.to_vec(),
            userlist,
        })
    }

    pub(crate) fn from_wire(name: &str, category: &str, wire: WireEntry) -> Self {
        let mut entry = Self::new(name).with_category(category);
        entry.description = wire.description;
        entry.locations = wire.url.iter().collect();
        entry.add_credentials(wire.userlist.into_iter().map(Credential::from));
        entry
    }
}

impl Member for Entry {
    fn member_name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        self.valid()
    }
}
