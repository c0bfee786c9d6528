use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::serialization::WireVault;
use super::{Category, Credential, Entry, admit, valid_sorted};
use crate::constants::DEFAULT_CATEGORY;
use crate::error::{KeychainError, Result};

/// Field set for adding one credential without building the entities by hand.
#[derive(Debug, Clone, Default)]
pub struct NewCredential {
    pub entry: String,
    pub identifier: String,
    pub secret: String,
    pub note: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl NewCredential {
    pub fn new(
        entry: impl Into<String>,
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            entry: entry.into(),
            identifier: identifier.into(),
            secret: secret.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Root container: categories keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vault {
    categories: IndexMap<String, Category>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vault applying the priority rule to same-named categories.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut vault = Self::new();
        for category in categories {
            vault.insert(category);
        }
        vault
    }

    pub fn insert(&mut self, category: Category) -> bool {
        admit(&mut self.categories, category)
    }

    /// Keyed insertion; the key must equal the category's name.
    pub fn insert_as(&mut self, key: &str, category: Category) -> Result<bool> {
        if key != category.name() {
            return Err(KeychainError::NameMismatch {
                key: key.to_string(),
                name: category.name().to_string(),
            });
        }
        Ok(self.insert(category))
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.get_mut(name)
    }

    /// Looks up an entry, failing with `NotFound` when either level is absent.
    pub fn entry_mut(&mut self, category: &str, entry: &str) -> Result<&mut Entry> {
        self.categories
            .get_mut(category)
            .and_then(|c| c.entry_mut(entry))
            .ok_or_else(|| KeychainError::NotFound(format!("{category}/{entry}")))
    }

    /// Renames a held category, re-stamping its members. The renamed category
    /// is inserted with the priority rule.
    pub fn rename_category(&mut self, from: &str, to: &str) -> Result<bool> {
        let category = self
            .categories
            .shift_remove(from)
            .ok_or_else(|| KeychainError::NotFound(from.to_string()))?;
        Ok(self.insert(category.renamed(to)))
    }

    /// All categories, tombstones included, in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn valid_categories(&self) -> Vec<&Category> {
        valid_sorted(&self.categories)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Files an entry under its declared category, creating the category if
    /// needed. Entries without a category go to the default one.
    pub fn add_entry(&mut self, mut entry: Entry) -> Result<bool> {
        let target = match entry.category() {
            Some(name) => name.to_string(),
            None => {
                entry.set_category(DEFAULT_CATEGORY);
                DEFAULT_CATEGORY.to_string()
            }
        };
        match self.categories.get_mut(&target) {
            Some(category) => category.insert(entry),
            None => {
                let mut category = Category::new(target);
                let stored = category.insert(entry)?;
                self.insert(category);
                Ok(stored)
            }
        }
    }

    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<()> {
        for entry in entries {
            self.add_entry(entry)?;
        }
        Ok(())
    }

    /// Adds one credential, creating the category and entry as needed. A live
    /// entry of that name gains the credential; a tombstoned one is replaced.
    pub fn add_credential(&mut self, new: NewCredential) -> Result<()> {
        let category_name = new
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let mut credential = Credential::new(new.identifier, new.secret);
        if let Some(note) = new.note {
            credential = credential.with_note(note);
        }

        let category = self
            .categories
            .entry(category_name.clone())
            .or_insert_with(|| Category::new(category_name.clone()));
        category.recover();

        match category.entry_mut(&new.entry).filter(|e| e.valid()) {
            Some(entry) => {
                if new.description.is_some() {
                    entry.set_description(new.description);
                }
                if let Some(location) = new.location {
                    entry.add_location(&location);
                }
                entry.insert(credential);
            }
            None => {
                let mut entry = Entry::new(new.entry).with_credential(credential);
                entry.set_description(new.description);
                if let Some(location) = new.location {
                    entry.add_location(&location);
                }
                category.insert(entry)?;
            }
        }
        debug!(category = %category_name, "credential added");
        Ok(())
    }

    /// Entries across all categories in container order.
    pub fn list_all(&self, valid_only: bool) -> Vec<&Entry> {
        self.categories
            .values()
            .filter(|c| c.valid() || !valid_only)
            .flat_map(Category::entries)
            .filter(|e| e.valid() || !valid_only)
            .collect()
    }

    /// How many categories hold each entry name, tombstones included.
    pub fn register(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for category in self.categories.values() {
            for name in category.entry_names() {
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Every entry name held by more than one category, with all entries
    /// carrying that exact name.
    pub fn doppelganger(&self) -> BTreeMap<String, Vec<&Entry>> {
        self.register()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| {
                let entries: Vec<&Entry> = self
                    .categories
                    .values()
                    .filter_map(|c| c.entry(&name))
                    .collect();
                (name, entries)
            })
            .collect()
    }

    /// Moves every entry whose declared category changed into that category.
    /// Returns the number of entries moved.
    pub fn regrouping(&mut self) -> Result<usize> {
        let outcasts: Vec<Entry> = self
            .categories
            .values_mut()
            .flat_map(Category::outcast)
            .collect();
        let moved = outcasts.len();
        self.add_entries(outcasts)?;
        if moved > 0 {
            info!(moved, "regrouped entries");
        }
        Ok(moved)
    }

    /// Canonical name-sorted projection.
    pub fn export(&self, valid_only: bool) -> WireVault {
        self.categories
            .iter()
            .filter_map(|(name, category)| Some((name.clone(), category.export(valid_only)?)))
            .collect()
    }

    pub fn from_wire_format(wire: WireVault) -> Self {
        let mut vault = Self::new();
        for (name, wire_category) in wire {
            vault.insert(Category::from_wire(&name, wire_category));
        }
        vault
    }
}
