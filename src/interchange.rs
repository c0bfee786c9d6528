//! CSV interchange with browser password managers
//!
//! Four columns `name,url,username,password`, one row per credential. Only
//! the first location of an entry is exported.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::constants::CSV_HEADER;
use crate::error::Result;
use crate::storage::{Category, Credential, Entry, Vault};

#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    url: String,
    username: String,
    password: String,
}

/// Writes the listed entries as CSV rows.
pub fn write_csv<W: Write>(vault: &Vault, writer: W, valid_only: bool) -> Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for entry in vault.list_all(valid_only) {
        // Rows without a URL are keyed on the entry name instead.
        let url = entry.locations().first().unwrap_or(entry.name());
        for credential in entry.credentials().filter(|c| c.valid() || !valid_only) {
            out.write_record([entry.name(), url, credential.identifier(), credential.secret()])?;
            rows += 1;
        }
    }
    out.flush()?;
    Ok(rows)
}

/// Reads CSV rows into a vault holding one category. Rows sharing a name are
/// merged into one entry.
pub fn read_csv<R: Read>(reader: R, category: &str) -> Result<Vault> {
    let mut input = csv::Reader::from_reader(reader);
    let mut entries: IndexMap<String, Entry> = IndexMap::new();

    for row in input.deserialize() {
        let row: Row = row?;
        let credential = Credential::new(row.username, row.password);
        match entries.get_mut(&row.name) {
            Some(entry) => {
                entry.add_location(&row.url);
                entry.insert(credential);
            }
            None => {
                let entry = Entry::new(row.name.clone())
                    .with_location(&row.url)
                    .with_credential(credential);
                entries.insert(row.name, entry);
            }
        }
    }

    Ok(Vault::from_categories([Category::with_entries(
        category,
        entries.into_values(),
        true,
    )]))
}

pub fn dump_csv(vault: &Vault, path: &Path, valid_only: bool) -> Result<usize> {
    let rows = write_csv(vault, File::create(path)?, valid_only)?;
    info!(path = %path.display(), rows, "csv exported");
    Ok(rows)
}

pub fn load_csv(path: &Path, category: &str) -> Result<Vault> {
    let vault = read_csv(File::open(path)?, category)?;
    info!(path = %path.display(), "csv imported");
    Ok(vault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::NewCredential;

    #[test]
    fn test_export_uses_first_location_or_name() {
        let mut vault = Vault::new();
        vault
            .add_credential(
                NewCredential::new("mail", "alice", "pw1")
                    .category("work")
                    .location("https://z.example"),
            )
            .unwrap();
        vault
            .get_mut("work")
            .unwrap()
            .entry_mut("mail")
            .unwrap()
            .add_location("https://a.example");
        vault
            .add_credential(NewCredential::new("bank", "bob", "pw2").category("work"))
            .unwrap();

        let mut buf = Vec::new();
        assert_eq!(write_csv(&vault, &mut buf, true).unwrap(), 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "name,url,username,password",
                "mail,https://a.example,alice,pw1",
                "bank,bank,bob,pw2",
            ]
        );
    }

    #[test]
    fn test_import_groups_rows_by_name() {
        let data = "name,url,username,password\n\
                    mail,https://mail.example/,alice,pw1\n\
                    mail,https://webmail.example,bob,pw2\n\
                    bank,https://bank.example,carol,pw3\n";
        let vault = read_csv(data.as_bytes(), "Imported").unwrap();
        let category = vault.get("Imported").unwrap();
        assert_eq!(category.len(), 2);

        let mail = category.entry("mail").unwrap();
        assert_eq!(mail.category(), Some("Imported"));
        assert_eq!(mail.len(), 2);
        let urls: Vec<&str> = mail.locations().iter().collect();
        assert_eq!(urls, ["https://mail.example", "https://webmail.example"]);
    }
}
