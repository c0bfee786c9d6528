use regex::Regex;

use super::{Entry, Vault};
use crate::error::Result;

/// Flags controlling [`Vault::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match entry names only.
    pub keyname_only: bool,
    /// Use the pattern verbatim as a regular expression instead of a literal.
    pub regex_on: bool,
    /// Require the whole field to match.
    pub fullmatch: bool,
    /// Skip tombstoned categories and entries.
    pub valid_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            keyname_only: true,
            regex_on: false,
            fullmatch: false,
            valid_only: true,
        }
    }
}

impl SearchOptions {
    /// Searches every field, not only entry names.
    pub fn everywhere() -> Self {
        Self {
            keyname_only: false,
            ..Self::default()
        }
    }
}

struct Matcher {
    re: Regex,
}

impl Matcher {
    fn new(pattern: &str, options: SearchOptions) -> Result<Self> {
        let body = if options.regex_on {
            pattern.to_string()
        } else {
            regex::escape(pattern)
        };
        let re = if options.fullmatch {
            Regex::new(&format!(r"\A(?:{body})\z"))?
        } else {
            Regex::new(&body)?
        };
        Ok(Self { re })
    }

    fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    fn matches_entry(&self, entry: &Entry, keyname_only: bool) -> bool {
        if self.is_match(entry.name()) {
            return true;
        }
        if keyname_only {
            return false;
        }
        if entry.description().is_some_and(|d| self.is_match(d)) {
            return true;
        }
        if entry.locations().iter().any(|l| self.is_match(l)) {
            return true;
        }
        entry.credentials().any(|c| {
            self.is_match(c.identifier())
                || self.is_match(c.secret())
                || c.note().is_some_and(|n| self.is_match(n))
        })
    }
}

impl Vault {
    /// Entries matching `pattern`, each at most once, in container order.
    ///
    /// Fields are tried in order: name, then (unless `keyname_only`)
    /// description, locations, and each credential's identifier, secret and
    /// note. The first match includes the entry.
    pub fn search(&self, pattern: &str, options: SearchOptions) -> Result<Vec<&Entry>> {
        let matcher = Matcher::new(pattern, options)?;
        Ok(self
            .list_all(options.valid_only)
            .into_iter()
            .filter(|entry| matcher.matches_entry(entry, options.keyname_only))
            .collect())
    }
}
