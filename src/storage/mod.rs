mod category;
mod credential;
mod entry;
mod search;
mod serialization;
mod vault;

use indexmap::IndexMap;

pub use category::Category;
pub use credential::Credential;
pub use entry::{Entry, Locations};
pub use search::SearchOptions;
pub use serialization::{
    WireCategory, WireCredential, WireEntry, WireVault, deserialize_vault, load_vault,
    save_vault, serialize_vault,
};
pub use vault::{NewCredential, Vault};

/// Anything that lives in a name-keyed container and can be tombstoned.
pub(crate) trait Member {
    fn member_name(&self) -> &str;
    fn is_valid(&self) -> bool;
}

/// Stores `item` under its own name unless that would let a tombstoned item
/// shadow a live one. Returns whether the item was kept.
///
/// A valid item always wins. A tombstoned item is kept when the key is new or
/// the current holder is tombstoned too, so the last tombstoned item wins.
pub(crate) fn admit<T: Member>(members: &mut IndexMap<String, T>, item: T) -> bool {
    if !item.is_valid()
        && members
            .get(item.member_name())
            .is_some_and(Member::is_valid)
    {
        return false;
    }
    members.insert(item.member_name().to_string(), item);
    true
}

/// Members whose own flag is valid, ordered by name.
pub(crate) fn valid_sorted<T: Member>(members: &IndexMap<String, T>) -> Vec<&T> {
    let mut list: Vec<&T> = members.values().filter(|m| m.is_valid()).collect();
    list.sort_by(|a, b| a.member_name().cmp(b.member_name()));
    list
}
