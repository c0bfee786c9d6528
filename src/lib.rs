#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::panic,
    clippy::dbg_macro,
    clippy::missing_const_for_fn,
    clippy::needless_pass_by_value,
    clippy::redundant_pub_crate
)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions,
    clippy::missing_panics_doc,
    clippy::option_if_let_else
)]

// Module declarations
pub mod cli;
mod constants;
mod crypto;
mod error;
pub mod generator;
pub mod interchange;
mod path_utils;
mod storage;
mod utils;
mod version;

pub use cli::utils::{copy_to_clipboard, get_passphrase, render_entry, secure_print};
pub use constants::{
    CLIPBOARD_TTL, CSV_HEADER, DEFAULT_CATEGORY, DEFAULT_FILENAME, FORMAT_TAG,
};
pub use crypto::{Cypher, PassphraseKey, keystream};
pub use error::{KeychainError, Result};
pub use generator::{Mode, PasswordGenerator};
pub use interchange::{dump_csv, load_csv, read_csv, write_csv};
pub use path_utils::{default_vault_path, resolve_vault_path};
pub use storage::{
    Category, Credential, Entry, Locations, NewCredential, SearchOptions, Vault, WireCategory,
    WireCredential, WireEntry, WireVault, deserialize_vault, load_vault, save_vault,
    serialize_vault,
};
pub use utils::{format_timestamp, now_timestamp};
pub use version::FileFormat;
