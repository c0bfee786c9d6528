pub mod utils;

pub use utils::{
    copy_to_clipboard, get_passphrase, render_entry, secure_print, show_passphrase_warning,
};
