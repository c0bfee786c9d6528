use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Result, bail};
use arboard::Clipboard;
use nix::fcntl::{Flock, FlockArg};
use zeroize::{Zeroize, Zeroizing};

use crate::storage::Entry;
use crate::utils::format_timestamp;

/// Prints directly to tty to avoid
/// - snooping secrets from process stdout
/// - lingering secrets in memory
///
/// Takes ownership of the string and zeroizes it after printing.
pub fn secure_print(mut what: String, insecure_stdout: bool) -> Result<()> {
    if insecure_stdout {
        println!("{}", &what);
        what.zeroize();
        return Ok(());
    }
    let tty = OpenOptions::new().write(true).open("/dev/tty")?;
    let mut lock = match Flock::lock(tty, FlockArg::LockExclusive) {
        Ok(l) => l,
        Err((_, e)) => bail!(e),
    };
    lock.write_all(what.as_bytes())?;
    lock.write_all(b"\n")?;
    lock.flush()?;

    what.zeroize();
    Ok(())
}

pub fn copy_to_clipboard(secret: &str, ttl: std::time::Duration) -> Result<()> {
    eprintln!(
        "Secret copied to the clipboard and will be automatically removed in {} seconds.\n\
         Warning: Clipboard managers may retain history",
        ttl.as_secs()
    );

    let copy = Zeroizing::from(secret.to_string());

    // The clipboard is owned by this process on some platforms, so the
    // thread must outlive the copy for the content to stay available.
    let handle = std::thread::spawn(move || {
        if let Ok(mut clipboard) = Clipboard::new() {
            let _ = clipboard.set_text(copy.to_string());
            std::thread::sleep(ttl);
            if clipboard.get_text().ok().as_deref() == Some(copy.as_str()) {
                let _ = clipboard.set_text("deleted");
            }
        } else {
            eprintln!("Can't access clipboard");
        }
    });
    let _ = handle.join();

    Ok(())
}

/// Prompts for the passphrase material: an identifier on stdin and a hidden
/// secret. A new vault asks for the secret twice.
pub fn get_passphrase(filename: &Path, require_confirmation: bool) -> Result<(String, String)> {
    if require_confirmation {
        show_passphrase_warning();
    }

    eprint!("Username for {}: ", filename.display());
    io::stderr().flush()?;
    let mut user = String::new();
    io::stdin().lock().read_line(&mut user)?;
    let user = user.trim_end_matches(['\r', '\n']).to_string();

    let mut secret = rpassword::prompt_password("Password: ")?;

    if require_confirmation {
        let mut confirmation = rpassword::prompt_password("Confirm Password: ")?;
        if secret != confirmation {
            secret.zeroize();
            confirmation.zeroize();
            bail!("Passwords do not match");
        }
        confirmation.zeroize();
    }

    Ok((user, secret))
}

pub fn show_passphrase_warning() {
    eprintln!("\n╔════════════════════════════════════════════════════════════════════╗");
    eprintln!("║                         ⚠️  IMPORTANT! ⚠️                          ║");
    eprintln!("╠════════════════════════════════════════════════════════════════════╣");
    eprintln!("║                                                                    ║");
    eprintln!("║  Your username and password CANNOT be recovered if forgotten.      ║");
    eprintln!("║  Without them, your vault will be PERMANENTLY inaccessible.        ║");
    eprintln!("║                                                                    ║");
    eprintln!("╚════════════════════════════════════════════════════════════════════╝\n");
}

/// Multi-line description of an entry. Secrets are masked unless `reveal`.
pub fn render_entry(entry: &Entry, reveal: bool) -> String {
    let mut out = String::new();
    let category = entry.category().unwrap_or("-");
    let _ = write!(out, "{category}/{}", entry.name());
    if !entry.valid() {
        out.push_str(" (deleted)");
    }
    out.push('\n');
    if let Some(description) = entry.description() {
        let _ = writeln!(out, "  description: {description}");
    }
    for location in entry.locations().iter() {
        let _ = writeln!(out, "  url: {location}");
    }

    for credential in entry.valid_credentials() {
        let secret = if reveal { credential.secret() } else { "********" };
        let _ = write!(
            out,
            "  - {} : {} (modified {})",
            credential.identifier(),
            secret,
            format_timestamp(credential.timestamp())
        );
        if let Some(note) = credential.note() {
            let _ = write!(out, " [{note}]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Credential;

    #[test]
    fn test_render_entry_masks_secret() {
        let entry = Entry::new("mail")
            .with_category("work")
            .with_location("https://mail.example")
            .with_credential(Credential::new("alice", "s3cret").with_note("main"));
        let masked = render_entry(&entry, false);
        assert!(masked.starts_with("work/mail\n"));
        assert!(masked.contains("url: https://mail.example"));
        assert!(masked.contains("alice : ********"));
        assert!(masked.contains("[main]"));
        assert!(!masked.contains("s3cret"));

        assert!(render_entry(&entry, true).contains("alice : s3cret"));
    }

    #[test]
    fn test_render_entry_skips_deleted_credentials() {
        let mut entry = Entry::new("mail")
            .with_credential(Credential::new("alice", "a"))
            .with_credential(Credential::new("bob", "b"));
        entry.credential_mut("bob").unwrap().delete();
        entry.delete();

        let rendered = render_entry(&entry, true);
        assert!(rendered.starts_with("-/mail (deleted)\n"));
        assert!(rendered.contains("alice : a"));
        assert!(!rendered.contains("bob"));
    }
}
