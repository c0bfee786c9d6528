use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rkeychain::*; // Import from lib
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

#[derive(Parser)]
#[command(name = "rkeychain")]
#[command(about = "Encrypted credential vault.
Credentials are grouped under named entries, entries under named categories.
The whole vault is stored in one passphrase-protected file.
")]
struct CliParams {
    /// Vault file, or a directory holding a `.keychain` file
    #[arg(short, long, env = "RKEYCHAIN_FILE")]
    file: Option<PathBuf>,

    /// Don't prompt for the username, use the provided one.
    /// This is only for automated testing
    #[arg(long, hide(true))]
    insecure_user: Option<String>,

    /// Don't prompt for the password, use the provided one.
    /// This is only for automated testing
    #[arg(long, hide(true))]
    insecure_secret: Option<String>,

    /// Use stdout to output secrets.
    /// This is only for automated testing
    #[arg(long, action, default_value_t = false, hide(true))]
    insecure_stdout: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a credential, creating the category and entry as needed
    Add(AddArgs),
    /// Search entries by name, or by every field with --all-fields
    Search(SearchArgs),
    /// List every entry
    List {
        #[arg(long)]
        reveal: bool,
    },
    /// Delete an entry, or one credential of it with --user
    Delete {
        category: String,
        entry: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Move an entry to another category
    Move {
        category: String,
        entry: String,
        target: String,
    },
    /// Print the vault as JSON
    Export,
    /// Report entry names used in more than one category
    Duplicates,
    /// Generate a random password
    Generate(GenerateArgs),
    /// Write credentials as name,url,username,password rows
    CsvExport { path: PathBuf },
    /// Merge credentials from a name,url,username,password file
    CsvImport {
        path: PathBuf,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
    },
}

#[derive(Args)]
struct AddArgs {
    entry: String,
    username: String,
    /// Password; generated when omitted
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    note: Option<String>,
    /// Generator mode used when no password is given
    #[arg(long, default_value = "classic")]
    mode: String,
}

#[derive(Args)]
struct SearchArgs {
    pattern: String,
    /// Also match descriptions, URLs and credential fields
    #[arg(long)]
    all_fields: bool,
    /// Treat the pattern as a regular expression
    #[arg(long)]
    regex: bool,
    /// Require the whole field to match
    #[arg(long)]
    full: bool,
    #[arg(long)]
    reveal: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Preset name, packed 0xLLUUDDPP value or four counts like 8-4-4-0
    #[arg(long, default_value = "classic")]
    mode: String,
    /// No repeated characters within a class
    #[arg(long)]
    unique: bool,
    /// Copy to the clipboard instead of printing
    #[arg(long)]
    copy: bool,
}

struct Session {
    path: PathBuf,
    cypher: Cypher,
    vault: Vault,
}

impl Session {
    /// Opens the vault, or starts an empty one when `create` is set and the
    /// file does not exist yet.
    fn open(params: &CliParams, create: bool) -> Result<Self> {
        let path = resolve_vault_path(&params.file.clone().unwrap_or_else(default_vault_path));
        let exists = path.exists();
        if !exists && !create {
            bail!("vault file {} does not exist", path.display());
        }

        let (user, mut secret) = match (&params.insecure_user, &params.insecure_secret) {
            (Some(user), Some(secret)) => (user.clone(), secret.clone()),
            _ => get_passphrase(&path, !exists)?,
        };
        let cypher = Cypher::from_credentials(&user, &secret);
        secret.zeroize();

        let vault = if exists {
            load_vault(&cypher, &path).with_context(|| format!("loading {}", path.display()))?
        } else {
            Vault::new()
        };
        Ok(Self {
            path,
            cypher,
            vault,
        })
    }

    fn save(&self) -> Result<()> {
        save_vault(&self.cypher, &self.vault, &self.path)
            .with_context(|| format!("saving {}", self.path.display()))
    }
}

fn generate_password(mode: &str, unique: bool) -> Result<zeroize::Zeroizing<String>> {
    let mode: Mode = mode.parse()?;
    Ok(PasswordGenerator::new(mode).generate(unique)?)
}

fn print_entries(entries: &[&Entry], reveal: bool, insecure_stdout: bool) -> Result<()> {
    if entries.is_empty() {
        println!("No entries found");
        return Ok(());
    }
    for entry in entries {
        let rendered = render_entry(entry, reveal);
        if reveal {
            secure_print(rendered, insecure_stdout)?;
        } else {
            print!("{rendered}");
        }
    }
    Ok(())
}

fn run(params: &CliParams) -> Result<()> {
    match &params.command {
        Command::Add(args) => {
            let mut session = Session::open(params, true)?;
            let secret = match &args.password {
                Some(password) => zeroize::Zeroizing::new(password.clone()),
                None => generate_password(&args.mode, false)?,
            };
            let mut new = NewCredential::new(&args.entry, &args.username, secret.as_str())
                .category(&args.category);
            new.description.clone_from(&args.description);
            new.location.clone_from(&args.url);
            new.note.clone_from(&args.note);
            session.vault.add_credential(new)?;
            session.save()?;
            if args.password.is_none() {
                secure_print(secret.to_string(), params.insecure_stdout)?;
            }
            eprintln!("Added {}/{} ({})", args.category, args.entry, args.username);
        }
        Command::Search(args) => {
            let session = Session::open(params, false)?;
            let options = SearchOptions {
                keyname_only: !args.all_fields,
                regex_on: args.regex,
                fullmatch: args.full,
                valid_only: true,
            };
            let found = session.vault.search(&args.pattern, options)?;
            print_entries(&found, args.reveal, params.insecure_stdout)?;
        }
        Command::List { reveal } => {
            let session = Session::open(params, false)?;
            let all = session.vault.list_all(true);
            print_entries(&all, *reveal, params.insecure_stdout)?;
        }
        Command::Delete {
            category,
            entry,
            user,
        } => {
            let mut session = Session::open(params, false)?;
            let target = session.vault.entry_mut(category, entry)?;
            match user {
                Some(user) => {
                    target
                        .credential_mut(user)
                        .ok_or_else(|| KeychainError::NotFound(format!("{category}/{entry}/{user}")))?
                        .delete();
                }
                None => {
                    target.delete();
                }
            }
            session.save()?;
            eprintln!("Deleted");
        }
        Command::Move {
            category,
            entry,
            target,
        } => {
            let mut session = Session::open(params, false)?;
            session.vault.entry_mut(category, entry)?.set_category(target);
            let moved = session.vault.regrouping()?;
            session.save()?;
            eprintln!("Moved {moved} entr{}", if moved == 1 { "y" } else { "ies" });
        }
        Command::Export => {
            let session = Session::open(params, false)?;
            let json = zeroize::Zeroizing::new(session.vault.to_json(true)?);
            secure_print(json.to_string(), params.insecure_stdout)?;
        }
        Command::Duplicates => {
            let session = Session::open(params, false)?;
            let duplicates = session.vault.doppelganger();
            if duplicates.is_empty() {
                println!("No duplicate entry names");
            }
            for (name, entries) in duplicates {
                let homes: Vec<&str> = entries.iter().filter_map(|e| e.category()).collect();
                println!("{name}: {}", homes.join(", "));
            }
        }
        Command::Generate(args) => {
            let password = generate_password(&args.mode, args.unique)?;
            if args.copy {
                copy_to_clipboard(&password, CLIPBOARD_TTL)?;
            } else {
                secure_print(password.to_string(), params.insecure_stdout)?;
            }
        }
        Command::CsvExport { path } => {
            let session = Session::open(params, false)?;
            let rows = dump_csv(&session.vault, path, true)?;
            eprintln!("Exported {rows} rows to {}", path.display());
            eprintln!("Delete the CSV file as soon as it has been imported elsewhere.");
        }
        Command::CsvImport { path, category } => {
            let mut session = Session::open(params, true)?;
            let imported = load_csv(path, category)?;
            merge_into(&mut session.vault, imported)?;
            session.save()?;
            eprintln!("Imported {}", path.display());
        }
    }
    Ok(())
}

/// Files every imported entry through the regular insertion path.
fn merge_into(vault: &mut Vault, imported: Vault) -> Result<()> {
    for category in imported.categories() {
        vault.add_entries(category.entries().cloned())?;
    }
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("RKEYCHAIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let params = CliParams::parse();
    run(&params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        CliParams::command().debug_assert();
    }

    #[test]
    fn test_merge_into_keeps_existing() {
        let mut vault = Vault::new();
        vault
            .add_credential(NewCredential::new("mail", "alice", "pw").category("Default"))
            .unwrap();
        let imported = read_csv(
            "name,url,username,password\nbank,https://bank.example,bob,pw2\n".as_bytes(),
            "Default",
        )
        .unwrap();
        merge_into(&mut vault, imported).unwrap();
        let names: Vec<&str> = vault.list_all(true).into_iter().map(Entry::name).collect();
        assert_eq!(names, ["mail", "bank"]);
    }
}
