//! vault-session binary.
//!
//! Resolves session identifiers for analytics accounts against a cookie jar
//! file, the way a page would against its cookie store.
//!
//! Usage:
//!   # One id per account, persisted in the default jar
//!   vault-session 9b63c4d8 4f2c1a77
//!
//!   # Explicit jar, JSON output
//!   vault-session --jar /tmp/cookies.json --json 9b63c4d8
//!
//!   # Storage blocked: fresh, unpersisted ids
//!   vault-session --ephemeral 9b63c4d8
//!
//!   # Forget every session
//!   vault-session --clear

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use vault_session::{SessionIdentityProvider, VaultConfig};
use vault_storage::{DisabledStore, FileJar, SessionStore};
use vault_types::AccountId;

/// Per-account session identifiers for vault.
#[derive(Parser, Debug)]
#[command(name = "vault-session")]
#[command(about = "Resolve per-account analytics session identifiers")]
struct Args {
    /// Config file (default: platform config dir, vault/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cookie jar file, overriding the config
    #[arg(long, conflicts_with = "ephemeral")]
    jar: Option<PathBuf>,

    /// Behave as if storage were blocked
    #[arg(long)]
    ephemeral: bool,

    /// Print one JSON object per account
    #[arg(long)]
    json: bool,

    /// Delete the cookie jar and exit
    #[arg(long, conflicts_with_all = ["ephemeral", "accounts"])]
    clear: bool,

    /// Account identifiers
    #[arg(required_unless_present = "clear")]
    accounts: Vec<String>,
}

fn main() -> ExitCode {
    // Logs to stderr; stdout carries the ids
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vault-session: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => VaultConfig::load(path)?,
        None => VaultConfig::load_default()?,
    };
    let jar_path = args.jar.clone().unwrap_or_else(|| config.jar_path());

    if args.clear {
        let jar = FileJar::open(&jar_path, config.cookie);
        return jar
            .clear()
            .with_context(|| format!("clearing {}", jar_path.display()));
    }

    let store: Box<dyn SessionStore> = if args.ephemeral {
        Box::new(DisabledStore::new("--ephemeral"))
    } else {
        tracing::debug!(jar = %jar_path.display(), "using cookie jar");
        Box::new(FileJar::open(jar_path, config.cookie))
    };
    let provider = SessionIdentityProvider::new(store);

    for account in args.accounts {
        let identity = provider.identify(&AccountId::from(account));
        if args.json {
            println!("{}", serde_json::to_string(&identity)?);
        } else {
            println!("{} {}", identity.account_id, identity.session_id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn accounts_required_without_clear() {
        assert!(Args::try_parse_from(["vault-session"]).is_err());
        assert!(Args::try_parse_from(["vault-session", "--clear"]).is_ok());
    }

    #[test]
    fn clear_conflicts_with_accounts() {
        assert!(Args::try_parse_from(["vault-session", "--clear", "acct"]).is_err());
    }

    #[test]
    fn run_persists_in_jar() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("cookies.json");
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        let args = Args::try_parse_from([
            "vault-session",
            "--config",
            config.to_str().unwrap(),
            "--jar",
            jar.to_str().unwrap(),
            "acct1",
        ])
        .unwrap();
        run(args).unwrap();

        let stored = FileJar::open(&jar, Default::default()).read().unwrap();
        assert!(stored.contains_key("session-acct1"));
    }
}
