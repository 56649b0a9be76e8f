use crate::cli::{Cli, Command, print_completions, print_help, version_string};
use crate::config::RyzenSetConfig;
use crate::controller;
use crate::error::{Error, Result as LibResult};
use crate::output;
use crate::profile::ProfileStore;
use crate::ryzenadj::RyzenAdj;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Dispatch a parsed command line. `open_session` is only called by
/// commands that touch the SMU, and only once the profile store is loaded.
///
/// Every failure comes back as `Err`; the caller owns the exit code.
pub fn run<A, F>(cli: Cli, config: &RyzenSetConfig, open_session: F) -> Result<()>
where
    A: RyzenAdj,
    F: FnOnce(&Path) -> LibResult<A>,
{
    if cli.version {
        println!("{}", version_string());
        return Ok(());
    }

    let Some(command) = cli.command else {
        print_help()?;
        return Ok(());
    };

    match command {
        Command::Completions { shell } => {
            if !print_completions(shell) {
                anyhow::bail!("no shell given");
            }
            Ok(())
        }
        Command::List { category } => {
            let store = load_store(config)?;
            cmd_list(&store, category.as_deref(), cli.json)
        }
        Command::Set { profile } => {
            let store = load_store(config)?;
            let Some(profile) = profile else {
                return Err(Error::MissingProfileName.into());
            };
            // Fail on a bad name before touching the hardware.
            if store.get(&profile).is_none() {
                return Err(Error::UnknownProfile(profile).into());
            }
            let mut adj = open_session(&config.library)?;
            cmd_set(&store, &profile, &mut adj, cli.json)
        }
        Command::Get => {
            let store = load_store(config)?;
            let mut adj = open_session(&config.library)?;
            cmd_get(&store, &mut adj, cli.json, cli.verbose)
        }
    }
}

/// A missing store refuses every data command before any native call.
fn load_store(config: &RyzenSetConfig) -> LibResult<ProfileStore> {
    let path = config.profiles_path();
    let store = ProfileStore::load(&path)?.ok_or(Error::NoStore)?;
    tracing::debug!(path = %path.display(), profiles = store.len(), "loaded profile store");
    Ok(store)
}

fn cmd_list(store: &ProfileStore, category: Option<&str>, json: bool) -> Result<()> {
    let names = match category {
        Some(name) => controller::list_by_category(name, store),
        None => controller::list_categories(store),
    };

    if json {
        output::print_names_json(&names);
    } else {
        output::print_names(&names);
    }
    Ok(())
}

fn cmd_set(store: &ProfileStore, profile: &str, adj: &mut impl RyzenAdj, json: bool) -> Result<()> {
    if !nix::unistd::geteuid().is_root() {
        eprintln!(
            "{} not running as root, the SMU will likely refuse these writes",
            "Warning:".yellow()
        );
    }

    let report = controller::apply_profile(store, profile, adj)?;

    if json {
        output::print_apply_json(&report);
    } else {
        output::print_apply_report(&report);
    }
    Ok(())
}

fn cmd_get(store: &ProfileStore, adj: &mut impl RyzenAdj, json: bool, verbose: bool) -> Result<()> {
    let current = controller::current_profile(store, adj);

    if json {
        output::print_current_json(&current);
    } else {
        output::print_current(&current, verbose);
    }
    Ok(())
}
