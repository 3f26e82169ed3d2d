//! `synthctl config` - manage connection profiles.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::output::{encode_token, fill_space};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use synthctl_config::{ProfileError, ProfileStore};

pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut store = ProfileStore::open()?;
    match args.action {
        ConfigAction::Set => set(&mut store, args),
        ConfigAction::List => {
            list(&store, args.show_token);
            Ok(())
        }
        ConfigAction::Use => {
            let name = require_name(args)?;
            store.make_default(name)?;
            println!("default configuration is now \"{name}\"");
            Ok(())
        }
        ConfigAction::Remove => {
            let name = require_name(args)?;
            store.remove(name)?;
            println!("configuration \"{name}\" removed");
            Ok(())
        }
    }
}

fn require_name(args: &ConfigArgs) -> Result<&str> {
    args.name
        .as_deref()
        .ok_or_else(|| ProfileError::IncompleteProfile.into())
}

fn set(store: &mut ProfileStore, args: &ConfigArgs) -> Result<()> {
    let name = require_name(args)?.to_string();
    let host = args
        .host
        .as_deref()
        .ok_or(ProfileError::IncompleteProfile)?;
    let token = match &args.token {
        Some(token) => token.clone(),
        None => prompt_token()?,
    };
    store.add(&name, host, &token, args.default)?;
    println!("configuration \"{name}\" saved");
    Ok(())
}

/// Asking for the token interactively keeps it out of the shell history.
fn prompt_token() -> Result<String> {
    print!("API token: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn list(store: &ProfileStore, show_token: bool) {
    let mut header = format!(
        "{}{}{}",
        fill_space("NAME", 25),
        fill_space("DEFAULT", 10),
        fill_space("HOSTNAME", 45)
    );
    if show_token {
        header.push_str("TOKEN");
    }
    println!("{header}");
    for profile in store.profiles() {
        let default = if profile.default { "true" } else { "false" };
        let mut line = format!(
            "{}{}{}",
            fill_space(&profile.name, 25),
            fill_space(default, 10),
            fill_space(&profile.host, 45)
        );
        if show_token {
            line.push_str(&encode_token(&profile.token));
        }
        println!("{line}");
    }
}
