//! Implementation of the 'list' subcommand.
//!
//! Keys go to stdout, one per line, so they can be piped into
//! `tripreel finish --select`.

use crate::cli::Cli;
use crate::commands::{open_store, store_label};
use crate::config::base_config;
use crate::error::CliResult;
use crate::terminal;

use tripreel_core::storage::list_clip_keys;

pub fn run_list(cli: &Cli) -> CliResult<Vec<String>> {
    let config = base_config(cli);
    let store = open_store(cli)?;
    let keys = list_clip_keys(store.as_ref(), &config.upload_prefix)?;

    if keys.is_empty() {
        terminal::print_warning(&format!(
            "No clips under '{}' in {}",
            config.upload_prefix,
            store_label(cli)
        ));
    }
    for key in &keys {
        println!("{key}");
    }
    log::debug!("Listed {} clip(s)", keys.len());
    Ok(keys)
}
