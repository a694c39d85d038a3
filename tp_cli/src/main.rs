//! Command-line front end for a shared Tin Patti table.
//!
//! Every invocation loads the table record, applies one command, saves, and
//! exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use pico_args::Arguments;
use tin_patti::StorageConfig;
use tp_cli::{
    app::App,
    commands::{Flags, parse_command},
};

const HELP: &str = "\
Play Tin Patti with up to five people at one shared table

USAGE:
  tp_cli [OPTIONS] COMMAND [ARGS]

COMMANDS:
  status                       Show players, balances, bets, and the pot
  join NAME [--admin]          Take a seat (2-15 characters)
  leave ID                     Give up a seat
  bet ID AMOUNT                Place a bet
  seed --as ADMIN              Give every player the initial 1000 chips
  grant AMOUNT [--to ID] --as ADMIN
                               Give chips to every player, or to one
  clear --as ADMIN             Clear every bet for a new round
  payout WINNER --as ADMIN     Pay the pot to the winner
  exit [--as ADMIN]            Close the table
  identity NAME                Create this device's identity
  whoami                       Show this device's identity
  sit [--admin]                Seat this device's identity
  reset-balance                Give this device's identity 1000 chips again
  forget                       Remove this device's identity

OPTIONS:
  --data-dir DIR               Where records are kept  [default: env TINPATTI_DATA_DIR or .tinpatti]
  --as ID                      Player performing an admin action
  --to ID                      Recipient of a grant

FLAGS:
  --admin                      Seat as the table admin
  -h, --help                   Print help information

ENVIRONMENT:
  TINPATTI_DATA_DIR            Data directory
  TINPATTI_SESSION_FILE        Table record file name
  TINPATTI_IDENTITY_FILE       Identity record file name
  RUST_LOG                     Log filter (e.g., debug)
";

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let data_dir: Option<PathBuf> = pargs.opt_value_from_str("--data-dir")?;
    let flags = Flags {
        caller: pargs.opt_value_from_str("--as")?,
        to: pargs.opt_value_from_str("--to")?,
        admin: pargs.contains("--admin"),
    };
    let words: Vec<String> = pargs
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    env_logger::builder().format_target(false).init();

    let mut config = StorageConfig::from_env();
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    config.validate().context("Invalid storage configuration")?;

    let command = parse_command(&words, &flags)?;
    info!("Using table record at {}", config.session_path().display());

    let mut app = App::new(config.open_table(), config.identity_store());
    println!("{}", app.execute(command)?);
    Ok(())
}
