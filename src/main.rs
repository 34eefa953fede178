// Replay a fixture of commands against a fresh symbol table, printing
// every command, its outcome and, after mutations, an in-order dump of
// the tree annotated with link colours.
//
//   LLRB_SYMTAB_LOG=debug llrb-symtab fixtures/test_all.txt

use std::{
    fs::File,
    io::{self, BufReader},
    process,
};

use log::info;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};

use llrb_symtab::{cmd, config::Config, Error};

fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Error<i64>> {
    // a logger may already be installed when embedded, ignore.
    let _ = TermLogger::init(
        config.log_level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let input = BufReader::new(File::open(&config.fixture)?);
    let stdout = io::stdout();
    let mut table = cmd::Table::new();
    let n_cmds = cmd::replay(&mut table, input, stdout.lock())?;
    info!(
        "replayed {} commands from {:?}, {} entries",
        n_cmds,
        config.fixture,
        table.len()
    );
    Ok(())
}
