//! Configuration for the `llrb-symtab` binary.

use std::{path::PathBuf, str::FromStr};

use log::LevelFilter;

use crate::error::Error;

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "LLRB_SYMTAB_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Config for a single replay run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Fixture file to replay.
    pub fixture: PathBuf,
    /// Verbosity of the terminal logger.
    pub log_level: LevelFilter,
}

impl Config {
    /// Build configuration from command line arguments, program name
    /// included, and the value of [LOG_ENV] if it is set.
    pub fn new<I, S>(args: I, log_env: Option<S>) -> Result<Config, Error<i64>>
    where
        I: IntoIterator<Item = String>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter().skip(1);
        let fixture = match (args.next(), args.next()) {
            (Some(fixture), None) => PathBuf::from(fixture),
            _ => {
                let msg = "usage: llrb-symtab <fixture-file>".to_string();
                return Err(Error::InvalidArgument(msg));
            }
        };

        let log_level = match log_env {
            Some(level) => LevelFilter::from_str(level.as_ref().trim()).map_err(|_| {
                let msg = format!("{} = {:?}", LOG_ENV, level.as_ref());
                Error::InvalidArgument(msg)
            })?,
            None => DEFAULT_LEVEL,
        };

        Ok(Config { fixture, log_level })
    }

    /// Build configuration from the running process.
    pub fn from_env() -> Result<Config, Error<i64>> {
        Config::new(std::env::args(), std::env::var(LOG_ENV).ok())
    }
}
