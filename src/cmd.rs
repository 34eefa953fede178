//! Module replay text fixtures of commands against a [SymbolTable].
//!
//! Fixtures are newline-delimited, space separated records:
//!
//! ```text
//! insert 5 50
//! delete 5
//! search 3
//! getval 0
//! rank 4
//! getelement 1 3
//! ```
//!
//! `getval` returns the key at a rank and `getelement` the keys between
//! two ranks. Every mutation is followed by an in-order dump of the
//! tree, each key annotated with the colour of its incoming link.

use std::{
    convert::TryFrom,
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use log::{debug, warn};

use crate::{error::Error, symtab::Color, SymbolTable};

/// Table type driven by fixtures.
pub type Table = SymbolTable<i64, i64>;

/// A single parsed command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Insert(i64, i64),
    Delete(i64),
    Search(i64),
    GetVal(i64),
    Rank(i64),
    GetElement(i64, i64),
}

impl FromStr for Command {
    type Err = Error<i64>;

    fn from_str(line: &str) -> Result<Command, Error<i64>> {
        let mut fields = line.split_whitespace();
        let verb = fields.next().unwrap_or("");
        let args = fields
            .map(|field| {
                field.parse::<i64>().map_err(|err| {
                    let msg = format!("{:?} in {:?}: {}", field, line, err);
                    Error::InvalidArgument(msg)
                })
            })
            .collect::<Result<Vec<i64>, Error<i64>>>()?;

        let cmd = match (verb, args.as_slice()) {
            ("insert", &[key, value]) => Command::Insert(key, value),
            ("delete", &[key]) => Command::Delete(key),
            ("search", &[key]) => Command::Search(key),
            ("getval", &[rank]) => Command::GetVal(rank),
            ("rank", &[key]) => Command::Rank(key),
            ("getelement", &[low, high]) => Command::GetElement(low, high),
            ("insert", _) | ("delete", _) | ("search", _) | ("getval", _) | ("rank", _)
            | ("getelement", _) => {
                let msg = format!("wrong number of arguments in {:?}", line);
                return Err(Error::InvalidArgument(msg));
            }
            (verb, _) => {
                let msg = format!("invalid instruction {:?}", verb);
                return Err(Error::InvalidArgument(msg));
            }
        };
        Ok(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Insert(key, value) => write!(f, "insert {} {}", key, value),
            Command::Delete(key) => write!(f, "delete {}", key),
            Command::Search(key) => write!(f, "search {}", key),
            Command::GetVal(rank) => write!(f, "getval {}", rank),
            Command::Rank(key) => write!(f, "rank {}", key),
            Command::GetElement(low, high) => write!(f, "getelement {} {}", low, high),
        }
    }
}

impl Command {
    /// Apply this command on `table` and return its outcome. Never
    /// fails, rejected operations are reported within the response.
    pub fn apply(&self, table: &mut Table) -> Response {
        match *self {
            Command::Insert(key, value) => {
                table.insert(key, value);
                Response::tree(table, None)
            }
            Command::Delete(key) => {
                let error = table.delete(&key).err();
                Response::tree(table, error)
            }
            Command::Search(key) => Response::Value(table.search(&key)),
            Command::GetVal(rank) => {
                let size = table.len();
                let key = usize::try_from(rank)
                    .ok()
                    .and_then(|k| table.select(k))
                    .ok_or(Error::OutOfRange { rank, size });
                Response::Key(key)
            }
            Command::Rank(key) => Response::Rank(table.rank(&key)),
            Command::GetElement(low, high) => {
                let keys = match (usize::try_from(low), usize::try_from(high)) {
                    (Ok(low), Ok(high)) => table.range_by_rank(low, high),
                    _ => vec![],
                };
                Response::Keys(keys)
            }
        }
    }
}

/// Outcome of applying a [Command].
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// In-order dump after a mutation, along with the reason when the
    /// mutation was rejected.
    Tree {
        dump: Vec<(i64, Color)>,
        error: Option<Error<i64>>,
    },
    Value(Option<i64>),
    Key(Result<i64, Error<i64>>),
    Rank(Option<usize>),
    Keys(Vec<i64>),
}

impl Response {
    fn tree(table: &Table, error: Option<Error<i64>>) -> Response {
        let dump = dump(table);
        Response::Tree { dump, error }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Response::Tree { dump, error } => {
                if let Some(err) = error {
                    writeln!(f, "{}", err)?;
                }
                for (key, color) in dump.iter() {
                    let color = match color {
                        Color::Red => "Red",
                        Color::Black => "Black",
                    };
                    writeln!(f, "Color: {}; Key: {}", color, key)?;
                }
                Ok(())
            }
            Response::Value(Some(value)) => writeln!(f, "{}", value),
            Response::Key(Ok(key)) => writeln!(f, "{}", key),
            Response::Value(None) | Response::Key(Err(_)) => writeln!(f, "null"),
            Response::Rank(Some(rank)) => writeln!(f, "{}", rank),
            Response::Rank(None) => writeln!(f, "-1"),
            Response::Keys(keys) => {
                for key in keys.iter() {
                    writeln!(f, "{}", key)?;
                }
                Ok(())
            }
        }
    }
}

/// In-order list of keys with the colour of their incoming link.
pub fn dump(table: &Table) -> Vec<(i64, Color)> {
    let mut acc = Vec::with_capacity(table.len());
    let mut stack = vec![];
    let mut node = table.root();
    while node.is_some() || !stack.is_empty() {
        while let Some(nref) = node {
            stack.push(nref);
            node = nref.left();
        }
        if let Some(nref) = stack.pop() {
            acc.push((*nref.key(), nref.color()));
            node = nref.right();
        }
    }
    acc
}

/// Replay every command read from `input` against `table`, writing
/// each command followed by its response to `output`. Blank lines and
/// lines starting with `#` are skipped. Malformed commands are reported
/// inline and do not stop the replay. Return the number of commands
/// applied.
pub fn replay<R, W>(table: &mut Table, input: R, mut output: W) -> Result<usize, Error<i64>>
where
    R: BufRead,
    W: Write,
{
    let mut n_cmds = 0;
    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        writeln!(output, "{}", line)?;
        match line.parse::<Command>() {
            Ok(cmd) => {
                let resp = cmd.apply(table);
                debug!("line {}: {} -> {:?}", lineno + 1, cmd, resp);
                write!(output, "{}", resp)?;
                n_cmds += 1;
            }
            Err(err) => {
                warn!("line {}: {}", lineno + 1, err);
                writeln!(output, "{}", err)?;
            }
        }
        writeln!(output)?;
    }
    Ok(n_cmds)
}
