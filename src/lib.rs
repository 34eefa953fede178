//! Ordered symbol table with rank and select, implemented on a
//! [left-leaning-red-black][wiki-llrb] tree.
//!
//! - Each entry in a [SymbolTable] correspond to a {Key, Value} pair.
//! - Parametrised over `key-type` and `value-type`.
//! - insert(), search(), delete() and delete_min() api.
//! - Order statistics via rank(), select() and range_by_rank().
//! - In-order iteration.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! The [cmd] module replays text fixtures of commands against a table,
//! it backs the `llrb-symtab` binary.
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree

mod error;
mod stats;
mod symtab;

pub mod cmd;
pub mod config;

pub use crate::error::Error;
pub use crate::stats::{Depth, Stats};
pub use crate::symtab::{Color, Iter, Node, SymbolTable};


#[cfg(test)]
mod cmd_test;
