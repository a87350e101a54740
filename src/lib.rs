// library crate for scriptcond
// condition trees, the chunk codec they load from, and the CLI used by both binaries

pub mod chunk;
pub mod cli;
pub mod conditions;
pub mod config;
pub mod script;
