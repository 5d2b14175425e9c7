#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(
    dead_code,
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Operator CLI that provisions tenant organizations, datasources, and API keys.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers, one per subcommand
//! - `client.rs`: HTTP transport, application context, and the CLI error type
//! - `prompt.rs`: stdin-backed operator prompt
//! - `output.rs`: text and JSON renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod prompt;

pub use cli::run;
