#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! The `cozy-stack` command-line client.
//!
//! Layout:
//! - `cli.rs`: flag surface, configuration bootstrap, and command dispatch
//! - `context.rs`: the per-invocation `AppContext` and `CliError`
//! - `secret.rs`: administrative password acquisition
//! - `factory.rs`: administrative and scoped client construction
//! - `commands/`: command handlers grouped by concern
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod context;
pub(crate) mod factory;
pub(crate) mod output;
pub(crate) mod secret;

pub use cli::run;
