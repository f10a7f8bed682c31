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

//! Layered configuration resolution for the cozy command-line client.
//!
//! Layout: `env.rs` (environment snapshots), `resolver.rs` (file discovery and
//! layer merging), `store.rs` (`ConfigStore` lookups), `model.rs` (typed
//! `Settings`), `validate.rs` (value coercion helpers), `defaults.rs`
//! (compiled defaults and search paths).

pub mod defaults;
pub mod env;
pub mod error;
pub mod model;
pub mod resolver;
pub mod store;
mod validate;

pub use env::Environment;
pub use error::{ConfigError, ConfigResult, ParseError};
pub use model::{AdminSettings, DeployMode, LogSettings, Settings};
pub use resolver::{ConfigSources, resolve};
pub use store::{ConfigStore, Layer, env_key};
