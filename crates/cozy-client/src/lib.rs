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

//! Authorized HTTP handles for the cozy public and administrative APIs.
//!
//! Layout:
//! - `auth.rs`: the `Authorizer` credential strategies
//! - `client.rs`: `Client` and request construction
//! - `token.rs`: the administrative token exchange
//! - `error.rs`: `ClientError`

pub mod auth;
pub mod client;
pub mod error;
pub mod token;

pub use auth::Authorizer;
pub use client::{Client, Scheme};
pub use error::{ClientError, ClientResult};
pub use token::{CLI_AUDIENCE, CLI_SUBJECT, TokenOptions};
