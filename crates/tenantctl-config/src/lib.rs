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
#![allow(clippy::module_name_repetitions)]

//! Operator configuration for the tenant provisioning CLI.
//!
//! Layout: `model.rs` (typed configuration document), `loader.rs` (file IO and
//! parsing), `validate.rs` (field checks and URL normalisation), `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, parse_config};
pub use model::{
    AppConfig, BackoffStrategy, DatasourceTemplate, ProvisioningSettings, ServiceCredentials,
};
