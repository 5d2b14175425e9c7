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

//! Shared test helpers used across the workspace's suites.
//! Layout: `fixtures.rs` (configuration documents) and `mocks.rs` (fake
//! transport, scripted prompt, recording sleeper).

pub mod fixtures;
pub mod mocks;
