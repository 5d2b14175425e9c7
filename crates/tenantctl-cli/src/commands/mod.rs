//! Command handlers, one module per subcommand.

mod create;
mod delete;
mod diagnose;
mod keys;

pub(crate) use create::handle_create;
pub(crate) use delete::handle_delete;
pub(crate) use diagnose::handle_diagnose;
pub(crate) use keys::handle_keys;
