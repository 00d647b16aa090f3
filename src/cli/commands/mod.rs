//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed to by
//! [`CommandDispatcher`].

pub mod dispatcher;
pub mod find;
pub mod handlers;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
