//! Admin dialog core: schedule editing, file/object pickers, confirmations
//! with a "don't ask again" window, and persisted picker filters.
//!
//! Rendering stays with the host page.  Each dialog is a reducer
//! ([`dialogs::DialogState`]) mounted as a [`state::Dialog`] that runs its
//! side effects against an injected [`env::DialogEnv`].

#[macro_use]
mod macros;

pub mod bindings;
pub mod callbacks;
pub mod clock;
pub mod command_executors;
pub mod config;
pub mod constants;
pub mod dialogs;
pub mod env;
pub mod error;
pub mod filters;
pub mod logging;
pub mod messages;
pub mod schedule;
pub mod scheduling;
pub mod selection;
pub mod state;
pub mod storage;
pub mod suppression;

pub use error::DialogError;
