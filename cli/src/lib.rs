//! punkt: manage dotfiles as symlinks into a data directory.
//!
//! A declarative TOML file names managed directories (every child is linked
//! into a parent such as `~`) and explicit `link -> target` pairs.  Each
//! command classifies every configured link as managed, unmanaged, or
//! missing and drives it toward the requested state, backing up anything
//! it would otherwise destroy.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse, expand, and validate the TOML configuration
//! - **[`operations`]**: filesystem primitives behind a mockable trait
//! - **[`resources`]**: per-link classification and backups
//! - **[`tasks`]**: link-set expansion, reconciliation, and `add`
//! - **[`commands`]**: subcommand orchestration and report rendering
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod resources;
pub mod tasks;
