//! The link engine: expand the configuration, reconcile it against the
//! filesystem, and fold new files into management.
//!
//! Everything here returns structured reports and typed errors; the
//! [`commands`](crate::commands) layer renders them.
pub mod add;
pub mod link_set;
pub mod symlinks;

pub use add::{AddOperation, Added};
pub use link_set::{LinkGroup, LinkSet, LinkSource};
pub use symlinks::{
    CheckEntry, CheckReport, EntryReport, Outcome, Reconciler, RunReport, SkipReason,
};
