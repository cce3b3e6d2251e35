#![forbid(unsafe_code)]

//! Core domain model and business logic for the Circulate library system.
//!
//! This crate provides:
//! - Domain types (books, members, issue records, reminders)
//! - Catalog and roster stores
//! - The circulation ledger (issue/return state machine and fines)
//! - Reporting snapshots
//! - Configuration loading

pub mod types;
pub mod error;
pub mod policy;
pub mod catalog;
pub mod roster;
pub mod ledger;
pub mod report;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use policy::CirculationPolicy;
pub use catalog::Catalog;
pub use roster::Roster;
pub use ledger::Ledger;
pub use report::{LibraryReport, ReportFormat};
pub use config::Config;
