//! Core domain types for the Circulate library system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Books and their copy counts
//! - Members, their fines and block status
//! - Issue records and their lifecycle state
//! - Reminder and receipt projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Book Types
// ============================================================================

/// A catalogued book and its copy accounting
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Free-text shelf category (Fiction, Science, ...)
    pub category: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

impl Book {
    /// Number of copies currently out on loan
    pub fn issued_copies(&self) -> u32 {
        self.total_copies - self.available_copies
    }
}

/// Patch for updating a book; `None` fields keep their existing value
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub total_copies: Option<u32>,
}

// ============================================================================
// Member Types
// ============================================================================

/// A registered library member
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Derived from `outstanding_fine`; re-computed on every fine mutation
    pub blocked: bool,
    /// Outstanding fine in minor currency units
    pub outstanding_fine: u64,
    /// Book ids currently held, in borrow order (display convenience;
    /// issued-copy accounting lives on the ledger and catalog)
    pub borrowed_books: Vec<String>,
}

// ============================================================================
// Issue Record Types
// ============================================================================

/// Lifecycle state of an issue record.
///
/// `Returned` is terminal: the return date and charged fine are set exactly
/// once and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IssueState {
    Issued,
    Returned {
        returned_at: DateTime<Utc>,
        fine_charged: u64,
    },
}

/// A single loan of one book copy to one member
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Monotonically increasing, never reused
    pub id: u64,
    pub book_id: String,
    pub member_id: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub state: IssueState,
}

impl IssueRecord {
    /// Whether this record has reached its terminal state
    pub fn is_returned(&self) -> bool {
        matches!(self.state, IssueState::Returned { .. })
    }

    /// Fine charged at return time; 0 while the loan is active
    pub fn fine_charged(&self) -> u64 {
        match self.state {
            IssueState::Issued => 0,
            IssueState::Returned { fine_charged, .. } => fine_charged,
        }
    }

    /// Return date, if the book has come back
    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            IssueState::Issued => None,
            IssueState::Returned { returned_at, .. } => Some(returned_at),
        }
    }

    /// Number of late calendar days as of `on` (0 if not late).
    ///
    /// Uses the actual return date once returned, otherwise `on`.
    /// Time-of-day is ignored; only the calendar date matters.
    pub fn days_late(&self, on: DateTime<Utc>) -> i64 {
        let effective = self.returned_at().unwrap_or(on);
        (effective.date_naive() - self.due_at.date_naive())
            .num_days()
            .max(0)
    }
}

// ============================================================================
// Projection Types
// ============================================================================

/// Classification of an active loan relative to its due date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueStatus {
    /// Past due by `late_by` calendar days (always >= 1)
    Overdue { late_by: i64 },
    /// Due within the configured window, `days_to_due` days out (0 = today)
    DueSoon { days_to_due: i64 },
}

/// A due/overdue reminder for one active issue record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reminder {
    pub issue_id: u64,
    pub book_id: String,
    pub member_id: String,
    pub due_at: DateTime<Utc>,
    pub status: DueStatus,
}

/// Outcome of a successful return, for caller-side display
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub issue_id: u64,
    pub book_id: String,
    pub member_id: String,
    pub late_days: i64,
    pub fine_charged: u64,
    /// Member's total outstanding fine after this return
    pub member_outstanding: u64,
    /// Whether this return pushed the member over the block limit
    pub member_blocked: bool,
}
