//! Read-only reporting snapshots over the ledger, catalog, and roster.
//!
//! A [`LibraryReport`] is built once from the stores and then rendered;
//! rendering can fail (a format with no backend) without ever touching
//! circulation state.

use crate::catalog::Catalog;
use crate::ledger::Ledger;
use crate::roster::Roster;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Display date format, day first as on the circulation desk
const DATE_FORMAT: &str = "%d-%m-%Y";

/// Output format for a rendered report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    /// No PDF backend is linked in; selecting this reports a
    /// capability-unavailable error instead of rendering.
    Pdf,
}

/// One active loan, joined with display names
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveIssueLine {
    pub issue_id: u64,
    pub book_id: String,
    pub book_title: String,
    pub member_id: String,
    pub member_name: String,
    pub due_at: DateTime<Utc>,
}

/// One member's fine summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberFineLine {
    pub member_id: String,
    pub name: String,
    pub phone: String,
    pub outstanding_fine: u64,
    pub blocked: bool,
}

/// Borrowing and fines summary: active issues plus member balances
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryReport {
    pub generated_at: DateTime<Utc>,
    pub active_issues: Vec<ActiveIssueLine>,
    pub members: Vec<MemberFineLine>,
}

impl LibraryReport {
    /// Snapshot the current circulation state. Pure read path; a record
    /// referencing a missing book or member renders as "Unknown" rather
    /// than failing the whole report.
    pub fn build(
        ledger: &Ledger,
        catalog: &Catalog,
        roster: &Roster,
        now: DateTime<Utc>,
    ) -> Self {
        let active_issues = ledger
            .active_issues()
            .map(|record| ActiveIssueLine {
                issue_id: record.id,
                book_id: record.book_id.clone(),
                book_title: catalog
                    .find(&record.book_id)
                    .map(|b| b.title.clone())
                    .unwrap_or_else(|_| "Unknown".to_string()),
                member_id: record.member_id.clone(),
                member_name: roster
                    .find(&record.member_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|_| "Unknown".to_string()),
                due_at: record.due_at,
            })
            .collect();

        let members = roster
            .members()
            .map(|m| MemberFineLine {
                member_id: m.id.clone(),
                name: m.name.clone(),
                phone: m.phone.clone(),
                outstanding_fine: m.outstanding_fine,
                blocked: m.blocked,
            })
            .collect();

        Self {
            generated_at: now,
            active_issues,
            members,
        }
    }

    /// Render the snapshot in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ReportFormat::Pdf => Err(Error::ReportUnavailable(
                "no PDF backend is linked into this build".into(),
            )),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Library Borrowing Summary & Fines");
        let _ = writeln!(
            out,
            "Generated on: {}",
            self.generated_at.format(DATE_FORMAT)
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "Active Issues:");
        if self.active_issues.is_empty() {
            let _ = writeln!(out, "  No active issues.");
        }
        for line in &self.active_issues {
            let _ = writeln!(
                out,
                "  ID {} | Book: {} | Member: {} | Due: {}",
                line.issue_id,
                line.book_title,
                line.member_name,
                line.due_at.format(DATE_FORMAT)
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Members & Outstanding Fines:");
        if self.members.is_empty() {
            let _ = writeln!(out, "  No members.");
        }
        for line in &self.members {
            let _ = writeln!(
                out,
                "  {} - {} | Phone: {} | Fine: {} | Status: {}",
                line.member_id,
                line.name,
                line.phone,
                line.outstanding_fine,
                if line.blocked { "BLOCKED" } else { "ACTIVE" }
            );
        }

        out
    }
}
