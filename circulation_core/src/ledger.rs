//! Circulation ledger: the issue/return state machine.
//!
//! The ledger owns every [`IssueRecord`] and the id counter behind them,
//! and is the only component that mutates book availability and member
//! borrow/fine state (through [`Catalog`] and [`Roster`]). Each operation
//! validates everything first and mutates last, so a failed call leaves
//! no partial state behind.

use crate::catalog::Catalog;
use crate::policy::{calendar_days_between, CirculationPolicy};
use crate::roster::Roster;
use crate::types::{DueStatus, IssueRecord, IssueState, Reminder, ReturnReceipt};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Owner of issue records and the issue-id counter
#[derive(Clone, Debug)]
pub struct Ledger {
    issues: BTreeMap<u64, IssueRecord>,
    /// Next id to hand out; strictly increasing, starts at 1, never reused
    next_issue_id: u64,
    policy: CirculationPolicy,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(CirculationPolicy::default())
    }
}

impl Ledger {
    pub fn new(policy: CirculationPolicy) -> Self {
        Self {
            issues: BTreeMap::new(),
            next_issue_id: 1,
            policy,
        }
    }

    pub fn policy(&self) -> &CirculationPolicy {
        &self.policy
    }

    /// Issue one copy of a book to a member.
    ///
    /// Checks, in order:
    /// 1. Book and member resolve (`NotFound`)
    /// 2. Member not blocked, with the flag re-derived from the current
    ///    fine balance first (`MemberBlocked`)
    /// 3. A copy is available (`NoAvailability`)
    ///
    /// On success a new `IssueRecord` in state `Issued` exists, the book
    /// has one fewer available copy, and the member's borrowed list gains
    /// the book id.
    pub fn issue(
        &mut self,
        catalog: &mut Catalog,
        roster: &mut Roster,
        book_id: &str,
        member_id: &str,
        now: DateTime<Utc>,
    ) -> Result<&IssueRecord> {
        catalog.find(book_id)?;
        roster.find(member_id)?;

        // Re-derive the block flag before trusting it. The roster keeps it
        // derived already, but the flag must never drift past the fine
        // balance at the moment of issue.
        {
            let member = roster
                .find_mut(member_id)
                .ok_or_else(|| Error::NotFound(format!("member '{}'", member_id)))?;
            member.blocked = self.policy.is_over_limit(member.outstanding_fine);
            if member.blocked {
                return Err(Error::MemberBlocked(member_id.to_string()));
            }
        }

        if catalog.find(book_id)?.available_copies == 0 {
            return Err(Error::NoAvailability(book_id.to_string()));
        }

        // All checks passed; the remaining mutations cannot fail.
        let issue_id = self.next_issue_id;
        self.next_issue_id += 1;

        let record = IssueRecord {
            id: issue_id,
            book_id: book_id.to_string(),
            member_id: member_id.to_string(),
            issued_at: now,
            due_at: self.policy.due_date(now),
            state: IssueState::Issued,
        };

        if let Some(book) = catalog.find_mut(book_id) {
            book.available_copies -= 1;
        }
        if let Some(member) = roster.find_mut(member_id) {
            member.borrowed_books.push(book_id.to_string());
        }

        tracing::info!(
            issue_id,
            book_id = %book_id,
            member_id = %member_id,
            due_at = %record.due_at,
            "book issued"
        );

        Ok(self.issues.entry(issue_id).or_insert(record))
    }

    /// Record the return of an issued book and charge any late fine.
    ///
    /// Checks, in order:
    /// 1. Issue record resolves (`NotFound`)
    /// 2. Not already returned (`AlreadyReturned`)
    /// 3. The referenced book and member still resolve (`DataIntegrity` —
    ///    external corruption, aborted rather than repaired)
    ///
    /// The fine is `late calendar days x fine_per_day`, charged exactly
    /// once; the record becomes terminal; the member may become blocked
    /// in this call.
    pub fn return_book(
        &mut self,
        catalog: &mut Catalog,
        roster: &mut Roster,
        issue_id: u64,
        now: DateTime<Utc>,
    ) -> Result<ReturnReceipt> {
        let record = self
            .issues
            .get(&issue_id)
            .ok_or_else(|| Error::NotFound(format!("issue record {}", issue_id)))?;
        if record.is_returned() {
            return Err(Error::AlreadyReturned(issue_id));
        }

        let book_id = record.book_id.clone();
        let member_id = record.member_id.clone();
        if catalog.find(&book_id).is_err() {
            return Err(Error::DataIntegrity(format!(
                "issue record {} references missing book '{}'",
                issue_id, book_id
            )));
        }
        if roster.find(&member_id).is_err() {
            return Err(Error::DataIntegrity(format!(
                "issue record {} references missing member '{}'",
                issue_id, member_id
            )));
        }

        let late_days = record.days_late(now);
        let fine = self.policy.fine_for(late_days);

        // All checks passed; mutate the record, then member, then book.
        if let Some(record) = self.issues.get_mut(&issue_id) {
            record.state = IssueState::Returned {
                returned_at: now,
                fine_charged: fine,
            };
        }

        let member = roster.apply_fine(&member_id, fine, &self.policy)?;
        let member_outstanding = member.outstanding_fine;
        let member_blocked = member.blocked;

        if let Some(book) = catalog.find_mut(&book_id) {
            book.available_copies += 1;
        }
        if let Some(member) = roster.find_mut(&member_id) {
            // Remove one occurrence; a missing entry is tolerated since the
            // borrowed list is a display convenience, not the loan authority.
            if let Some(pos) = member.borrowed_books.iter().position(|b| b == &book_id) {
                member.borrowed_books.remove(pos);
            }
        }

        tracing::info!(
            issue_id,
            book_id = %book_id,
            member_id = %member_id,
            late_days,
            fine,
            "book returned"
        );

        Ok(ReturnReceipt {
            issue_id,
            book_id,
            member_id,
            late_days,
            fine_charged: fine,
            member_outstanding,
            member_blocked,
        })
    }

    /// Look up an issue record by id
    pub fn find(&self, issue_id: u64) -> Result<&IssueRecord> {
        self.issues
            .get(&issue_id)
            .ok_or_else(|| Error::NotFound(format!("issue record {}", issue_id)))
    }

    /// All records not yet returned, in creation order
    pub fn active_issues(&self) -> impl Iterator<Item = &IssueRecord> {
        self.issues.values().filter(|r| !r.is_returned())
    }

    /// All records regardless of state, in creation order
    pub fn history(&self) -> impl Iterator<Item = &IssueRecord> {
        self.issues.values()
    }

    /// Classify every active record against `now`: overdue, due within the
    /// policy's due-soon window, or omitted.
    pub fn reminders(&self, now: DateTime<Utc>) -> Vec<Reminder> {
        self.active_issues()
            .filter_map(|record| {
                let days_to_due = calendar_days_between(now, record.due_at);
                let status = if days_to_due < 0 {
                    Some(DueStatus::Overdue {
                        late_by: -days_to_due,
                    })
                } else if days_to_due <= self.policy.due_soon_window_days {
                    Some(DueStatus::DueSoon { days_to_due })
                } else {
                    None
                };
                status.map(|status| Reminder {
                    issue_id: record.id,
                    book_id: record.book_id.clone(),
                    member_id: record.member_id.clone(),
                    due_at: record.due_at,
                    status,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
