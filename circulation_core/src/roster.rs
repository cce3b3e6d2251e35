//! Member roster: the store owning member records, fines, and block status.

use crate::policy::CirculationPolicy;
use crate::types::Member;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Id-keyed member store
#[derive(Clone, Debug, Default)]
pub struct Roster {
    members: BTreeMap<String, Member>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new member with a clean slate: no fine, not blocked,
    /// nothing borrowed. Fails with `DuplicateKey` if the id is taken.
    pub fn register(&mut self, id: &str, name: &str, phone: &str) -> Result<&Member> {
        if self.members.contains_key(id) {
            return Err(Error::DuplicateKey(format!("member '{}'", id)));
        }

        let member = Member {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            blocked: false,
            outstanding_fine: 0,
            borrowed_books: Vec::new(),
        };
        tracing::debug!(member_id = %id, "member registered");

        Ok(self.members.entry(id.to_string()).or_insert(member))
    }

    /// Look up a member by id
    pub fn find(&self, id: &str) -> Result<&Member> {
        self.members
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("member '{}'", id)))
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    /// Add `amount` to the member's outstanding fine and re-derive the
    /// block flag from the policy limit.
    ///
    /// This is the sole block-status transition: `blocked` is never set
    /// independently of the fine balance.
    pub fn apply_fine(
        &mut self,
        member_id: &str,
        amount: u64,
        policy: &CirculationPolicy,
    ) -> Result<&Member> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| Error::NotFound(format!("member '{}'", member_id)))?;

        member.outstanding_fine += amount;
        let was_blocked = member.blocked;
        member.blocked = policy.is_over_limit(member.outstanding_fine);

        if member.blocked && !was_blocked {
            tracing::info!(
                member_id = %member_id,
                outstanding_fine = member.outstanding_fine,
                "member blocked: fine limit reached"
            );
        }

        Ok(member)
    }

    /// All members in id order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
