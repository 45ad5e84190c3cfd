//! Pair (a registered team of two players) and its members.

use crate::models::tournament::{SchedulerError, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pair (used in groups and fixtures).
pub type PairId = Uuid;

/// One player of a pair. Only the contact fields may change after fixtures exist.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
        }
    }
}

/// Contact details that can be edited on a pair member at any time.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A registered pair competing in one category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub tournament_id: TournamentId,
    pub category: String,
    pub members: [Member; 2],
    /// Only confirmed pairs are partitioned into groups.
    pub confirmed: bool,
}

impl Pair {
    /// Create an unconfirmed pair. Both member names must be non-empty and different.
    pub fn new(
        tournament_id: TournamentId,
        category: impl Into<String>,
        first: Member,
        second: Member,
    ) -> Result<Self, SchedulerError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(SchedulerError::InvalidPair("category is empty".into()));
        }
        let first = Member {
            name: first.name.trim().to_string(),
            ..first
        };
        let second = Member {
            name: second.name.trim().to_string(),
            ..second
        };
        if first.name.is_empty() || second.name.is_empty() {
            return Err(SchedulerError::InvalidPair("member name is empty".into()));
        }
        if first.name.eq_ignore_ascii_case(&second.name) {
            return Err(SchedulerError::InvalidPair(format!(
                "{} cannot partner themselves",
                first.name
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            tournament_id,
            category,
            members: [first, second],
            confirmed: false,
        })
    }

    /// Same as [`Pair::new`] but already confirmed.
    pub fn confirmed(
        tournament_id: TournamentId,
        category: impl Into<String>,
        first: Member,
        second: Member,
    ) -> Result<Self, SchedulerError> {
        let mut pair = Self::new(tournament_id, category, first, second)?;
        pair.confirmed = true;
        Ok(pair)
    }

    /// Display label, e.g. "Ana / Bea".
    pub fn label(&self) -> String {
        format!("{} / {}", self.members[0].name, self.members[1].name)
    }

    /// Apply a contact edit to member `index` (0 or 1). Names and category never change here.
    pub fn update_contact(&mut self, index: usize, update: ContactUpdate) -> Result<(), SchedulerError> {
        let member = self
            .members
            .get_mut(index)
            .ok_or_else(|| SchedulerError::InvalidPair(format!("no member at position {index}")))?;
        if update.email.is_some() {
            member.email = update.email;
        }
        if update.phone.is_some() {
            member.phone = update.phone;
        }
        Ok(())
    }
}
