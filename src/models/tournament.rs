//! Tournament aggregate and SchedulerError.

use crate::models::fixture::{Fixture, FixtureId};
use crate::models::group::{Group, GroupId, GroupPair};
use crate::models::pair::{ContactUpdate, Pair, PairId};
use crate::models::schedule::{ScheduleSummary, SchedulingWindow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur while building or storing a schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchedulerError {
    /// No confirmed pairs to partition.
    EmptyInput,
    /// Target group size below 2.
    InvalidGroupSize(usize),
    /// Group numbers start at 1.
    InvalidGroupNumber,
    /// Request asks for zero courts.
    ZeroCourts,
    /// Match duration of zero minutes.
    InvalidDuration,
    /// Request has no scheduling windows.
    NoWindows,
    /// Window ends at or before its start.
    InvalidWindow(SchedulingWindow),
    /// Two windows on the same date share time.
    OverlappingWindows(SchedulingWindow, SchedulingWindow),
    /// Windows produce no usable slot at all.
    EmptyGrid,
    /// Fixture points at a group that is not part of the request.
    UnknownGroup(GroupId),
    UnknownFixture(FixtureId),
    UnknownPair(PairId),
    UnknownCategory(String),
    DuplicateCategory(String),
    /// Pair exists but has not been confirmed.
    PairNotConfirmed(PairId),
    /// Pairs handed to the partitioner belong to different categories.
    MixedCategories,
    /// Pair record failed validation.
    InvalidPair(String),
    /// A fixture cannot pit a pair against itself.
    SamePair(PairId),
    /// Group already holds `capacity` pairs.
    GroupFull(GroupId),
    /// Allocation books a court slot or a pair twice at the same time.
    DoubleBooked(FixtureId),
    TournamentNotFound(Uuid),
    /// Durable store could not be read or written.
    Storage(String),
    /// Roster CSV could not be parsed.
    Import(String),
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::EmptyInput => write!(f, "No confirmed pairs to place in groups"),
            SchedulerError::InvalidGroupSize(size) => {
                write!(f, "Group size must be at least 2 (got {})", size)
            }
            SchedulerError::InvalidGroupNumber => write!(f, "Group numbers start at 1"),
            SchedulerError::ZeroCourts => write!(f, "At least one court is required"),
            SchedulerError::InvalidDuration => {
                write!(f, "Match duration must be at least one minute and not overflow with the break")
            }
            SchedulerError::NoWindows => write!(f, "At least one scheduling window is required"),
            SchedulerError::InvalidWindow(w) => write!(
                f,
                "Window on {} must end after it starts, on whole minutes ({} - {})",
                w.date, w.start_time, w.end_time
            ),
            SchedulerError::OverlappingWindows(a, b) => write!(
                f,
                "Windows {} - {} and {} - {} on {} overlap",
                a.start_time, a.end_time, b.start_time, b.end_time, a.date
            ),
            SchedulerError::EmptyGrid => write!(f, "Scheduling windows are too short for a single match"),
            SchedulerError::UnknownGroup(id) => write!(f, "Group {} not found", id),
            SchedulerError::UnknownFixture(id) => write!(f, "Fixture {} not found", id),
            SchedulerError::UnknownPair(id) => write!(f, "Pair {} not found", id),
            SchedulerError::UnknownCategory(c) => write!(f, "Category '{}' not found", c),
            SchedulerError::DuplicateCategory(c) => write!(f, "Category '{}' already exists", c),
            SchedulerError::PairNotConfirmed(id) => write!(f, "Pair {} is not confirmed", id),
            SchedulerError::MixedCategories => write!(f, "All pairs in a group must share one category"),
            SchedulerError::InvalidPair(reason) => write!(f, "Invalid pair: {}", reason),
            SchedulerError::SamePair(_) => write!(f, "A pair cannot play against itself"),
            SchedulerError::GroupFull(id) => write!(f, "Group {} is full", id),
            SchedulerError::DoubleBooked(id) => write!(f, "Fixture {} clashes with another booking", id),
            SchedulerError::TournamentNotFound(_) => write!(f, "No tournament"),
            SchedulerError::Storage(reason) => write!(f, "Storage error: {}", reason),
            SchedulerError::Import(reason) => write!(f, "Import error: {}", reason),
        }
    }
}

impl std::error::Error for SchedulerError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Everything the scheduler knows about one tournament: pairs, groups, fixtures.
///
/// Foreign keys are plain ids; [`Tournament::remove_group`] and [`Tournament::reset`]
/// keep them consistent by cascading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Categories in declaration order; this order drives allocation.
    pub categories: Vec<String>,
    pub pairs: Vec<Pair>,
    pub groups: Vec<Group>,
    pub group_pairs: Vec<GroupPair>,
    pub fixtures: Vec<Fixture>,
    /// Outcome of the most recent generation, None when no schedule is applied.
    pub last_schedule: Option<ScheduleSummary>,
}

impl Tournament {
    /// Create an empty tournament.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: Vec::new(),
            pairs: Vec::new(),
            groups: Vec::new(),
            group_pairs: Vec::new(),
            fixtures: Vec::new(),
            last_schedule: None,
        }
    }

    /// Add a category at the end of the declaration order.
    pub fn declare_category(&mut self, category: impl Into<String>) -> Result<(), SchedulerError> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(SchedulerError::UnknownCategory(category));
        }
        if self.has_category(&category) {
            return Err(SchedulerError::DuplicateCategory(category));
        }
        self.categories.push(category);
        Ok(())
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Register a pair; its category is declared on first use.
    pub fn add_pair(&mut self, pair: Pair) -> Result<PairId, SchedulerError> {
        if pair.tournament_id != self.id {
            return Err(SchedulerError::InvalidPair("pair belongs to another tournament".into()));
        }
        if self.pairs.iter().any(|p| p.id == pair.id) {
            return Err(SchedulerError::InvalidPair("pair already registered".into()));
        }
        if !self.has_category(&pair.category) {
            self.categories.push(pair.category.clone());
        }
        let id = pair.id;
        self.pairs.push(pair);
        Ok(id)
    }

    pub fn confirm_pair(&mut self, pair_id: PairId) -> Result<(), SchedulerError> {
        let pair = self
            .pairs
            .iter_mut()
            .find(|p| p.id == pair_id)
            .ok_or(SchedulerError::UnknownPair(pair_id))?;
        pair.confirmed = true;
        Ok(())
    }

    pub fn pair(&self, pair_id: PairId) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.id == pair_id)
    }

    /// Edit a member's contact details. Allowed even after fixtures reference the pair.
    pub fn update_contact(
        &mut self,
        pair_id: PairId,
        member_index: usize,
        update: ContactUpdate,
    ) -> Result<(), SchedulerError> {
        self.pairs
            .iter_mut()
            .find(|p| p.id == pair_id)
            .ok_or(SchedulerError::UnknownPair(pair_id))?
            .update_contact(member_index, update)
    }

    /// Confirmed pairs of a category, in registration order.
    pub fn confirmed_pairs(&self, category: &str) -> Result<Vec<&Pair>, SchedulerError> {
        if !self.has_category(category) {
            return Err(SchedulerError::UnknownCategory(category.to_string()));
        }
        Ok(self
            .pairs
            .iter()
            .filter(|p| p.confirmed && p.category == category)
            .collect())
    }

    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Groups of a category ordered by group number.
    pub fn groups_in(&self, category: &str) -> Vec<&Group> {
        let mut groups: Vec<_> = self.groups.iter().filter(|g| g.category == category).collect();
        groups.sort_by_key(|g| g.group_number);
        groups
    }

    /// Memberships of a group ordered by pair number.
    pub fn members(&self, group_id: GroupId) -> Vec<GroupPair> {
        let mut members: Vec<_> = self
            .group_pairs
            .iter()
            .filter(|gp| gp.group_id == group_id)
            .copied()
            .collect();
        members.sort_by_key(|gp| gp.pair_number);
        members
    }

    /// Fixtures of a group in creation order.
    pub fn fixtures_in(&self, group_id: GroupId) -> Vec<&Fixture> {
        self.fixtures.iter().filter(|f| f.group_id == group_id).collect()
    }

    pub fn fixture(&self, fixture_id: FixtureId) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == fixture_id)
    }

    pub fn fixture_mut(&mut self, fixture_id: FixtureId) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == fixture_id)
    }

    /// Group of `category` that already holds `pair_id`, if any.
    pub fn group_of_pair(&self, category: &str, pair_id: PairId) -> Option<GroupId> {
        self.group_pairs
            .iter()
            .find(|gp| {
                gp.pair_id == pair_id
                    && self.group(gp.group_id).is_some_and(|g| g.category == category)
            })
            .map(|gp| gp.group_id)
    }

    /// Delete a group together with its memberships and fixtures. Returns fixtures removed.
    pub fn remove_group(&mut self, group_id: GroupId) -> Result<usize, SchedulerError> {
        let idx = self
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or(SchedulerError::UnknownGroup(group_id))?;
        self.groups.remove(idx);
        self.group_pairs.retain(|gp| gp.group_id != group_id);
        let before = self.fixtures.len();
        self.fixtures.retain(|f| f.group_id != group_id);
        Ok(before - self.fixtures.len())
    }

    /// Drop every group, membership and fixture. Pairs stay registered. Returns fixtures removed.
    pub fn reset(&mut self) -> usize {
        let removed = self.fixtures.len();
        self.groups.clear();
        self.group_pairs.clear();
        self.fixtures.clear();
        self.last_schedule = None;
        removed
    }

    /// Fixtures still waiting for a court and time.
    pub fn unscheduled_fixtures(&self) -> Vec<&Fixture> {
        self.fixtures.iter().filter(|f| !f.is_scheduled()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;

    fn pair(t: &Tournament, category: &str, a: &str, b: &str) -> Pair {
        Pair::new(t.id, category, Member::new(a), Member::new(b)).unwrap()
    }

    #[test]
    fn categories_keep_declaration_order() {
        let mut t = Tournament::new("Open");
        t.declare_category("Women").unwrap();
        let p = pair(&t, "Men", "Ana", "Bea");
        t.add_pair(p).unwrap();
        assert_eq!(t.categories, vec!["Women".to_string(), "Men".to_string()]);
        assert_eq!(
            t.declare_category(" Men "),
            Err(SchedulerError::DuplicateCategory("Men".into()))
        );
    }

    #[test]
    fn only_confirmed_pairs_are_listed() {
        let mut t = Tournament::new("Open");
        let first = t.add_pair(pair(&t, "Men", "Ana", "Bea")).unwrap();
        t.add_pair(pair(&t, "Men", "Cris", "Dora")).unwrap();
        t.confirm_pair(first).unwrap();
        let confirmed = t.confirmed_pairs("Men").unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, first);
        assert!(matches!(t.confirmed_pairs("Kids"), Err(SchedulerError::UnknownCategory(_))));
    }

    #[test]
    fn contact_edit_keeps_names() {
        let mut t = Tournament::new("Open");
        let id = t.add_pair(pair(&t, "Men", "Ana", "Bea")).unwrap();
        let update = ContactUpdate {
            email: Some("bea@example.com".into()),
            phone: None,
        };
        t.update_contact(id, 1, update).unwrap();
        let p = t.pair(id).unwrap();
        assert_eq!(p.members[1].name, "Bea");
        assert_eq!(p.members[1].email.as_deref(), Some("bea@example.com"));
        assert!(t.update_contact(id, 2, ContactUpdate::default()).is_err());
    }

    #[test]
    fn pair_from_other_tournament_is_rejected() {
        let mut t = Tournament::new("Open");
        let other = Tournament::new("Other");
        let p = pair(&other, "Men", "Ana", "Bea");
        assert!(matches!(t.add_pair(p), Err(SchedulerError::InvalidPair(_))));
    }

    #[test]
    fn reset_drops_groups_and_fixtures() {
        let mut t = Tournament::new("Open");
        let a = t.add_pair(pair(&t, "Men", "Ana", "Bea")).unwrap();
        let b = t.add_pair(pair(&t, "Men", "Cris", "Dora")).unwrap();
        let group = Group::new(t.id, "Men", 1, 2).unwrap();
        t.group_pairs.push(GroupPair::new(&group, a, 1).unwrap());
        t.group_pairs.push(GroupPair::new(&group, b, 2).unwrap());
        t.fixtures.push(Fixture::new(group.id, a, b).unwrap());
        t.groups.push(group);
        assert_eq!(t.unscheduled_fixtures().len(), 1);
        assert_eq!(t.reset(), 1);
        assert!(t.groups.is_empty() && t.group_pairs.is_empty() && t.fixtures.is_empty());
        assert_eq!(t.pairs.len(), 2);
    }
}
