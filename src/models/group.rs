//! Group (round-robin pool) and GroupPair membership.

use crate::models::pair::PairId;
use crate::models::tournament::{SchedulerError, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// A round-robin pool of pairs within one category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tournament_id: TournamentId,
    pub category: String,
    /// 1-based, unique per (tournament, category).
    pub group_number: u32,
    pub name: String,
    /// Target pairs-per-group; the group never holds more.
    pub capacity: usize,
}

impl Group {
    /// Create a group. Capacity below 2 cannot host a single fixture and is rejected.
    pub fn new(
        tournament_id: TournamentId,
        category: impl Into<String>,
        group_number: u32,
        capacity: usize,
    ) -> Result<Self, SchedulerError> {
        if capacity < 2 {
            return Err(SchedulerError::InvalidGroupSize(capacity));
        }
        if group_number == 0 {
            return Err(SchedulerError::InvalidGroupNumber);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            tournament_id,
            category: category.into(),
            group_number,
            name: group_name(group_number),
            capacity,
        })
    }
}

/// "Group A" .. "Group Z", then "Group 27" onwards.
pub fn group_name(group_number: u32) -> String {
    match group_number {
        1..=26 => {
            let letter = char::from(b'A' + (group_number - 1) as u8);
            format!("Group {letter}")
        }
        n => format!("Group {n}"),
    }
}

/// Membership of a pair in a group at a 1-based `pair_number` position.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct GroupPair {
    pub group_id: GroupId,
    pub pair_id: PairId,
    pub pair_number: u32,
}

impl GroupPair {
    pub fn new(group: &Group, pair_id: PairId, pair_number: u32) -> Result<Self, SchedulerError> {
        if pair_number == 0 || pair_number as usize > group.capacity {
            return Err(SchedulerError::GroupFull(group.id));
        }
        Ok(Self {
            group_id: group.id,
            pair_id,
            pair_number,
        })
    }
}
