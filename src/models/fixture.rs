//! Fixture: one game between two pairs of the same group.

use crate::models::group::GroupId;
use crate::models::pair::PairId;
use crate::models::tournament::SchedulerError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fixture.
pub type FixtureId = Uuid;

/// Where and when a fixture is played.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FixtureSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub court_number: u32,
}

/// Games won by each pair in one set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub pair1_games: u8,
    pub pair2_games: u8,
}

/// A round-robin game. `schedule` is None until the allocator places it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub group_id: GroupId,
    pub pair1: PairId,
    pub pair2: PairId,
    pub schedule: Option<FixtureSlot>,
    /// Filled in by result reporting; empty while unplayed.
    #[serde(default)]
    pub sets: Vec<SetScore>,
    pub winner: Option<PairId>,
}

impl Fixture {
    pub fn new(group_id: GroupId, pair1: PairId, pair2: PairId) -> Result<Self, SchedulerError> {
        if pair1 == pair2 {
            return Err(SchedulerError::SamePair(pair1));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            pair1,
            pair2,
            schedule: None,
            sets: Vec::new(),
            winner: None,
        })
    }

    pub fn involves(&self, pair: PairId) -> bool {
        self.pair1 == pair || self.pair2 == pair
    }

    /// True when this fixture is the game between `a` and `b`, in either order.
    pub fn is_between(&self, a: PairId, b: PairId) -> bool {
        (self.pair1 == a && self.pair2 == b) || (self.pair1 == b && self.pair2 == a)
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    /// Store the reported score. The winner must be one of the two pairs.
    pub fn record_result(&mut self, sets: Vec<SetScore>, winner: PairId) -> Result<(), SchedulerError> {
        if !self.involves(winner) {
            return Err(SchedulerError::UnknownPair(winner));
        }
        self.sets = sets;
        self.winner = Some(winner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_cannot_play_itself() {
        let p = Uuid::new_v4();
        assert_eq!(Fixture::new(Uuid::new_v4(), p, p), Err(SchedulerError::SamePair(p)));
    }

    #[test]
    fn winner_must_be_one_of_the_pairs() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut f = Fixture::new(Uuid::new_v4(), a, b).unwrap();
        assert!(f.is_between(b, a));
        let outsider = Uuid::new_v4();
        assert_eq!(f.record_result(vec![], outsider), Err(SchedulerError::UnknownPair(outsider)));
        let sets = vec![
            SetScore { pair1_games: 6, pair2_games: 4 },
            SetScore { pair1_games: 7, pair2_games: 5 },
        ];
        f.record_result(sets.clone(), a).unwrap();
        assert_eq!(f.winner, Some(a));
        assert_eq!(f.sets, sets);
    }
}
