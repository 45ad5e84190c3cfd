//! Data structures for the scheduler: pairs, groups, fixtures, slots, tournament.

mod fixture;
mod group;
mod pair;
mod schedule;
mod tournament;

pub use fixture::{Fixture, FixtureId, FixtureSlot, SetScore};
pub use group::{group_name, Group, GroupId, GroupPair};
pub use pair::{ContactUpdate, Member, Pair, PairId};
pub use schedule::{
    minute_of_day, time_of_minute, ScheduleParams, ScheduleSummary, SchedulingWindow, Slot, SlotGrid,
    WorkOrder,
};
pub use tournament::{SchedulerError, Tournament, TournamentId};
