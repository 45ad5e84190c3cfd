//! Scheduling windows, generation parameters and the slot grid.

use crate::models::tournament::SchedulerError;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Minutes since midnight for a wall-clock time (seconds are ignored).
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Wall-clock time for minutes since midnight. None at or past 24:00.
pub fn time_of_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

/// A block of court time on one day, in whole minutes. Ends on the same day it starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWindow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl SchedulingWindow {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, SchedulerError> {
        let window = Self {
            date,
            start_time,
            end_time,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), SchedulerError> {
        let whole_minutes = |t: NaiveTime| t.second() == 0 && t.nanosecond() == 0;
        if self.end_time <= self.start_time || !whole_minutes(self.start_time) || !whole_minutes(self.end_time) {
            return Err(SchedulerError::InvalidWindow(*self));
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> u32 {
        minute_of_day(self.end_time).saturating_sub(minute_of_day(self.start_time))
    }

    /// Same date and intersecting [start, end) ranges.
    pub fn overlaps(&self, other: &SchedulingWindow) -> bool {
        self.date == other.date && self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Order in which fixtures of different categories enter the allocator.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrder {
    /// Category declaration order, then group number, then fixture order.
    #[default]
    Sequential,
    /// Take one fixture from each category in turn so early slots are shared.
    Interleaved,
}

/// Court count, durations and windows for one generation run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    pub courts: u32,
    pub match_minutes: u32,
    #[serde(default)]
    pub break_minutes: u32,
    pub windows: Vec<SchedulingWindow>,
    #[serde(default)]
    pub work_order: WorkOrder,
}

impl ScheduleParams {
    pub fn new(courts: u32, match_minutes: u32, break_minutes: u32, windows: Vec<SchedulingWindow>) -> Self {
        Self {
            courts,
            match_minutes,
            break_minutes,
            windows,
            work_order: WorkOrder::default(),
        }
    }

    pub fn with_work_order(mut self, work_order: WorkOrder) -> Self {
        self.work_order = work_order;
        self
    }
}

/// One bookable (date, start time, court) unit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// End of play, i.e. start + match duration. The trailing break is not included.
    pub end_time: NaiveTime,
    pub court_number: u32,
}

impl Slot {
    /// True when both slots are on the same date and their playing intervals intersect.
    pub fn overlaps_in_time(&self, other: &Slot) -> bool {
        self.date == other.date && self.start_time < other.end_time && other.start_time < self.end_time
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.date, self.start_time, self.court_number).cmp(&(other.date, other.start_time, other.court_number))
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every slot of a request, sorted by (date, start time, court).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotGrid {
    pub slots: Vec<Slot>,
    pub courts: u32,
    pub match_minutes: u32,
    pub slot_length: u32,
}

impl SlotGrid {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// What the last generation run produced; kept on the tournament for display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub generated_at: DateTime<Utc>,
    pub scheduled: usize,
    pub unscheduled: usize,
    pub total_capacity: usize,
    pub total_requested: usize,
    pub params: ScheduleParams,
}
