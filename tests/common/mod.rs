//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use padel_fixtures::{Member, Pair, PairId, ScheduleParams, SchedulingWindow, Tournament};

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// One window on day 24 starting 09:00 with room for `slots` slots of 60 minutes.
pub fn window_for_slots(slots: u32) -> SchedulingWindow {
    SchedulingWindow::new(date(24), time(9, 0), time(9 + slots, 0)).unwrap()
}

/// 50 minute matches with a 10 minute break: one slot per hour.
pub fn hourly(courts: u32, slots: u32) -> ScheduleParams {
    ScheduleParams::new(courts, 50, 10, vec![window_for_slots(slots)])
}

/// Register `n` confirmed pairs in `category`.
pub fn add_pairs(t: &mut Tournament, category: &str, n: usize) -> Vec<PairId> {
    let offset = t.pairs.len();
    (0..n)
        .map(|i| {
            let k = offset + i;
            let pair = Pair::confirmed(t.id, category, Member::new(format!("P{k}a")), Member::new(format!("P{k}b")))
                .unwrap();
            t.add_pair(pair).unwrap()
        })
        .collect()
}

pub fn tournament_with_pairs(category: &str, n: usize) -> Tournament {
    let mut t = Tournament::new("Padel Open");
    add_pairs(&mut t, category, n);
    t
}
