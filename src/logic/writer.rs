//! Schedule writer: clear the previous allocation and record a new one atomically.

use crate::events::{ScheduleEvent, ScheduleObserver};
use crate::logic::allocate::AllocationResult;
use crate::models::{FixtureSlot, ScheduleParams, ScheduleSummary, SchedulerError, Tournament, TournamentId};
use crate::store::TournamentStore;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// Drop every schedule of the tournament and any fixture whose group is gone.
/// Returns how many fixtures were touched.
pub fn clear_schedule(tournament: &mut Tournament) -> usize {
    let groups: HashSet<_> = tournament.groups.iter().map(|g| g.id).collect();
    let before = tournament.fixtures.len();
    tournament.fixtures.retain(|f| groups.contains(&f.group_id));
    let orphans = before - tournament.fixtures.len();

    let mut cleared = 0;
    for f in tournament.fixtures.iter_mut().filter(|f| f.schedule.is_some()) {
        f.schedule = None;
        cleared += 1;
    }
    tournament.last_schedule = None;
    orphans + cleared
}

/// Replace the tournament's schedule with `result`.
///
/// Clears first, then places every scheduled fixture. Fails without a usable partial state
/// when the result names a fixture the tournament does not have, or books a court or a pair
/// twice; run it inside [`TournamentStore::transaction`] to get the rollback.
pub fn apply_allocation(
    tournament: &mut Tournament,
    result: &AllocationResult,
    params: &ScheduleParams,
) -> Result<ScheduleSummary, SchedulerError> {
    clear_schedule(tournament);

    let mut courts = HashSet::new();
    let mut pair_games: HashMap<_, Vec<_>> = HashMap::new();
    for a in &result.scheduled {
        if !courts.insert((a.slot.date, a.slot.start_time, a.slot.court_number)) {
            return Err(SchedulerError::DoubleBooked(a.fixture_id));
        }
        for pair in [a.pair1, a.pair2] {
            let games = pair_games.entry(pair).or_insert_with(Vec::new);
            if games.iter().any(|s| a.slot.overlaps_in_time(s)) {
                return Err(SchedulerError::DoubleBooked(a.fixture_id));
            }
            games.push(a.slot);
        }

        let fixture = tournament
            .fixture_mut(a.fixture_id)
            .ok_or(SchedulerError::UnknownFixture(a.fixture_id))?;
        if fixture.group_id != a.group_id || !fixture.is_between(a.pair1, a.pair2) {
            return Err(SchedulerError::UnknownFixture(a.fixture_id));
        }
        fixture.schedule = Some(FixtureSlot {
            date: a.slot.date,
            start_time: a.slot.start_time,
            court_number: a.slot.court_number,
        });
    }
    for id in &result.unscheduled {
        if tournament.fixture(*id).is_none() {
            return Err(SchedulerError::UnknownFixture(*id));
        }
    }

    let summary = ScheduleSummary {
        generated_at: Utc::now(),
        scheduled: result.scheduled.len(),
        unscheduled: result.unscheduled.len(),
        total_capacity: result.total_capacity,
        total_requested: result.total_requested,
        params: params.clone(),
    };
    tournament.last_schedule = Some(summary.clone());
    Ok(summary)
}

/// Store-backed writer that also tells the observer about committed changes.
pub struct ScheduleWriter<'a> {
    store: &'a TournamentStore,
    observer: &'a dyn ScheduleObserver,
}

impl<'a> ScheduleWriter<'a> {
    pub fn new(store: &'a TournamentStore, observer: &'a dyn ScheduleObserver) -> Self {
        Self { store, observer }
    }

    /// Clear then apply in one transaction. On error the previous schedule stays.
    pub fn apply(
        &self,
        tournament_id: TournamentId,
        result: &AllocationResult,
        params: &ScheduleParams,
    ) -> Result<ScheduleSummary, SchedulerError> {
        let summary = self
            .store
            .transaction(tournament_id, |t| apply_allocation(t, result, params))?;
        self.observer.notify(&ScheduleEvent::Generated {
            tournament_id,
            scheduled: summary.scheduled,
            unscheduled: summary.unscheduled,
            fixture_ids: result.scheduled.iter().map(|a| a.fixture_id).collect(),
        });
        Ok(summary)
    }

    /// Remove the current schedule. Returns how many fixtures were touched.
    pub fn clear(&self, tournament_id: TournamentId) -> Result<usize, SchedulerError> {
        let cleared = self
            .store
            .transaction(tournament_id, |t| Ok(clear_schedule(t)))?;
        self.observer.notify(&ScheduleEvent::Cleared { tournament_id, cleared });
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::logic::{allocate, build_grid, generate_category_fixtures, partition_category, CategoryFixtures};
    use crate::models::{Member, Pair, SchedulingWindow, WorkOrder};
    use chrono::{NaiveDate, NaiveTime};

    fn params(courts: u32) -> ScheduleParams {
        let date = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let window = SchedulingWindow::new(
            date,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        )
        .unwrap();
        ScheduleParams::new(courts, 50, 10, vec![window])
    }

    fn prepared() -> (TournamentStore, TournamentId) {
        let store = TournamentStore::in_memory();
        let mut t = Tournament::new("Summer Cup");
        for i in 0..4 {
            let p = Pair::confirmed(t.id, "Mixed", Member::new(format!("A{i}")), Member::new(format!("B{i}"))).unwrap();
            t.add_pair(p).unwrap();
        }
        partition_category(&mut t, "Mixed", 4).unwrap();
        generate_category_fixtures(&mut t, "Mixed").unwrap();
        let id = store.insert(t).unwrap();
        (store, id)
    }

    fn allocation(store: &TournamentStore, id: TournamentId, p: &ScheduleParams) -> AllocationResult {
        let t = store.get(id).unwrap();
        let grid = build_grid(&p.windows, p.match_minutes, p.break_minutes, p.courts).unwrap();
        allocate(&CategoryFixtures::collect(&t), &grid, WorkOrder::Sequential).unwrap()
    }

    #[test]
    fn apply_records_slots_and_emits_event() {
        let (store, id) = prepared();
        let observer = RecordingObserver::default();
        let writer = ScheduleWriter::new(&store, &observer);
        let p = params(2);
        let result = allocation(&store, id, &p);
        let summary = writer.apply(id, &result, &p).unwrap();
        assert_eq!(summary.scheduled, 6);
        let t = store.get(id).unwrap();
        assert!(t.fixtures.iter().all(|f| f.is_scheduled()));
        assert!(matches!(
            observer.events().as_slice(),
            [ScheduleEvent::Generated { scheduled: 6, unscheduled: 0, .. }]
        ));
    }

    #[test]
    fn bad_result_leaves_previous_schedule() {
        let (store, id) = prepared();
        let observer = RecordingObserver::default();
        let writer = ScheduleWriter::new(&store, &observer);
        let p = params(2);
        let good = allocation(&store, id, &p);
        writer.apply(id, &good, &p).unwrap();
        let before = store.get(id).unwrap();

        let mut bad = good.clone();
        bad.scheduled[1].slot = bad.scheduled[0].slot;
        assert!(matches!(writer.apply(id, &bad, &p), Err(SchedulerError::DoubleBooked(_))));
        let after = store.get(id).unwrap();
        assert_eq!(before.fixtures, after.fixtures);
        assert_eq!(observer.events().len(), 1);
    }

    #[test]
    fn clear_counts_scheduled_fixtures() {
        let (store, id) = prepared();
        let observer = RecordingObserver::default();
        let writer = ScheduleWriter::new(&store, &observer);
        let p = params(1);
        let result = allocation(&store, id, &p);
        writer.apply(id, &result, &p).unwrap();
        assert_eq!(writer.clear(id).unwrap(), 6);
        assert_eq!(writer.clear(id).unwrap(), 0);
        let t = store.get(id).unwrap();
        assert!(t.last_schedule.is_none());
        assert_eq!(t.fixtures.len(), 6);
    }
}
