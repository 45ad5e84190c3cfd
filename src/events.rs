//! Schedule events for audit/notification collaborators. They only carry counts and ids.

use crate::models::{FixtureId, TournamentId};
use serde::Serialize;
use std::sync::Mutex;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleEvent {
    Generated {
        tournament_id: TournamentId,
        scheduled: usize,
        unscheduled: usize,
        fixture_ids: Vec<FixtureId>,
    },
    Cleared {
        tournament_id: TournamentId,
        cleared: usize,
    },
}

/// Receives events after the corresponding write has been committed.
pub trait ScheduleObserver: Send + Sync {
    fn notify(&self, event: &ScheduleEvent);
}

/// Writes every event to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl ScheduleObserver for LogObserver {
    fn notify(&self, event: &ScheduleEvent) {
        match event {
            ScheduleEvent::Generated {
                tournament_id,
                scheduled,
                unscheduled,
                ..
            } => {
                if *unscheduled > 0 {
                    log::warn!(
                        "Schedule generated for {}: {} scheduled, {} unscheduled",
                        tournament_id,
                        scheduled,
                        unscheduled
                    );
                } else {
                    log::info!("Schedule generated for {}: {} scheduled", tournament_id, scheduled);
                }
            }
            ScheduleEvent::Cleared { tournament_id, cleared } => {
                log::info!("Schedule cleared for {}: {} fixture(s)", tournament_id, cleared);
            }
        }
    }
}

/// Keeps events in memory, e.g. for an admin activity feed.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScheduleEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ScheduleEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ScheduleObserver for RecordingObserver {
    fn notify(&self, event: &ScheduleEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
