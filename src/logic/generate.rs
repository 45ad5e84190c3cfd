//! End-to-end generation: groups, fixtures, grid, allocation and write in one transaction.

use crate::events::{ScheduleEvent, ScheduleObserver};
use crate::logic::allocate::{allocate, CategoryFixtures};
use crate::logic::fixtures::generate_category_fixtures;
use crate::logic::grid::build_grid;
use crate::logic::partition::partition_category;
use crate::logic::writer::apply_allocation;
use crate::models::{FixtureId, ScheduleParams, SchedulerError, TournamentId};
use crate::store::TournamentStore;
use serde::{Deserialize, Serialize};

/// Group size plus scheduling parameters for one run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub group_size: usize,
    #[serde(flatten)]
    pub params: ScheduleParams,
}

/// What one run did; unscheduled fixtures are listed so the admin can add courts or time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub tournament_id: TournamentId,
    pub groups: usize,
    pub fixtures_created: usize,
    pub scheduled: usize,
    pub unscheduled: Vec<FixtureId>,
    pub total_capacity: usize,
    pub total_requested: usize,
}

/// Generate (or regenerate) the schedule of a tournament.
///
/// Request validation happens before anything is written. Categories without confirmed pairs
/// are skipped; a tournament with none at all is an `EmptyInput` error. Existing groups and
/// fixtures are kept and only topped up, and the previous schedule is replaced as a whole.
pub fn generate_schedule(
    store: &TournamentStore,
    observer: &dyn ScheduleObserver,
    tournament_id: TournamentId,
    request: &GenerateRequest,
) -> Result<GenerationReport, SchedulerError> {
    if request.group_size < 2 {
        return Err(SchedulerError::InvalidGroupSize(request.group_size));
    }
    let params = &request.params;
    let grid = build_grid(&params.windows, params.match_minutes, params.break_minutes, params.courts)?;
    if grid.is_empty() {
        return Err(SchedulerError::EmptyGrid);
    }

    let (report, scheduled_ids) = store.transaction(tournament_id, |t| {
        let categories = t.categories.clone();
        let mut fixtures_created = 0;
        let mut any_pairs = false;
        for category in &categories {
            if t.confirmed_pairs(category)?.is_empty() {
                log::info!("Skipping category '{}': no confirmed pairs", category);
                continue;
            }
            any_pairs = true;
            partition_category(t, category, request.group_size)?;
            fixtures_created += generate_category_fixtures(t, category)?;
        }
        if !any_pairs {
            return Err(SchedulerError::EmptyInput);
        }

        let plan = CategoryFixtures::collect(t);
        let result = allocate(&plan, &grid, params.work_order)?;
        apply_allocation(t, &result, params)?;
        let report = GenerationReport {
            tournament_id,
            groups: t.groups.len(),
            fixtures_created,
            scheduled: result.scheduled.len(),
            unscheduled: result.unscheduled.clone(),
            total_capacity: result.total_capacity,
            total_requested: result.total_requested,
        };
        let scheduled_ids: Vec<FixtureId> = result.scheduled.iter().map(|a| a.fixture_id).collect();
        Ok((report, scheduled_ids))
    })?;

    observer.notify(&ScheduleEvent::Generated {
        tournament_id,
        scheduled: report.scheduled,
        unscheduled: report.unscheduled.len(),
        fixture_ids: scheduled_ids,
    });
    Ok(report)
}
