//! Court-time allocator: give every fixture one slot without double-booking a court or a pair.

use crate::logic::fixtures::ordered_fixtures;
use crate::models::{Fixture, FixtureId, Group, GroupId, PairId, SchedulerError, Slot, SlotGrid, Tournament, WorkOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixtures of one category together with the groups they belong to.
#[derive(Clone, Debug)]
pub struct CategoryFixtures {
    pub category: String,
    pub groups: Vec<Group>,
    /// In emission order within each group.
    pub fixtures: Vec<Fixture>,
}

impl CategoryFixtures {
    /// Snapshot every category of a tournament, in declaration order.
    pub fn collect(tournament: &Tournament) -> Vec<CategoryFixtures> {
        tournament
            .categories
            .iter()
            .map(|category| {
                let groups: Vec<Group> = tournament.groups_in(category).into_iter().cloned().collect();
                let fixtures = groups
                    .iter()
                    .flat_map(|g| ordered_fixtures(tournament, g.id))
                    .cloned()
                    .collect();
                CategoryFixtures {
                    category: category.clone(),
                    groups,
                    fixtures,
                }
            })
            .collect()
    }
}

/// A fixture placed on a slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub fixture_id: FixtureId,
    pub group_id: GroupId,
    pub category: String,
    pub pair1: PairId,
    pub pair2: PairId,
    pub slot: Slot,
}

/// Outcome of one allocation run. Unscheduled fixtures are a normal result, not an error.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Sorted by slot order.
    pub scheduled: Vec<Assignment>,
    /// In work-list order.
    pub unscheduled: Vec<FixtureId>,
    pub total_capacity: usize,
    pub total_requested: usize,
}

impl AllocationResult {
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}

/// One entry of the flattened work list.
struct WorkItem<'a> {
    category: &'a str,
    fixture: &'a Fixture,
}

/// Flatten categories into the allocation order.
fn work_list(plan: &[CategoryFixtures], order: WorkOrder) -> Result<Vec<WorkItem<'_>>, SchedulerError> {
    let mut per_category = Vec::with_capacity(plan.len());
    for cat in plan {
        let numbers: HashMap<GroupId, u32> = cat.groups.iter().map(|g| (g.id, g.group_number)).collect();
        let mut items = Vec::with_capacity(cat.fixtures.len());
        for f in &cat.fixtures {
            let number = numbers
                .get(&f.group_id)
                .copied()
                .ok_or(SchedulerError::UnknownGroup(f.group_id))?;
            items.push((number, f));
        }
        // Stable: emission order survives within a group.
        items.sort_by_key(|(number, _)| *number);
        per_category.push(
            items
                .into_iter()
                .map(|(_, fixture)| WorkItem {
                    category: cat.category.as_str(),
                    fixture,
                })
                .collect::<Vec<_>>(),
        );
    }

    let work = match order {
        WorkOrder::Sequential => per_category.into_iter().flatten().collect(),
        WorkOrder::Interleaved => {
            let longest = per_category.iter().map(Vec::len).max().unwrap_or(0);
            let mut iters: Vec<_> = per_category.into_iter().map(Vec::into_iter).collect();
            let mut work = Vec::new();
            for _ in 0..longest {
                for it in iters.iter_mut() {
                    if let Some(item) = it.next() {
                        work.push(item);
                    }
                }
            }
            work
        }
    };
    Ok(work)
}

/// Mutable allocation state: which slots are taken and when each pair already plays.
struct Board<'g> {
    grid: &'g SlotGrid,
    taken: Vec<bool>,
    /// work index -> slot index
    placed: Vec<Option<usize>>,
    /// pair -> slot indices of the games it already plays
    busy: HashMap<PairId, Vec<usize>>,
}

impl<'g> Board<'g> {
    fn new(grid: &'g SlotGrid, work_len: usize) -> Self {
        Self {
            grid,
            taken: vec![false; grid.slots.len()],
            placed: vec![None; work_len],
            busy: HashMap::new(),
        }
    }

    /// True when `pair` already plays something overlapping `slot`, on any court.
    fn pair_clashes(&self, pair: PairId, slot: usize) -> bool {
        let target = &self.grid.slots[slot];
        self.busy
            .get(&pair)
            .is_some_and(|games| games.iter().any(|s| self.grid.slots[*s].overlaps_in_time(target)))
    }

    /// First free slot, in grid order, where neither pair of `fixture` clashes.
    fn first_free_fit(&self, fixture: &Fixture) -> Option<usize> {
        (0..self.taken.len()).find(|&s| {
            !self.taken[s] && !self.pair_clashes(fixture.pair1, s) && !self.pair_clashes(fixture.pair2, s)
        })
    }

    fn place(&mut self, work: usize, fixture: &Fixture, slot: usize) {
        self.taken[slot] = true;
        self.placed[work] = Some(slot);
        for pair in [fixture.pair1, fixture.pair2] {
            self.busy.entry(pair).or_default().push(slot);
        }
    }
}

/// Allocate every fixture of `plan` to a slot of `grid`.
///
/// Greedy, single pass over the work list (category order, then group number, then fixture
/// emission order, or round-robin across categories for [`WorkOrder::Interleaved`]). Each
/// fixture takes the first free slot in grid order where neither pair already plays at an
/// overlapping time on that date, whatever the court. A fixture with no such slot stays
/// unscheduled and the run continues.
///
/// Identical input always gives identical output. Errors only on malformed input.
pub fn allocate(plan: &[CategoryFixtures], grid: &SlotGrid, order: WorkOrder) -> Result<AllocationResult, SchedulerError> {
    if grid.courts == 0 {
        return Err(SchedulerError::ZeroCourts);
    }
    if grid.is_empty() {
        return Err(SchedulerError::EmptyGrid);
    }
    let work = work_list(plan, order)?;
    let mut board = Board::new(grid, work.len());
    let mut unscheduled = Vec::new();

    for (idx, item) in work.iter().enumerate() {
        let fixture = item.fixture;
        if let Some(slot) = board.first_free_fit(fixture) {
            board.place(idx, fixture, slot);
            continue;
        }
        log::warn!(
            "No slot left for fixture {} ({}): leaving it unscheduled",
            fixture.id,
            item.category
        );
        unscheduled.push(fixture.id);
    }

    let mut scheduled: Vec<Assignment> = work
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            board.placed[idx].map(|slot| Assignment {
                fixture_id: item.fixture.id,
                group_id: item.fixture.group_id,
                category: item.category.to_string(),
                pair1: item.fixture.pair1,
                pair2: item.fixture.pair2,
                slot: grid.slots[slot],
            })
        })
        .collect();
    scheduled.sort_by(|a, b| a.slot.cmp(&b.slot));

    log::debug!(
        "Allocated {} of {} fixture(s) on {} slot(s)",
        scheduled.len(),
        work.len(),
        grid.capacity()
    );
    Ok(AllocationResult {
        scheduled,
        unscheduled,
        total_capacity: grid.capacity(),
        total_requested: work.len(),
    })
}
