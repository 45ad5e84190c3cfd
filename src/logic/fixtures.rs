//! Fixture generator: every unordered pairing inside a group.

use crate::models::{Fixture, GroupId, GroupPair, PairId, SchedulerError, Tournament};
use std::collections::HashMap;

/// All (i, j) pairings with pair number i < j, in lexicographic order.
pub fn round_robin_pairings(members: &[GroupPair]) -> Vec<(PairId, PairId)> {
    let mut sorted = members.to_vec();
    sorted.sort_by_key(|gp| gp.pair_number);
    let mut pairings = Vec::with_capacity(sorted.len() * sorted.len().saturating_sub(1) / 2);
    for (i, a) in sorted.iter().enumerate() {
        for b in &sorted[i + 1..] {
            pairings.push((a.pair_id, b.pair_id));
        }
    }
    pairings
}

/// Create the missing round-robin fixtures of a group and return the new ones.
///
/// A pairing that already has a fixture (in either orientation) is skipped, so calling this
/// again after the group grew only adds the games of the newcomers.
pub fn generate_fixtures(tournament: &mut Tournament, group_id: GroupId) -> Result<Vec<Fixture>, SchedulerError> {
    if tournament.group(group_id).is_none() {
        return Err(SchedulerError::UnknownGroup(group_id));
    }
    let members = tournament.members(group_id);
    let mut created = Vec::new();
    for (a, b) in round_robin_pairings(&members) {
        let exists = tournament
            .fixtures
            .iter()
            .any(|f| f.group_id == group_id && f.is_between(a, b));
        if exists {
            continue;
        }
        let fixture = Fixture::new(group_id, a, b)?;
        tournament.fixtures.push(fixture.clone());
        created.push(fixture);
    }
    if !created.is_empty() {
        log::debug!("Group {}: created {} fixture(s)", group_id, created.len());
    }
    Ok(created)
}

/// Generate fixtures for every group of a category. Returns how many were created.
pub fn generate_category_fixtures(tournament: &mut Tournament, category: &str) -> Result<usize, SchedulerError> {
    let group_ids: Vec<GroupId> = tournament.groups_in(category).iter().map(|g| g.id).collect();
    let mut created = 0;
    for id in group_ids {
        created += generate_fixtures(tournament, id)?.len();
    }
    Ok(created)
}

/// Fixtures of a group in emission order: by (pair number of pair1, pair number of pair2).
pub fn ordered_fixtures(tournament: &Tournament, group_id: GroupId) -> Vec<&Fixture> {
    let numbers: HashMap<PairId, u32> = tournament
        .members(group_id)
        .iter()
        .map(|gp| (gp.pair_id, gp.pair_number))
        .collect();
    let key = |f: &Fixture| {
        let x = numbers.get(&f.pair1).copied().unwrap_or(u32::MAX);
        let y = numbers.get(&f.pair2).copied().unwrap_or(u32::MAX);
        (x.min(y), x.max(y))
    };
    let mut fixtures = tournament.fixtures_in(group_id);
    fixtures.sort_by_key(|f| key(*f));
    fixtures
}
