//! Group partitioner: split confirmed pairs of a category into round-robin groups.

use crate::models::{Group, GroupPair, Pair, PairId, SchedulerError, Tournament};
use std::collections::HashSet;

/// Place `pairs` into groups of `target_group_size`, in input order.
///
/// 1. Validate: group size >= 2, at least one pair, one category, every pair registered and confirmed.
/// 2. Skip pairs that already sit in a group of this category (so re-running is a no-op).
/// 3. Top up the highest-numbered existing group, then open new groups of `target_group_size`.
///
/// On a fresh category group k receives pairs [k*size, (k+1)*size); the last group may be short.
/// Returns every group of the category ordered by group number.
pub fn partition(
    tournament: &mut Tournament,
    pairs: &[Pair],
    target_group_size: usize,
) -> Result<Vec<Group>, SchedulerError> {
    if target_group_size < 2 {
        return Err(SchedulerError::InvalidGroupSize(target_group_size));
    }
    let first = pairs.first().ok_or(SchedulerError::EmptyInput)?;
    let category = first.category.clone();
    if pairs.iter().any(|p| p.category != category) {
        return Err(SchedulerError::MixedCategories);
    }
    for p in pairs {
        let registered = tournament.pair(p.id).ok_or(SchedulerError::UnknownPair(p.id))?;
        if !registered.confirmed {
            return Err(SchedulerError::PairNotConfirmed(p.id));
        }
    }

    let mut seen = HashSet::new();
    let pending: Vec<PairId> = pairs
        .iter()
        .map(|p| p.id)
        .filter(|id| seen.insert(*id))
        .filter(|id| tournament.group_of_pair(&category, *id).is_none())
        .collect();
    let mut pending = pending.into_iter().peekable();

    // Top up the last group before opening new ones.
    let last_group = tournament.groups_in(&category).last().map(|g| (*g).clone());
    if let Some(last) = last_group {
        while pending.peek().is_some() {
            let Some(number) = free_pair_number(tournament, &last) else {
                break;
            };
            if let Some(pair_id) = pending.next() {
                tournament.group_pairs.push(GroupPair::new(&last, pair_id, number)?);
            }
        }
    }

    let mut next_number = tournament
        .groups_in(&category)
        .last()
        .map(|g| g.group_number + 1)
        .unwrap_or(1);
    let mut created = 0;
    while pending.peek().is_some() {
        let group = Group::new(tournament.id, category.clone(), next_number, target_group_size)?;
        for (idx, pair_id) in pending.by_ref().take(target_group_size).enumerate() {
            tournament
                .group_pairs
                .push(GroupPair::new(&group, pair_id, idx as u32 + 1)?);
        }
        tournament.groups.push(group);
        next_number += 1;
        created += 1;
    }

    let groups: Vec<Group> = tournament.groups_in(&category).into_iter().cloned().collect();
    log::info!(
        "Partitioned {} pair(s) of '{}' into {} group(s) ({} new)",
        pairs.len(),
        category,
        groups.len(),
        created
    );
    Ok(groups)
}

/// Partition every confirmed pair of `category`, read through the pairing accessor.
pub fn partition_category(
    tournament: &mut Tournament,
    category: &str,
    target_group_size: usize,
) -> Result<Vec<Group>, SchedulerError> {
    let pairs: Vec<Pair> = tournament
        .confirmed_pairs(category)?
        .into_iter()
        .cloned()
        .collect();
    partition(tournament, &pairs, target_group_size)
}

/// Smallest pair number in 1..=capacity not yet taken in `group`, or None when full.
fn free_pair_number(tournament: &Tournament, group: &Group) -> Option<u32> {
    let taken: HashSet<u32> = tournament
        .members(group.id)
        .iter()
        .map(|gp| gp.pair_number)
        .collect();
    (1..=group.capacity as u32).find(|n| !taken.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;

    fn tournament_with_pairs(n: usize) -> (Tournament, Vec<Pair>) {
        let mut t = Tournament::new("Open");
        let pairs: Vec<Pair> = (0..n)
            .map(|i| {
                Pair::confirmed(t.id, "Men A", Member::new(format!("A{i}")), Member::new(format!("B{i}")))
                    .unwrap()
            })
            .collect();
        for p in &pairs {
            t.add_pair(p.clone()).unwrap();
        }
        (t, pairs)
    }

    #[test]
    fn rejects_group_size_below_two() {
        let (mut t, pairs) = tournament_with_pairs(4);
        assert_eq!(partition(&mut t, &pairs, 1), Err(SchedulerError::InvalidGroupSize(1)));
        assert!(t.groups.is_empty());
    }

    #[test]
    fn rejects_empty_input() {
        let (mut t, _) = tournament_with_pairs(0);
        assert_eq!(partition(&mut t, &[], 4), Err(SchedulerError::EmptyInput));
    }

    #[test]
    fn rejects_unconfirmed_pair_without_writing() {
        let (mut t, mut pairs) = tournament_with_pairs(3);
        let extra = Pair::new(t.id, "Men A", Member::new("X"), Member::new("Y")).unwrap();
        t.add_pair(extra.clone()).unwrap();
        pairs.push(extra.clone());
        assert_eq!(partition(&mut t, &pairs, 2), Err(SchedulerError::PairNotConfirmed(extra.id)));
        assert!(t.groups.is_empty());
        assert!(t.group_pairs.is_empty());
    }

    #[test]
    fn last_group_is_underfilled() {
        let (mut t, pairs) = tournament_with_pairs(10);
        let groups = partition(&mut t, &pairs, 4).unwrap();
        assert_eq!(groups.len(), 3);
        let sizes: Vec<usize> = groups.iter().map(|g| t.members(g.id).len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        // Slice order and 1-based numbering.
        let third = t.members(groups[2].id);
        assert_eq!(third[0].pair_id, pairs[8].id);
        assert_eq!(third[0].pair_number, 1);
        assert_eq!(third[1].pair_number, 2);
        assert_eq!(groups[2].name, "Group C");
    }

    #[test]
    fn new_pair_tops_up_last_group() {
        let (mut t, mut pairs) = tournament_with_pairs(5);
        partition(&mut t, &pairs, 4).unwrap();
        let late = Pair::confirmed(t.id, "Men A", Member::new("L1"), Member::new("L2")).unwrap();
        t.add_pair(late.clone()).unwrap();
        pairs.push(late.clone());
        let groups = partition(&mut t, &pairs, 4).unwrap();
        assert_eq!(groups.len(), 2);
        let second = t.members(groups[1].id);
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].pair_id, late.id);
        assert_eq!(second[1].pair_number, 2);
    }
}
