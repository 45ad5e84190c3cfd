//! CSV roster import and schedule export.
//!
//! Roster columns: `category,player_1,player_2,email_1,email_2,confirmed`
//! (emails optional, `confirmed` defaults to true).

use crate::logic::fixtures::ordered_fixtures;
use crate::models::{Member, Pair, PairId, SchedulerError, Tournament};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Deserialize)]
struct RosterRow {
    category: String,
    player_1: String,
    player_2: String,
    email_1: Option<String>,
    email_2: Option<String>,
    confirmed: Option<bool>,
}

/// Register every pair in the CSV. Nothing is added unless all rows are valid.
pub fn import_roster(tournament: &mut Tournament, input: impl Read) -> Result<Vec<PairId>, SchedulerError> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut pairs = Vec::new();
    for (line, row) in reader.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| SchedulerError::Import(e.to_string()))?;
        let mut first = Member::new(row.player_1);
        first.email = row.email_1.filter(|e| !e.is_empty());
        let mut second = Member::new(row.player_2);
        second.email = row.email_2.filter(|e| !e.is_empty());
        let mut pair = Pair::new(tournament.id, row.category, first, second)
            .map_err(|e| SchedulerError::Import(format!("row {}: {}", line + 1, e)))?;
        pair.confirmed = row.confirmed.unwrap_or(true);
        pairs.push(pair);
    }

    let mut ids = Vec::with_capacity(pairs.len());
    for pair in pairs {
        ids.push(tournament.add_pair(pair)?);
    }
    log::info!("Imported {} pair(s) into '{}'", ids.len(), tournament.name);
    Ok(ids)
}

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    category: &'a str,
    group: &'a str,
    date: String,
    start_time: String,
    court: String,
    pair_1: String,
    pair_2: String,
    fixture_id: String,
}

/// Write one CSV row per fixture: scheduled ones in (date, time, court) order, then the
/// unscheduled ones with empty schedule columns.
pub fn export_schedule(tournament: &Tournament, output: impl Write) -> Result<(), SchedulerError> {
    let mut rows = Vec::new();
    for category in &tournament.categories {
        for group in tournament.groups_in(category) {
            for f in ordered_fixtures(tournament, group.id) {
                rows.push((group, f));
            }
        }
    }
    // Unscheduled (None) sort after every scheduled fixture.
    rows.sort_by_key(|(_, f)| {
        (
            f.schedule.is_none(),
            f.schedule.map(|s| (s.date, s.start_time, s.court_number)),
        )
    });

    let label = |id: PairId| tournament.pair(id).map(Pair::label).unwrap_or_else(|| id.to_string());
    let mut writer = WriterBuilder::new().from_writer(output);
    for (group, f) in rows {
        let row = ScheduleRow {
            category: &group.category,
            group: &group.name,
            date: f.schedule.map(|s| s.date.to_string()).unwrap_or_default(),
            start_time: f.schedule.map(|s| s.start_time.format("%H:%M").to_string()).unwrap_or_default(),
            court: f.schedule.map(|s| s.court_number.to_string()).unwrap_or_default(),
            pair_1: label(f.pair1),
            pair_2: label(f.pair2),
            fixture_id: f.id.to_string(),
        };
        writer
            .serialize(row)
            .map_err(|e| SchedulerError::Storage(e.to_string()))?;
    }
    writer.flush().map_err(|e| SchedulerError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "category,player_1,player_2,email_1,email_2,confirmed
Men A, Ana , Bea,ana@example.com,,true
Men A,Carla,Dani,,,
Women B,Eva,Flor,,,false
";

    #[test]
    fn imports_rows_in_order() {
        let mut t = Tournament::new("Spring");
        let ids = import_roster(&mut t, ROSTER.as_bytes()).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(t.categories, vec!["Men A".to_string(), "Women B".to_string()]);
        let first = t.pair(ids[0]).unwrap();
        assert_eq!(first.members[0].name, "Ana");
        assert_eq!(first.members[0].email.as_deref(), Some("ana@example.com"));
        assert_eq!(first.members[1].email, None);
        assert!(t.pair(ids[1]).unwrap().confirmed);
        assert!(!t.pair(ids[2]).unwrap().confirmed);
    }

    #[test]
    fn invalid_row_adds_nothing() {
        let mut t = Tournament::new("Spring");
        let csv = "category,player_1,player_2,email_1,email_2,confirmed\nMen A,Ana,Bea,,,\nMen A,Ana,,,,\n";
        assert!(matches!(import_roster(&mut t, csv.as_bytes()), Err(SchedulerError::Import(_))));
        assert!(t.pairs.is_empty());
    }
}
