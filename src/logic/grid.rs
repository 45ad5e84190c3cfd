//! Slot grid builder: windows x courts -> ordered (date, start, court) slots.

use crate::models::{minute_of_day, time_of_minute, SchedulerError, SchedulingWindow, Slot, SlotGrid};

/// Build the slot grid for a request.
///
/// Each window is cut into consecutive slots of `match_minutes + break_minutes`, starting at
/// the window start, as long as the whole slot fits before the window end. Every slot is
/// repeated for courts 1..=courts. A window too short for one slot contributes nothing.
///
/// Windows on the same date must not overlap; otherwise one court could be booked twice.
pub fn build_grid(
    windows: &[SchedulingWindow],
    match_minutes: u32,
    break_minutes: u32,
    courts: u32,
) -> Result<SlotGrid, SchedulerError> {
    if courts == 0 {
        return Err(SchedulerError::ZeroCourts);
    }
    if match_minutes == 0 {
        return Err(SchedulerError::InvalidDuration);
    }
    if windows.is_empty() {
        return Err(SchedulerError::NoWindows);
    }
    for w in windows {
        w.validate()?;
    }
    for (i, a) in windows.iter().enumerate() {
        if let Some(b) = windows[i + 1..].iter().find(|b| a.overlaps(b)) {
            return Err(SchedulerError::OverlappingWindows(*a, *b));
        }
    }

    let slot_length = match_minutes
        .checked_add(break_minutes)
        .ok_or(SchedulerError::InvalidDuration)?;
    let mut slots = Vec::new();
    for w in windows {
        let end = minute_of_day(w.end_time);
        let mut start = minute_of_day(w.start_time);
        while start.checked_add(slot_length).is_some_and(|slot_end| slot_end <= end) {
            let (Some(start_time), Some(end_time)) =
                (time_of_minute(start), time_of_minute(start + match_minutes))
            else {
                break;
            };
            for court_number in 1..=courts {
                slots.push(Slot {
                    date: w.date,
                    start_time,
                    end_time,
                    court_number,
                });
            }
            start += slot_length;
        }
    }
    slots.sort();

    log::debug!(
        "Built grid: {} window(s), {} court(s), slot length {} min -> {} slot(s)",
        windows.len(),
        courts,
        slot_length,
        slots.len()
    );
    Ok(SlotGrid {
        slots,
        courts,
        match_minutes,
        slot_length,
    })
}

/// Slots a request can offer: sum over windows of floor(duration / slot length) x courts.
/// Zero when the slot length is zero or does not fit in a `u32`.
pub fn capacity(windows: &[SchedulingWindow], match_minutes: u32, break_minutes: u32, courts: u32) -> usize {
    let slot_length = match match_minutes.checked_add(break_minutes) {
        Some(0) | None => return 0,
        Some(len) => len,
    };
    windows
        .iter()
        .map(|w| (w.duration_minutes() / slot_length) as usize * courts as usize)
        .sum()
}
