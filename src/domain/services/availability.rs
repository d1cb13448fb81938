use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::collections::HashSet;

use crate::domain::models::availability::{RecurringRule, RuleTimeSlot, SpecificAvailability};

pub const DEFAULT_DURATION_HOURS: f64 = 2.0;

/// Duration used for slot-fit checks. Falls back to two hours when the experience
/// row is missing or carries a non-positive / non-finite value.
pub fn effective_duration(raw: Option<f64>) -> f64 {
    match raw {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => DEFAULT_DURATION_HOURS,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotTime {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateSlots {
    pub date: NaiveDate,
    pub times: Vec<SlotTime>,
}

pub struct ResolverInputs<'a> {
    pub duration_hours: f64,
    pub rules: &'a [(RecurringRule, Vec<RuleTimeSlot>)],
    pub specifics: &'a [SpecificAvailability],
    /// Dates claimed by a non-cancelled reservation or booking for ANY experience.
    pub occupied_dates: &'a HashSet<NaiveDate>,
    /// (date, "HH:MM") occupancy for the experience being resolved.
    pub reserved_times: &'a HashSet<(NaiveDate, String)>,
}

/// Resolves every calendar date in the inclusive range, in range order. A date whose
/// slot list is empty is either blocked or already occupied.
pub fn resolve_range(start: NaiveDate, end: NaiveDate, inputs: &ResolverInputs) -> Vec<DateSlots> {
    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        out.push(DateSlots {
            date: current,
            times: resolve_date(current, inputs),
        });
        current += Duration::days(1);
    }
    out
}

fn resolve_date(date: NaiveDate, inputs: &ResolverInputs) -> Vec<SlotTime> {
    let specific = inputs.specifics.iter().find(|s| s.date == date);

    if specific.is_some_and(|s| s.is_blocked) {
        return Vec::new();
    }

    // Day-level cross-experience exclusivity: the brand hosts one couple per day,
    // so a booking on any experience claims the whole date for all of them.
    if inputs.occupied_dates.contains(&date) {
        return Vec::new();
    }

    let mut windows: Vec<(NaiveTime, NaiveTime)> = Vec::new();

    let override_window = specific.and_then(|s| match (&s.start_time, &s.end_time) {
        (Some(start), Some(end)) => parse_window(start, end),
        _ => None,
    });

    if let Some(window) = override_window {
        windows.push(window);
    } else {
        let weekday = date.weekday().num_days_from_sunday();
        for (rule, slots) in inputs.rules {
            if !rule.active || !rule.weekdays().contains(&weekday) {
                continue;
            }
            if slots.is_empty() {
                if let Some(window) = parse_window(&rule.start_time, &rule.end_time) {
                    windows.push(window);
                }
            } else {
                for slot in slots {
                    if let Some(window) = parse_window(&slot.start_time, &slot.end_time) {
                        windows.push(window);
                    }
                }
            }
        }
    }

    let mut times: Vec<SlotTime> = Vec::new();

    for (win_start, win_end) in windows {
        let end_f = f64::from(win_end.hour()) + f64::from(win_end.minute()) / 60.0;

        let mut hour = win_start.hour();
        if win_start.minute() > 0 {
            hour += 1;
        }

        while f64::from(hour) < end_f {
            let label = format!("{:02}:00", hour);
            let occupied = inputs.reserved_times.contains(&(date, label.clone()));
            let fits = f64::from(hour) + inputs.duration_hours <= end_f;
            times.push(SlotTime {
                time: label,
                available: !occupied && fits,
            });
            hour += 1;
        }
    }

    // Overlapping rules can emit the same hour twice; keep the bookable one.
    times.sort_by(|a, b| a.time.cmp(&b.time).then(b.available.cmp(&a.available)));
    times.dedup_by(|a, b| a.time == b.time);
    times
}

fn parse_window(start: &str, end: &str) -> Option<(NaiveTime, NaiveTime)> {
    let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        // 2026-09-07 is a Monday.
        NaiveDate::from_ymd_opt(2026, 9, 7).unwrap()
    }

    fn rule(weekdays: &[u32], start: &str, end: &str) -> (RecurringRule, Vec<RuleTimeSlot>) {
        (
            RecurringRule::new("exp-1".to_string(), weekdays, start.to_string(), end.to_string()),
            Vec::new(),
        )
    }

    fn inputs<'a>(
        duration: f64,
        rules: &'a [(RecurringRule, Vec<RuleTimeSlot>)],
        specifics: &'a [SpecificAvailability],
        occupied: &'a HashSet<NaiveDate>,
        reserved: &'a HashSet<(NaiveDate, String)>,
    ) -> ResolverInputs<'a> {
        ResolverInputs {
            duration_hours: duration,
            rules,
            specifics,
            occupied_dates: occupied,
            reserved_times: reserved,
        }
    }

    #[test]
    fn duration_defaults_to_two_hours() {
        assert_eq!(effective_duration(None), 2.0);
        assert_eq!(effective_duration(Some(f64::NAN)), 2.0);
        assert_eq!(effective_duration(Some(-1.0)), 2.0);
        assert_eq!(effective_duration(Some(2.5)), 2.5);
    }

    #[test]
    fn recurring_rule_generates_hourly_slots_with_fit_check() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &[], &occupied, &reserved));

        assert_eq!(days.len(), 1);
        let times = &days[0].times;
        assert_eq!(times.len(), 3);
        assert_eq!(times[0], SlotTime { time: "09:00".into(), available: true });
        assert_eq!(times[1], SlotTime { time: "10:00".into(), available: true });
        // 11 + 2h overruns the 12:00 close.
        assert_eq!(times[2], SlotTime { time: "11:00".into(), available: false });
    }

    #[test]
    fn fractional_duration_fit_uses_real_arithmetic() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.5, &rules, &[], &occupied, &reserved));

        let times = &days[0].times;
        assert!(times.iter().any(|t| t.time == "09:00" && t.available));
        assert!(times.iter().any(|t| t.time == "10:00" && !t.available));
    }

    #[test]
    fn any_occupied_experience_empties_the_whole_date() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let occupied: HashSet<NaiveDate> = [monday()].into_iter().collect();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &[], &occupied, &reserved));

        assert!(days[0].times.is_empty());
    }

    #[test]
    fn block_takes_precedence_over_recurring_rules() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let mut block = SpecificAvailability::new("exp-1".to_string(), monday());
        block.is_blocked = true;
        let specifics = vec![block];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &specifics, &occupied, &reserved));

        assert!(days[0].times.is_empty());
    }

    #[test]
    fn override_window_replaces_recurring_rules() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let mut entry = SpecificAvailability::new("exp-1".to_string(), monday());
        entry.start_time = Some("14:00".to_string());
        entry.end_time = Some("17:00".to_string());
        let specifics = vec![entry];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &specifics, &occupied, &reserved));

        let labels: Vec<&str> = days[0].times.iter().map(|t| t.time.as_str()).collect();
        assert_eq!(labels, vec!["14:00", "15:00", "16:00"]);
    }

    #[test]
    fn reserved_time_marks_exact_slot_unavailable() {
        let rules = vec![rule(&[1], "09:00", "13:00")];
        let occupied = HashSet::new();
        let reserved: HashSet<(NaiveDate, String)> =
            [(monday(), "10:00".to_string())].into_iter().collect();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &[], &occupied, &reserved));

        let times = &days[0].times;
        assert!(times.iter().any(|t| t.time == "09:00" && t.available));
        assert!(times.iter().any(|t| t.time == "10:00" && !t.available));
        assert!(times.iter().any(|t| t.time == "11:00" && t.available));
    }

    #[test]
    fn overlapping_rules_dedupe_by_time() {
        let rules = vec![rule(&[1], "09:00", "12:00"), rule(&[1], "10:00", "14:00")];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &[], &occupied, &reserved));

        let labels: Vec<&str> = days[0].times.iter().map(|t| t.time.as_str()).collect();
        assert_eq!(labels, vec!["09:00", "10:00", "11:00", "12:00", "13:00"]);
        // 11:00 overruns the first window but fits the second; the bookable slot wins.
        assert!(days[0].times.iter().find(|t| t.time == "11:00").unwrap().available);
    }

    #[test]
    fn rule_time_slots_override_rule_fallback_window() {
        let base = RecurringRule::new("exp-1".to_string(), &[1], "00:00".to_string(), "23:00".to_string());
        let slots = vec![RuleTimeSlot::new(base.id.clone(), "18:00".to_string(), "21:00".to_string())];
        let rules = vec![(base, slots)];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let days = resolve_range(monday(), monday(), &inputs(2.0, &rules, &[], &occupied, &reserved));

        let labels: Vec<&str> = days[0].times.iter().map(|t| t.time.as_str()).collect();
        assert_eq!(labels, vec!["18:00", "19:00", "20:00"]);
    }

    #[test]
    fn range_emits_one_entry_per_date_in_order() {
        let rules = vec![rule(&[1], "09:00", "12:00")];
        let occupied = HashSet::new();
        let reserved = HashSet::new();
        let end = monday() + Duration::days(6);
        let days = resolve_range(monday(), end, &inputs(2.0, &rules, &[], &occupied, &reserved));

        assert_eq!(days.len(), 7);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date, monday() + Duration::days(i as i64));
        }
        // Only the Monday matches the weekday rule.
        assert!(!days[0].times.is_empty());
        assert!(days[1..].iter().all(|d| d.times.is_empty()));
    }
}
