use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::metrics::round_to;

/// Inclusive calendar range. `start > end` is an empty range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Swaps the bounds when they are reversed.
    pub fn normalized(start: Date, end: Date) -> Self {
        if start > end {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Range of `days` days ending on `end`.
    pub fn ending_on(end: Date, days: i64) -> Self {
        let start = end - time::Duration::days(days.max(1) - 1);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn len_days(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).whole_days() as usize + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        let first = (!self.is_empty()).then_some(self.start);
        std::iter::successors(first, move |d| d.next_day().filter(|n| *n <= end))
    }
}

/// Summed kcal for one calendar day, as read from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyEnergy {
    pub date: Date,
    pub kcal: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LedgerDay {
    pub date: Date,
    pub calories_in: f64,
    pub calories_out: f64,
}

impl LedgerDay {
    pub fn net(&self) -> f64 {
        self.calories_in - self.calories_out
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerAggregate {
    pub range: DateRange,
    pub total_in: f64,
    pub total_out: f64,
    /// One entry per calendar day of the range, in order.
    pub days: Vec<LedgerDay>,
}

impl LedgerAggregate {
    pub fn per_day_in(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.calories_in).collect()
    }

    pub fn per_day_out(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.calories_out).collect()
    }
}

fn bucket(entries: &[DailyEnergy], range: DateRange) -> BTreeMap<Date, f64> {
    let mut by_day = BTreeMap::new();
    for e in entries.iter().filter(|e| range.contains(e.date)) {
        *by_day.entry(e.date).or_insert(0.0) += e.kcal;
    }
    by_day
}

/// Dense per-day intake/expenditure over `range`. Days without entries are zero.
pub fn aggregate(meals: &[DailyEnergy], workouts: &[DailyEnergy], range: DateRange) -> LedgerAggregate {
    let kcal_in = bucket(meals, range);
    let kcal_out = bucket(workouts, range);

    let days: Vec<LedgerDay> = range
        .days()
        .map(|date| LedgerDay {
            date,
            calories_in: round_to(kcal_in.get(&date).copied().unwrap_or(0.0), 1),
            calories_out: round_to(kcal_out.get(&date).copied().unwrap_or(0.0), 1),
        })
        .collect();

    LedgerAggregate {
        range,
        total_in: round_to(days.iter().map(|d| d.calories_in).sum(), 1),
        total_out: round_to(days.iter().map(|d| d.calories_out).sum(), 1),
        days,
    }
}

/// Consecutive logged days counted back from `range.end`.
pub fn streak(logged: &HashSet<Date>, range: DateRange) -> u32 {
    let mut count = 0;
    let mut day = Some(range.end);
    while let Some(d) = day {
        if d < range.start || !logged.contains(&d) {
            break;
        }
        count += 1;
        day = d.previous_day();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn e(date: Date, kcal: f64) -> DailyEnergy {
        DailyEnergy { date, kcal }
    }

    #[test]
    fn series_is_dense_over_range() {
        let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 05));
        let meals = [e(date!(2024 - 03 - 01), 500.0), e(date!(2024 - 03 - 04), 700.0)];
        let workouts = [e(date!(2024 - 03 - 02), 300.0)];

        let agg = aggregate(&meals, &workouts, range);
        assert_eq!(agg.days.len(), 5);
        assert_eq!(agg.per_day_in(), vec![500.0, 0.0, 0.0, 700.0, 0.0]);
        assert_eq!(agg.per_day_out(), vec![0.0, 300.0, 0.0, 0.0, 0.0]);
        assert_eq!(agg.total_in, 1200.0);
        assert_eq!(agg.total_out, 300.0);
        assert_eq!(agg.days[1].net(), -300.0);
    }

    #[test]
    fn entries_on_the_same_day_are_summed_and_outside_ignored() {
        let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 02));
        let meals = [
            e(date!(2024 - 03 - 01), 200.5),
            e(date!(2024 - 03 - 01), 100.0),
            e(date!(2024 - 02 - 28), 999.0),
            e(date!(2024 - 03 - 03), 999.0),
        ];
        let agg = aggregate(&meals, &[], range);
        assert_eq!(agg.per_day_in(), vec![300.5, 0.0]);
        assert_eq!(agg.total_in, 300.5);
    }

    #[test]
    fn reversed_range_is_empty() {
        let range = DateRange::new(date!(2024 - 03 - 05), date!(2024 - 03 - 01));
        let agg = aggregate(&[e(date!(2024 - 03 - 03), 100.0)], &[], range);
        assert!(agg.days.is_empty());
        assert_eq!(agg.total_in, 0.0);
        assert_eq!(agg.total_out, 0.0);
        assert_eq!(range.len_days(), 0);
    }

    #[test]
    fn normalized_swaps_bounds() {
        let r = DateRange::normalized(date!(2024 - 03 - 05), date!(2024 - 03 - 01));
        assert_eq!(r.start, date!(2024 - 03 - 01));
        assert_eq!(r.len_days(), 5);
    }

    #[test]
    fn range_ending_on() {
        let r = DateRange::ending_on(date!(2024 - 03 - 14), 14);
        assert_eq!(r.start, date!(2024 - 03 - 01));
        assert_eq!(r.days().count(), 14);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 10));
        let logged: HashSet<Date> = [
            date!(2024 - 03 - 10),
            date!(2024 - 03 - 09),
            date!(2024 - 03 - 08),
            date!(2024 - 03 - 06),
        ]
        .into_iter()
        .collect();
        assert_eq!(streak(&logged, range), 3);
    }

    #[test]
    fn streak_stops_at_range_start() {
        let range = DateRange::new(date!(2024 - 03 - 09), date!(2024 - 03 - 10));
        let logged: HashSet<Date> = range.days().chain([date!(2024 - 03 - 08)]).collect();
        assert_eq!(streak(&logged, range), 2);
    }

    #[test]
    fn streak_is_zero_when_end_not_logged() {
        let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 10));
        let logged: HashSet<Date> = [date!(2024 - 03 - 09)].into_iter().collect();
        assert_eq!(streak(&logged, range), 0);
        assert_eq!(streak(&HashSet::new(), range), 0);
    }
}
