use serde::{Deserialize, Serialize};
use time::Date;

use crate::goals::GoalProgress;
use crate::ledger::{DateRange, LedgerAggregate};
use crate::metrics::{round_to, BmiClass};

/// Query of the range-based report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

/// Longest range a single report may cover.
pub const MAX_REPORT_DAYS: usize = 366;

impl ReportQuery {
    /// Missing bounds default to the `default_days` ending today; reversed bounds are swapped.
    pub fn resolve(&self, today: Date, default_days: i64) -> Result<DateRange, String> {
        let fallback = DateRange::ending_on(today, default_days);
        let range = DateRange::normalized(
            self.start.unwrap_or(fallback.start),
            self.end.unwrap_or(fallback.end),
        );
        if range.len_days() > MAX_REPORT_DAYS {
            return Err(format!("report range is limited to {MAX_REPORT_DAYS} days"));
        }
        Ok(range)
    }
}

/// Chart-ready per-day energy report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySeries {
    pub range: DateRange,
    pub labels: Vec<String>,
    pub calories_in: Vec<f64>,
    pub calories_out: Vec<f64>,
    pub net: Vec<f64>,
    pub total_in: f64,
    pub total_out: f64,
    pub net_total: f64,
    pub net_avg: f64,
    /// 0 when the profile has no TDEE.
    pub tdee: f64,
    pub progress: Option<String>,
}

pub fn day_label(date: Date) -> String {
    format!("{:02}/{:02}", date.day(), u8::from(date.month()))
}

pub fn summarize(ledger: &LedgerAggregate, tdee: f64, progress: Option<&GoalProgress>) -> DailySeries {
    let days = ledger.days.len();
    let net_total = round_to(ledger.total_in - ledger.total_out, 1);
    let net_avg = if days > 0 {
        round_to(net_total / days as f64, 1)
    } else {
        0.0
    };

    DailySeries {
        range: ledger.range,
        labels: ledger.days.iter().map(|d| day_label(d.date)).collect(),
        calories_in: ledger.per_day_in(),
        calories_out: ledger.per_day_out(),
        net: ledger.days.iter().map(|d| round_to(d.net(), 1)).collect(),
        total_in: ledger.total_in,
        total_out: ledger.total_out,
        net_total,
        net_avg,
        tdee: tdee.max(0.0),
        progress: progress.map(|p| p.description.clone()),
    }
}

/// Energy balance of a single day against maintenance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TodaySnapshot {
    pub date: Date,
    pub calories_in: f64,
    pub calories_out: f64,
    pub tdee: f64,
    /// `in - tdee - out`; negative is a deficit.
    pub balance: f64,
    pub bmi: f64,
    pub bmi_class: Option<BmiClass>,
}

pub fn today_snapshot(ledger: &LedgerAggregate, tdee: f64, bmi: f64) -> TodaySnapshot {
    let tdee = tdee.max(0.0);
    TodaySnapshot {
        date: ledger.range.end,
        calories_in: ledger.total_in,
        calories_out: ledger.total_out,
        tdee,
        balance: round_to(ledger.total_in - tdee - ledger.total_out, 1),
        bmi,
        bmi_class: BmiClass::classify(bmi),
    }
}
