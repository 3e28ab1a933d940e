use sqlx::FromRow;
use time::Date;

use super::aggregate::DailyEnergy;

/// One `GROUP BY date` row of summed calories.
#[derive(Debug, FromRow)]
pub struct DailyEnergyRow {
    pub date: Date,
    pub kcal: f64,
}

impl From<DailyEnergyRow> for DailyEnergy {
    fn from(r: DailyEnergyRow) -> Self {
        Self {
            date: r.date,
            kcal: r.kcal,
        }
    }
}
