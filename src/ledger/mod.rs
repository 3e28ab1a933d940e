//! Calorie intake and expenditure accounting over date ranges.

pub(crate) mod aggregate;
pub mod repo;
mod repo_types;
pub mod services;

pub use aggregate::{DailyEnergy, DateRange, LedgerAggregate};
pub use services::{aggregate_for_user, kpis_for_user, Kpis};
