//! API response and query types.
//!
//! Day records use the same field names as the CSV export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sim::balance::BalanceKind;
use crate::sim::kpi::SummaryReport;
use crate::sim::types::{DayResult, DerivedQuantities, SimulationParameters};

/// Combined summary response.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub parameters: SimulationParameters,
    pub derived: DerivedQuantities,
    pub summary: SummaryReport,
}

/// One day, with the surplus/deficit classification added.
#[derive(Debug, Serialize)]
pub struct DayRecord {
    #[serde(flatten)]
    pub day: DayResult,
    pub balance_kind: BalanceKind,
}

impl From<&DayResult> for DayRecord {
    fn from(d: &DayResult) -> Self {
        Self {
            day: *d,
            balance_kind: d.balance_kind(),
        }
    }
}

/// Optional inclusive date range for the days endpoint.
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_record_serializes_flat_with_kind() {
        let day = DayResult {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            consumption_kwh: 1.0,
            generation_kwh: 0.5,
            demand_kwh: 1.3,
            balance_kwh: -0.8,
            soc_wh: 1200.0,
            soc_pct: 40.0,
            below_min: false,
        };
        let json = serde_json::to_value(DayRecord::from(&day)).unwrap();
        assert_eq!(json["date"], "2024-02-01");
        assert_eq!(json["soc_pct"], 40.0);
        assert_eq!(json["balance_kind"], "deficit");
    }
}
