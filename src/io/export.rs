//! CSV export for per-day results and the autonomy sweep.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::sweep::SweepTable;
use crate::sim::types::DayResult;

/// Column header for the per-day table.
const DAYS_HEADER: &str = "date,consumption_kwh,generation_kwh,demand_kwh,balance_kwh,\
                           soc_wh,soc_pct,below_min";

/// Column header for the sweep table.
const SWEEP_HEADER: &str = "battery_capacity_wh,panel_power_kw,panel_label,days_below_min";

/// Exports per-day results to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_days_csv(days: &[DayResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_days_csv(days, io::BufWriter::new(file))
}

/// Writes per-day results as CSV to any writer, one row per day.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_days_csv(days: &[DayResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAYS_HEADER.split(',').map(str::trim))?;

    for d in days {
        wtr.write_record(&[
            d.date.to_string(),
            format!("{:.4}", d.consumption_kwh),
            format!("{:.4}", d.generation_kwh),
            format!("{:.4}", d.demand_kwh),
            format!("{:.4}", d.balance_kwh),
            format!("{:.2}", d.soc_wh),
            format!("{:.2}", d.soc_pct),
            d.below_min.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the sweep table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_sweep_csv(table: &SweepTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_sweep_csv(table, io::BufWriter::new(file))
}

/// Writes the sweep table as CSV to any writer, one row per cell.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_sweep_csv(table: &SweepTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SWEEP_HEADER.split(','))?;

    for c in &table.cells {
        wtr.write_record(&[
            format!("{}", c.battery_capacity_wh),
            format!("{}", c.panel_power_kw),
            c.panel_label.clone(),
            c.days_below_min.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::sim::sweep::SweepCell;

    fn make_day(i: u64) -> DayResult {
        DayResult {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i),
            consumption_kwh: 1.0,
            generation_kwh: 2.5,
            demand_kwh: 1.3,
            balance_kwh: 1.2,
            soc_wh: 1500.0,
            soc_pct: 75.0,
            below_min: false,
        }
    }

    #[test]
    fn days_header_and_row_count() {
        let days: Vec<DayResult> = (0..10).map(make_day).collect();
        let mut buf = Vec::new();
        write_days_csv(&days, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "date,consumption_kwh,generation_kwh,demand_kwh,balance_kwh,soc_wh,soc_pct,below_min"
        );
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "2024-01-01,1.0000,2.5000,1.3000,1.2000,1500.00,75.00,false");
    }

    #[test]
    fn sweep_rows_parse_back() {
        let table = SweepTable {
            demand_kwh: 1.0,
            dod_pct: 80.0,
            cells: vec![
                SweepCell {
                    battery_capacity_wh: 600.0,
                    panel_power_kw: 0.4,
                    panel_label: "2 × 200W".to_string(),
                    days_below_min: 12,
                },
                SweepCell {
                    battery_capacity_wh: 600.0,
                    panel_power_kw: 0.5,
                    panel_label: "2 × 250W".to_string(),
                    days_below_min: 7,
                },
            ],
        };
        let mut buf = Vec::new();
        write_sweep_csv(&table, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][2], "2 × 200W");
        assert_eq!(rows[1][3].parse::<usize>().ok(), Some(7));
    }
}
