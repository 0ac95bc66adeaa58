use std::path::Path;

use anyhow::Result;
use log::info;
use serde::Deserialize;

use crate::accumulator::Accumulator;
use crate::parse::{normalize_date, number_or_zero};

#[derive(Debug, Deserialize)]
struct CaseRow {
    date: String,
    cases: String,
    deaths: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct CaseTotals {
    cases: i64,
    deaths: i64,
}

const OUTPUT_HEADER: [&str; 3] = ["date", "cases", "deaths"];

/// Sum case and death counts per date from a covid snapshot CSV.
pub fn aggregate_cases(input: &Path, output: &Path) -> Result<()> {
    let mut totals: Accumulator<String, CaseTotals> = Accumulator::new();
    let mut reader = csv::Reader::from_path(input)?;
    for record in reader.deserialize() {
        let row: CaseRow = record?;
        let cases = number_or_zero(&row.cases);
        let deaths = number_or_zero(&row.deaths);
        totals.update(normalize_date(&row.date), |day| {
            day.cases += cases;
            day.deaths += deaths;
        });
    }

    info!("covid cases: {} dates aggregated", totals.len());

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(OUTPUT_HEADER)?;
    for (date, day) in totals.into_entries() {
        writer.write_record([date, day.cases.to_string(), day.deaths.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sums_cases_and_deaths_per_date() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cases.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "date,cases,deaths\n\
             01/21/2020,5,0\n\
             01/21/2020,3,1\n\
             01/22/2020,2,0\n",
        )
        .unwrap();

        aggregate_cases(&input, &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "date,cases,deaths\n\
             01/21/2020,8,1\n\
             01/22/2020,2,0\n"
        );
    }

    #[test]
    fn test_malformed_count_contributes_zero() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cases.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "date,cases,deaths\n\
             01/21/2020,abc,1\n\
             01/21/2020,4,0\n",
        )
        .unwrap();

        aggregate_cases(&input, &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "date,cases,deaths\n\
             01/21/2020,4,1\n"
        );
    }

    #[test]
    fn test_iso_dates_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cases.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "date,cases,deaths\n\
             2020-01-21,1,0\n\
             2020-01-21,2,0\n",
        )
        .unwrap();

        aggregate_cases(&input, &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "date,cases,deaths\n\
             2020-01-21,3,0\n"
        );
    }
}
