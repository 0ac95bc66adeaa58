use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Datelike;
use log::info;
use rayon::prelude::*;
use serde::Deserialize;

use crate::accumulator::Accumulator;
use crate::lookups::is_allowed_authority;
use crate::parse::{is_leap_year, normalize_date, number_or_zero, parse_date};

#[derive(Debug, Deserialize)]
struct DemandRow {
    #[serde(rename = "Data Date")]
    date: String,
    #[serde(rename = "Balancing Authority")]
    authority: String,
    #[serde(rename = "Demand (MW)")]
    demand: String,
    #[serde(rename = "Net Generation (MW)")]
    net_generation: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct DailyTotals {
    demand: i64,
    net_generation: i64,
}

const OUTPUT_HEADER: [&str; 3] = [
    "Date",
    "Summed Demand (MW)",
    "Summed Net Generation (MW)",
];

/// Sum demand and net generation per calendar date across every source
/// file, keeping allow-listed balancing authorities only.
pub fn aggregate_daily_demand(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let partials: Vec<Accumulator<String, DailyTotals>> = inputs
        .par_iter()
        .map(|path| read_daily_totals(path))
        .collect::<Result<_>>()?;

    let mut totals = Accumulator::new();
    for partial in partials {
        totals.merge(partial, |into, from| {
            into.demand += from.demand;
            into.net_generation += from.net_generation;
        });
    }

    info!(
        "daily demand: {} dates aggregated from {} files",
        totals.len(),
        inputs.len()
    );
    write_daily_totals(totals, output)
}

fn read_daily_totals(path: &Path) -> Result<Accumulator<String, DailyTotals>> {
    let mut totals: Accumulator<String, DailyTotals> = Accumulator::new();
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.deserialize() {
        let row: DemandRow = record?;
        if !is_allowed_authority(&row.authority) {
            continue;
        }
        let demand = number_or_zero(&row.demand);
        let net_generation = number_or_zero(&row.net_generation);
        totals.update(normalize_date(&row.date), |day| {
            day.demand += demand;
            day.net_generation += net_generation;
        });
    }
    Ok(totals)
}

fn write_daily_totals(totals: Accumulator<String, DailyTotals>, output: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(OUTPUT_HEADER)?;
    for (date, day) in totals.into_entries() {
        // Charts overlay one series per year, so every year needs the same
        // row count: pad non-leap years with a null Feb 29 ahead of March 1.
        if let Some(parsed) = parse_date(&date) {
            if parsed.month() == 3 && parsed.day() == 1 && !is_leap_year(parsed.year()) {
                writer.write_record([
                    format!("02/29/{}", parsed.year()),
                    String::new(),
                    String::new(),
                ])?;
            }
        }
        writer.write_record([date, day.demand.to_string(), day.net_generation.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sums_per_date_with_allow_list() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demand.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             07/01/20,CISO,\"1,000\",900\n\
             07/01/20,FOO,9999,9999\n\
             07/01/20,ERCO,500,400\n\
             07/02/20,CISO,700,650\n",
        )
        .unwrap();

        aggregate_daily_demand(&[input], &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Summed Demand (MW),Summed Net Generation (MW)\n\
             07/01/2020,1500,1300\n\
             07/02/2020,700,650\n"
        );
    }

    #[test]
    fn test_merges_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &first,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             07/01/20,CISO,100,90\n",
        )
        .unwrap();
        fs::write(
            &second,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             07/01/20,ERCO,50,40\n\
             06/30/20,ERCO,25,20\n",
        )
        .unwrap();

        aggregate_daily_demand(&[first, second], &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Summed Demand (MW),Summed Net Generation (MW)\n\
             07/01/2020,150,130\n\
             06/30/2020,25,20\n"
        );
    }

    #[test]
    fn test_malformed_demand_counts_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demand.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             07/01/20,CISO,abc,200\n\
             07/01/20,CISO,300,xyz\n",
        )
        .unwrap();

        aggregate_daily_demand(&[input], &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Summed Demand (MW),Summed Net Generation (MW)\n\
             07/01/2020,300,200\n"
        );
    }

    #[test]
    fn test_non_leap_year_gets_null_feb_29() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demand.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             02/28/19,CISO,100,90\n\
             03/01/19,CISO,200,180\n",
        )
        .unwrap();

        aggregate_daily_demand(&[input], &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Summed Demand (MW),Summed Net Generation (MW)\n\
             02/28/2019,100,90\n\
             02/29/2019,,\n\
             03/01/2019,200,180\n"
        );
    }

    #[test]
    fn test_leap_year_is_not_padded() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demand.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Data Date,Balancing Authority,Demand (MW),Net Generation (MW)\n\
             02/29/20,CISO,100,90\n\
             03/01/20,CISO,200,180\n",
        )
        .unwrap();

        aggregate_daily_demand(&[input], &output).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Summed Demand (MW),Summed Net Generation (MW)\n\
             02/29/2020,100,90\n\
             03/01/2020,200,180\n"
        );
    }
}
