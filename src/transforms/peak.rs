use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;
use rayon::prelude::*;
use serde::Deserialize;

use crate::accumulator::Accumulator;
use crate::lookups::is_allowed_authority;
use crate::parse::{normalize_date, number_or_zero};

#[derive(Debug, Deserialize)]
struct HourlyRow {
    #[serde(rename = "Local Time at End of Hour")]
    local_time: String,
    #[serde(rename = "Balancing Authority")]
    authority: String,
    #[serde(rename = "Demand (MW)")]
    demand: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct HourlySum {
    total: i64,
    hours: u32,
}

const OUTPUT_HEADER: [&str; 3] = ["Balancing Authority", "Date", "Averaged Demand (MwH)"];

/// Average hourly demand per (balancing authority, date) pair.
pub fn average_daily_demand(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let partials: Vec<Accumulator<(String, String), HourlySum>> = inputs
        .par_iter()
        .map(|path| read_hourly_sums(path))
        .collect::<Result<_>>()?;

    let mut sums = Accumulator::new();
    for partial in partials {
        sums.merge(partial, |into, from| {
            into.total += from.total;
            into.hours += from.hours;
        });
    }

    info!(
        "hourly demand: {} authority-days averaged from {} files",
        sums.len(),
        inputs.len()
    );

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(OUTPUT_HEADER)?;
    for ((authority, date), day) in sums.into_entries() {
        let averaged = day.total as f64 / day.hours as f64;
        writer.write_record([authority, date, averaged.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn read_hourly_sums(path: &Path) -> Result<Accumulator<(String, String), HourlySum>> {
    let mut sums: Accumulator<(String, String), HourlySum> = Accumulator::new();
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.deserialize() {
        let row: HourlyRow = record?;
        if !is_allowed_authority(&row.authority) {
            continue;
        }
        let demand = number_or_zero(&row.demand);
        let key = (
            row.authority.trim().to_string(),
            normalize_date(&row.local_time),
        );
        sums.update(key, |day| {
            day.total += demand;
            day.hours += 1;
        });
    }
    Ok(sums)
}
