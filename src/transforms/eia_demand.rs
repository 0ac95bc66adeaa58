use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use serde::Deserialize;

use crate::accumulator::Accumulator;
use crate::lookups::{is_allowed_authority, is_excluded};
use crate::parse::{normalize_date, number_or_zero, parse_date};

#[derive(Debug, Deserialize)]
struct AuthorityRow {
    #[serde(rename = "Data Date")]
    date: String,
    #[serde(rename = "Balancing Authority")]
    authority: String,
    #[serde(rename = "Demand (MW)")]
    demand: String,
}

/// Sum demand per date across one or two EIA files, or, given three or
/// more yearly files, align them on a common weekday offset and emit the
/// per-index average as a single-column comparison series.
pub fn aggregate_demand_files(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap(),
    );

    let partials: Vec<Accumulator<String, i64>> = inputs
        .par_iter()
        .map(|path| {
            let totals = read_demand_totals(path);
            bar.inc(1);
            totals
        })
        .collect::<Result<_>>()?;
    bar.finish_and_clear();

    if inputs.len() < 3 {
        let mut totals = Accumulator::new();
        for partial in partials {
            totals.merge(partial, |into, from| *into += from);
        }
        info!(
            "eia demand: {} dates summed from {} files",
            totals.len(),
            inputs.len()
        );

        let mut writer = csv::Writer::from_path(output)?;
        writer.write_record(["Date", "Summed Demand (MW)"])?;
        for (date, total) in totals.into_entries() {
            writer.write_record([date, total.to_string()])?;
        }
        writer.flush()?;
        return Ok(());
    }

    // Multi-year comparison: every file is one year. Unlike the load
    // pattern average, the divisor here is the flat year count.
    let years: Vec<Vec<i64>> = partials.into_iter().map(aligned_series).collect();
    let longest = years.iter().map(Vec::len).max().unwrap_or(0);
    info!(
        "eia demand: averaging {} aligned indices over {} years",
        longest,
        years.len()
    );

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([format!(
        "Aggregated and averaged over {} years",
        years.len()
    )])?;
    for index in 0..longest {
        let sum: i64 = years
            .iter()
            .map(|year| year.get(index).copied().unwrap_or(0))
            .sum();
        let averaged = sum as f64 / years.len() as f64;
        writer.write_record([averaged.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn read_demand_totals(path: &Path) -> Result<Accumulator<String, i64>> {
    let mut totals = Accumulator::new();
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.deserialize() {
        let row: AuthorityRow = record?;
        if !is_allowed_authority(&row.authority) {
            continue;
        }
        let demand = number_or_zero(&row.demand);
        totals.update(normalize_date(&row.date), |total| *total += demand);
    }
    Ok(totals)
}

/// Daily totals in first-seen order, minus the excluded leading dates.
fn aligned_series(totals: Accumulator<String, i64>) -> Vec<i64> {
    totals
        .into_entries()
        .filter(|(date, _)| parse_date(date).map_or(true, |parsed| !is_excluded(parsed)))
        .map(|(_, total)| total)
        .collect()
}
