use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;
use rayon::prelude::*;
use serde::Deserialize;

use crate::accumulator::Accumulator;
use crate::lookups::is_excluded;
use crate::parse::{number_or_zero, parse_date};

#[derive(Debug, Deserialize)]
struct SeriesRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Demand (MW)")]
    demand: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct IndexSample {
    sum: i64,
    years_with_data: u32,
}

/// Collapse one daily series per year into a single representative cycle.
///
/// Each year's leading dates before its reference start are dropped so the
/// series align on the same weekday, then samples are averaged index by
/// index. The divisor is the number of years with a non-zero sample at that
/// index, not the year count, so a year with a gap does not drag the
/// average down.
pub fn average_load_pattern(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let series: Vec<Vec<i64>> = inputs
        .par_iter()
        .map(|path| read_year_series(path))
        .collect::<Result<_>>()?;

    let mut samples: Accumulator<usize, IndexSample> = Accumulator::new();
    for year in &series {
        for (index, &value) in year.iter().enumerate() {
            samples.update(index, |sample| {
                sample.sum += value;
                if value != 0 {
                    sample.years_with_data += 1;
                }
            });
        }
    }

    info!(
        "load pattern: {} indices averaged over {} years",
        samples.len(),
        inputs.len()
    );

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([format!(
        "Aggregated and averaged over {} years",
        inputs.len()
    )])?;
    for (_, sample) in samples.into_entries() {
        if sample.years_with_data == 0 {
            // A zero average is a hole in the data, not a data point.
            continue;
        }
        let averaged = sample.sum as f64 / sample.years_with_data as f64;
        writer.write_record([averaged.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn read_year_series(path: &Path) -> Result<Vec<i64>> {
    let mut values = Vec::new();
    let mut reader = csv::Reader::from_path(path)?;
    for record in reader.deserialize() {
        let row: SeriesRow = record?;
        if let Some(date) = parse_date(&row.date) {
            if is_excluded(date) {
                continue;
            }
        }
        values.push(number_or_zero(&row.demand));
    }
    Ok(values)
}
