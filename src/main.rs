use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glob::glob;

use eia_series_processor::fetch;
use eia_series_processor::transforms::{covid, demand, eia_demand, load_pattern, peak};

#[derive(Parser)]
#[command(name = "eia_series_processor")]
#[command(about = "Reshape EIA and covid CSV datasets into dashboard chart series")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sum demand and net generation per date across EIA files
    Demand {
        /// Source CSV paths or glob patterns
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<String>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Average hourly demand per balancing authority and date
    Peak {
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<String>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Average aligned multi-year daily series into one representative cycle
    LoadPattern {
        /// One daily-series CSV per year
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<String>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Sum covid cases and deaths per date
    Covid {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Sum demand per date; three or more files switch to the averaged
    /// multi-year comparison series
    EiaDemand {
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<String>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Download the covid case snapshot CSV
    FetchCovid {
        #[arg(long, default_value = fetch::COVID_CASES_URL)]
        url: String,
        #[arg(long)]
        output: PathBuf,
    },
}

fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') {
            let mut matched: Vec<PathBuf> = glob(pattern)?.filter_map(Result::ok).collect();
            matched.sort();
            paths.extend(matched);
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}

fn main() -> Result<()> {
    env_logger::init();

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()
        .unwrap();

    let args = Args::parse();

    match args.command {
        Command::Demand { inputs, output } => {
            let inputs = expand_inputs(&inputs)?;
            println!("⚡ Summing demand/generation from {} files", inputs.len());
            demand::aggregate_daily_demand(&inputs, &output)?;
            println!("✅ Wrote {}", output.display());
        }
        Command::Peak { inputs, output } => {
            let inputs = expand_inputs(&inputs)?;
            println!("📊 Averaging hourly demand from {} files", inputs.len());
            peak::average_daily_demand(&inputs, &output)?;
            println!("✅ Wrote {}", output.display());
        }
        Command::LoadPattern { inputs, output } => {
            let inputs = expand_inputs(&inputs)?;
            println!("📅 Averaging load pattern over {} years", inputs.len());
            load_pattern::average_load_pattern(&inputs, &output)?;
            println!("✅ Wrote {}", output.display());
        }
        Command::Covid { input, output } => {
            println!("🦠 Aggregating covid cases from {}", input.display());
            covid::aggregate_cases(&input, &output)?;
            println!("✅ Wrote {}", output.display());
        }
        Command::EiaDemand { inputs, output } => {
            let inputs = expand_inputs(&inputs)?;
            println!("⚡ Aggregating EIA demand from {} files", inputs.len());
            eia_demand::aggregate_demand_files(&inputs, &output)?;
            println!("✅ Wrote {}", output.display());
        }
        Command::FetchCovid { url, output } => {
            println!("🌐 Fetching covid snapshot from {}", url);
            fetch::download(&url, &output)?;
            println!("✅ Wrote {}", output.display());
        }
    }

    Ok(())
}
