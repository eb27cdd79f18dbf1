use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ssbg_dashboard::components::format::{currency, fiscal_year_label, thousands};
use ssbg_dashboard::config::{init_tracing, DataArgs};
use ssbg_dashboard::export::write_csv;
use ssbg_dashboard::pages::{national, state};
use ssbg_dashboard::{
    DataStore, FilterParams, LoadOptions, NationalFilters, NumericField, PageDefaults,
    StateFilters,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ssbg-dashboard")]
#[command(about = "Inspect, validate and export the SSBG expenditure table")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// National totals and top service categories
    Summary {
        /// Fiscal year, or `all` (default: latest year)
        #[arg(long)]
        year: Option<String>,
    },
    /// Check the total columns against their components
    Validate {
        /// Mismatches to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Write a filtered slice as CSV
    Export {
        #[arg(short, long)]
        out: PathBuf,

        /// Rows of one state instead of the national slice
        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        year: Option<String>,

        /// Comma separated service categories
        #[arg(long)]
        categories: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Summary { year } => run_summary(&cli.data, year),
        Command::Validate { limit } => run_validate(&cli.data, limit),
        Command::Export {
            out,
            state,
            year,
            categories,
        } => run_export(&cli.data, out, state, year, categories),
    }
}

fn load(data: &DataArgs, options: LoadOptions) -> Result<DataStore> {
    DataStore::load_with(&data.data_path, options)
        .with_context(|| format!("failed to load {}", data.data_path.display()))
}

fn run_summary(data: &DataArgs, year: Option<String>) -> Result<()> {
    let store = load(data, data.load_options())?;
    let params = FilterParams {
        year,
        ..FilterParams::default()
    };
    let filters = NationalFilters::from_params(&params, &store, &PageDefaults::default())?;
    let period = fiscal_year_label(filters.year, store.year_bounds());
    let slice = national::current_slice(&store, &filters);
    let (expenditures, recipients) = slice.national_totals();

    println!("📊 SSBG Summary {}", period);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Records:                {}", thousands(slice.len() as u64));
    println!("States/territories:     {}", slice.totals().states);
    println!("Total SSBG expenditures: {}", currency(expenditures));
    println!("Total recipients:        {}", thousands(recipients));

    println!("\n🏆 Top service categories by expenditures:");
    for (i, (category, value)) in slice
        .top_categories(NumericField::TotalSsbgExpenditures, national::TOP_N)
        .iter()
        .enumerate()
    {
        println!("  {:>2}. {:<45} {}", i + 1, category, currency(*value));
    }

    Ok(())
}

fn run_validate(data: &DataArgs, limit: usize) -> Result<()> {
    // Always load leniently so every mismatch can be listed
    let store = load(data, LoadOptions::default())?;
    let report = store.validation_report();

    println!("🔍 Validating {}", data.data_path.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", report.summary());

    if report.is_clean() {
        println!("✅ All totals match their components");
        return Ok(());
    }

    for issue in report.issues.iter().take(limit) {
        println!("  ❌ {}", issue);
    }
    if report.issues.len() > limit {
        println!("  ... and {} more", report.issues.len() - limit);
    }

    bail!("{} invariant mismatches", report.issues.len())
}

fn run_export(
    data: &DataArgs,
    out: PathBuf,
    state_name: Option<String>,
    year: Option<String>,
    categories: Option<String>,
) -> Result<()> {
    let store = load(data, data.load_options())?;

    let params = FilterParams {
        year,
        categories,
        ..FilterParams::default()
    };
    let slice = match &state_name {
        Some(name) => {
            let filters = StateFilters::from_params(name, &params, &store)?;
            state::current_slice(&store, &filters)
        }
        None => {
            let filters = NationalFilters::from_params(&params, &store, &PageDefaults::default())?;
            national::current_slice(&store, &filters)
        }
    };

    let file = File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
    write_csv(&slice, BufWriter::new(file))?;
    println!("✓ Wrote {} rows to {}", slice.len(), out.display());

    Ok(())
}
