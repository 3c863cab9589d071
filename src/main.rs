//! Flight Plan CLI
//!
//! Builds a profile, applies milestones read from a JSON file, runs the
//! projection and writes the yearly results to CSV

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use flight_plan::{
    FilingStatus, FinancialProfile, MilestoneSpec, ProjectionConfig, ProjectionResult, ReferenceTables,
    ScenarioRunner, TaxTables,
};

#[derive(Parser, Debug)]
#[command(
    name = "flight-plan",
    about = "Year-by-year personal financial projection with life milestones"
)]
struct Cli {
    #[arg(long, help = "Location as \"City, ST\"")]
    location: String,
    #[arg(long)]
    occupation: String,
    #[arg(long, default_value_t = 30)]
    years: u32,
    #[arg(long, default_value_t = 0.07, help = "Annual return on reinvested savings")]
    return_rate: f64,
    #[arg(long, default_value = "single", help = "single or joint")]
    filing_status: FilingStatus,
    #[arg(long, default_value_t = 0.0)]
    starting_savings: f64,
    #[arg(long, help = "JSON array of {type, trigger_year, params} milestones")]
    milestones: Option<PathBuf>,
    #[arg(long, help = "Directory with locations.csv and occupations.csv; built-in tables if omitted")]
    reference_dir: Option<PathBuf>,
    #[arg(long, help = "Directory with federal_brackets.csv and state_rates.csv; built-in tables if omitted")]
    tax_dir: Option<PathBuf>,
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,
    #[arg(long, help = "Also write the full result as JSON")]
    json: Option<PathBuf>,
}

/// One CSV line per projected year
#[derive(Serialize)]
struct CsvRow {
    year: u32,
    filing_status: FilingStatus,
    income: i64,
    federal_tax: i64,
    state_tax: i64,
    social_security: i64,
    medicare: i64,
    total_tax: i64,
    regular_expenses: i64,
    total_expenses: i64,
    cash_flow: i64,
    savings: i64,
    total_assets: i64,
    total_liabilities: i64,
    loan_payments: i64,
    net_worth: i64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Flight Plan v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    let reference = match &cli.reference_dir {
        Some(dir) => ReferenceTables::from_csv_path(dir)
            .with_context(|| format!("loading reference tables from {}", dir.display()))?,
        None => ReferenceTables::builtin(),
    };
    let tax = match &cli.tax_dir {
        Some(dir) => TaxTables::from_csv_path(dir)
            .with_context(|| format!("loading tax tables from {}", dir.display()))?,
        None => TaxTables::default_2024(),
    };
    let runner = ScenarioRunner::with_tables(reference, tax).context("validating tax tables")?;

    let specs: Vec<MilestoneSpec> = match &cli.milestones {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing milestones from {}", path.display()))?
        }
        None => Vec::new(),
    };

    let profile = FinancialProfile {
        location: cli.location.clone(),
        occupation: cli.occupation.clone(),
        investment_return_rate: cli.return_rate,
        filing_status: cli.filing_status,
        starting_savings: cli.starting_savings,
    };
    let milestones = runner
        .builder()
        .milestones(&profile, &specs)
        .context("building milestones")?;

    println!("Profile: {} in {}", profile.occupation, profile.location);
    println!("  Filing status: {}", profile.filing_status);
    println!("  Return rate: {:.2}%", profile.investment_return_rate * 100.0);
    for milestone in &milestones {
        println!("  Milestone: {} (year {})", milestone.name, milestone.trigger_year);
    }
    println!();

    let config = ProjectionConfig { num_years: cli.years };
    let result = runner
        .run(&profile, &milestones, &config)
        .context("running projection")?;

    print_table(&result);

    write_csv(&result, &cli.output)?;
    println!("\nFull results written to: {}", cli.output.display());

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("JSON results written to: {}", path.display());
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Years: {}", summary.num_years);
    println!("  Total Income: ${}", summary.total_income);
    println!("  Total Tax: ${} ({:.1}% effective)", summary.total_tax, summary.effective_tax_rate * 100.0);
    println!("  Total Expenses: ${}", summary.total_expenses);
    println!("  Final Savings: ${}", summary.final_savings);
    println!("  Final Net Worth: ${}", summary.final_net_worth);
    println!("  Peak Net Worth: ${}", summary.peak_net_worth);

    Ok(())
}

fn print_table(result: &ProjectionResult) {
    println!(
        "{:>4} {:>12} {:>10} {:>12} {:>12} {:>14} {:>14}",
        "Year", "Income", "Tax", "Expenses", "CashFlow", "Savings", "NetWorth"
    );
    println!("{}", "-".repeat(84));
    for row in &result.years {
        println!(
            "{:>4} {:>12} {:>10} {:>12} {:>12} {:>14} {:>14}",
            row.year,
            row.income,
            row.total_tax,
            row.total_expenses,
            row.cash_flow,
            row.investment_growth,
            row.net_worth,
        );
    }
}

fn write_csv(result: &ProjectionResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in &result.years {
        writer.serialize(CsvRow {
            year: row.year,
            filing_status: row.filing_status,
            income: row.income,
            federal_tax: row.federal_tax,
            state_tax: row.state_tax,
            social_security: row.social_security,
            medicare: row.medicare,
            total_tax: row.total_tax,
            regular_expenses: row.regular_expenses,
            total_expenses: row.total_expenses,
            cash_flow: row.cash_flow,
            savings: row.investment_growth,
            total_assets: row.total_assets,
            total_liabilities: row.total_liabilities,
            loan_payments: row.loan_payments,
            net_worth: row.net_worth,
        })?;
    }
    writer.flush()?;
    Ok(())
}
