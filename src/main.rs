//! Bike-sharing EDA pipeline CLI
//!
//! Drives the analysis session over a day-level CSV file:
//!
//! ```bash
//! cargo run -- assess --data day.csv
//! cargo run -- clean --data day.csv
//! cargo run -- analyze --data day.csv --factor season
//! cargo run -- test --data day.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_bikeshare_eda::analysis::{ChartSpec, TestResult};
use rust_bikeshare_eda::error::EdaError;
use rust_bikeshare_eda::pipeline::Pipeline;
use rust_bikeshare_eda::quality::OutlierConfig;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bikeshare_eda")]
#[command(about = "Exploratory data analysis over the bike-sharing dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess data quality: missing values, duplicates, outliers
    Assess {
        /// Path to the day-level CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean the dataset: normalize dates, remove IQR outliers
    Clean {
        /// Path to the day-level CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Fence multiplier for the cleaning pass
        #[arg(short, long, default_value_t = 1.0)]
        multiplier: f64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grouped summaries, correlation, segmentation, seasonal trend
    Analyze {
        /// Path to the day-level CSV
        #[arg(short, long)]
        data: PathBuf,

        /// Grouping factor: season, weathersit, workingday, holiday
        #[arg(short, long, default_value = "season")]
        factor: String,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the hypothesis tests over the cleaned rentals
    Test {
        /// Path to the day-level CSV
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    FmtSubscriber::builder().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess { data, json } => {
            let mut session = Pipeline::default();
            session
                .ingest_csv(&data)
                .with_context(|| format!("failed to load {data:?}"))?;
            let report = session.assess()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Data Quality Assessment");
            println!("=======================");
            println!("Rows read:      {}", report.ingest.rows_read);
            println!("Rows loaded:    {}", report.ingest.rows_loaded);
            println!("Rows skipped:   {}", report.ingest.rows_skipped);
            println!("Duplicate rows: {}", report.ingest.duplicate_rows);
            println!("Missing cells:  {}", report.ingest.total_missing());

            if report.ingest.total_missing() > 0 {
                println!("\nMissing values by column:");
                for (name, count) in &report.ingest.missing_by_column {
                    if *count > 0 {
                        println!("  {name:<12} {count}");
                    }
                }
            }

            println!("\nDescriptive statistics:");
            println!(
                "{:<12} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            );
            for (name, s) in &report.describe {
                println!(
                    "{:<12} {:>7} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                    name, s.count, s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max
                );
            }

            println!(
                "\nOutliers (fence multiplier {:.1}): {} of {} continuous columns flagged",
                report.outliers.multiplier,
                report.outliers.flagged_count(),
                report.outliers.columns.len()
            );
            for c in report.outliers.flagged() {
                println!(
                    "  {:<12} {:>5} outside [{:.2}, {:.2}]",
                    c.bounds.column, c.count, c.bounds.lower, c.bounds.upper
                );
            }
        }

        Commands::Clean {
            data,
            multiplier,
            json,
        } => {
            let config = OutlierConfig {
                clean_multiplier: multiplier,
                ..Default::default()
            };
            let mut session = Pipeline::new(config);
            session
                .ingest_csv(&data)
                .with_context(|| format!("failed to load {data:?}"))?;
            let report = session.run_cleaning()?;

            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
                return Ok(());
            }

            println!("Cleaning Report");
            println!("===============");
            println!("Rows before:      {}", report.raw_rows);
            println!("Rows after:       {}", report.clean_rows);
            println!("Shrinkage ratio:  {:.3}", report.shrinkage_ratio);
            println!("Dates normalized: {}", report.dates_normalized);
            println!("\nRows removed per column filter:");
            for (name, removed) in &report.removed_by_column {
                if *removed > 0 {
                    println!("  {name:<12} {removed}");
                }
            }
            for warning in &report.warnings {
                warn!(%warning, "cleaning warning");
            }
        }

        Commands::Analyze { data, factor, json } => {
            let mut session = Pipeline::default();
            session
                .ingest_csv(&data)
                .with_context(|| format!("failed to load {data:?}"))?;
            session.run_cleaning()?;

            match session.group_summary(&factor) {
                Ok(summary) if !json => {
                    println!("Rentals by {factor}");
                    println!("{}", "-".repeat(78));
                    println!(
                        "{:<18} {:>6} {:>9} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}",
                        "group", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
                    );
                    for g in &summary.groups {
                        let s = &g.stats;
                        println!(
                            "{:<18} {:>6} {:>9.1} {:>9.1} {:>8.0} {:>8.1} {:>8.1} {:>8.1} {:>8.0}",
                            g.label, s.count, s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max
                        );
                    }
                }
                Ok(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
                Err(err) => advisory(err)?,
            }

            match session.correlation() {
                Ok(matrix) if !json => {
                    println!("\nCorrelation ({}):", matrix.columns.join(", "));
                    print!("{:<12}", "");
                    for name in &matrix.columns {
                        print!("{name:>12}");
                    }
                    println!();
                    for (i, name) in matrix.columns.iter().enumerate() {
                        print!("{name:<12}");
                        for j in 0..matrix.columns.len() {
                            print!("{:>12.3}", matrix.values[[i, j]]);
                        }
                        println!();
                    }
                }
                Ok(matrix) => println!("{}", serde_json::to_string_pretty(&matrix)?),
                Err(err) => advisory(err)?,
            }

            match session.segments() {
                Ok(segments) if !json => {
                    println!(
                        "\nRental segments (Q1 = {:.0}, Q3 = {:.0}):",
                        segments.q1, segments.q3
                    );
                    print_chart(&segments.chart());
                }
                Ok(segments) => println!("{}", serde_json::to_string_pretty(&segments)?),
                Err(err) => advisory(err)?,
            }

            match session.seasonal_trend() {
                Ok(trend) if !json => {
                    println!("\n{}:", trend.title);
                    print_chart(&trend);
                }
                Ok(trend) => println!("{}", serde_json::to_string_pretty(&trend)?),
                Err(err) => advisory(err)?,
            }
        }

        Commands::Test { data } => {
            let mut session = Pipeline::default();
            session
                .ingest_csv(&data)
                .with_context(|| format!("failed to load {data:?}"))?;
            session.run_cleaning()?;

            println!("Hypothesis Tests");
            println!("================");

            match session.normality_test() {
                Ok(result) => {
                    print_test(&result);
                    if result.consistent_with_normal() {
                        println!("  sample is consistent with a normal distribution");
                    } else {
                        println!("  sample departs from a normal distribution");
                    }
                }
                Err(err) => advisory(err)?,
            }

            match session.workingday_test() {
                Ok(result) => {
                    print_test(&result);
                    if result.is_significant() {
                        println!("  working and non-working days differ significantly");
                    } else {
                        println!("  no significant working-day effect");
                    }
                }
                Err(err) => advisory(err)?,
            }

            match session.season_anova() {
                Ok(result) => {
                    print_test(&result);
                    if result.is_significant() {
                        println!("  seasonal means differ significantly");
                    } else {
                        println!("  no significant seasonal effect");
                    }
                }
                Err(err) => advisory(err)?,
            }
        }
    }

    Ok(())
}

/// Advisory errors become warnings scoped to the current command;
/// everything else propagates.
fn advisory(err: EdaError) -> Result<()> {
    if err.is_advisory() {
        warn!(%err, "analysis skipped");
        Ok(())
    } else {
        Err(err.into())
    }
}

fn print_test(result: &TestResult) {
    println!(
        "\n{}: statistic = {:.4}, p-value = {:.5}",
        result.name, result.statistic, result.p_value
    );
}

fn print_chart(chart: &ChartSpec) {
    for (i, (category, value)) in chart.categories.iter().zip(&chart.values).enumerate() {
        let marker = if chart.highlighted == Some(i) { "*" } else { " " };
        println!("  {marker} {category:<18} {value:>10.1}");
    }
}
