use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use dashboard::{analytics::TOP_N, filters::DateRange, filters::OrderFilter};
use process::{Format, Report};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Restaurant categories, comma-separated
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,

    /// First order date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last order date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Restaurant names, comma-separated
    #[arg(long, value_delimiter = ',')]
    restaurants: Vec<String>,

    /// Order statuses, comma-separated
    #[arg(long, value_delimiter = ',')]
    statuses: Vec<String>,

    #[arg(long, default_value_t = TOP_N)]
    top: usize,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Overrides DATABASE_NAME
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let report = Report {
        filter: OrderFilter {
            categories: args.categories,
            dates: DateRange::new(args.start, args.end)?,
            restaurants: args.restaurants,
            statuses: args.statuses,
        },
        top: args.top,
        format: args.format,
        database: args.database,
    };

    println!("{}", process::generate_report(report).await?);
    Ok(())
}
