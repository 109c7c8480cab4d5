//! BioScout CLI
//!
//! Interactive entry point: collects the scientist of interest, lets the
//! user pick 1-3 seed papers, and hands the validated parameters to the
//! similarity pipeline. All computation happens in `bioscout-pipeline`;
//! this binary only prompts, validates, and reports.

mod prompts;

use anyhow::Context;
use bioscout_common::config::{AppConfig, ObservabilityConfig};
use bioscout_common::lookup::{BiblioLookup, EntrezLookup};
use bioscout_common::models::SeedSet;
use bioscout_pipeline::Pipeline;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Find biologists with similar citation histories and build a reading list
#[derive(Parser)]
#[command(name = "bioscout")]
#[command(version, about, long_about = None)]
struct Cli {
    /// First name of the scientist of interest
    #[arg(long)]
    first_name: Option<String>,

    /// Middle initial of the scientist of interest
    #[arg(long)]
    middle_initial: Option<String>,

    /// Last name of the scientist of interest
    #[arg(long)]
    last_name: Option<String>,

    /// Institutional affiliation, no abbreviations
    #[arg(long)]
    affiliation: Option<String>,

    /// Fraction (0-1] of ranked candidates forming the similarity cohort
    #[arg(long)]
    fraction: Option<f64>,

    /// Number of papers on the recommended reading list
    #[arg(long)]
    list_size: Option<usize>,

    /// Load configuration from a specific TOML file
    #[arg(long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(observability: &ObservabilityConfig, debug: bool) -> anyhow::Result<()> {
    let level = if debug {
        "debug".to_string()
    } else {
        observability.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = if observability.log_file.is_empty() {
        None
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&observability.log_file)
            .with_context(|| format!("failed to open log file {}", observability.log_file))?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if observability.json_logging {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
    Ok(())
}

/// Assemble the lowercase search name from the collected parts, the shape
/// the author-search endpoint matches best.
fn assemble_name(first: &str, middle_initial: &str, last: &str) -> String {
    let initial = middle_initial.chars().next().map(|c| c.to_string());
    [Some(first.to_string()), initial, Some(last.to_string())]
        .into_iter()
        .flatten()
        .map(|part| part.to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ask_unless(flag: Option<String>, question: &str) -> anyhow::Result<String> {
    match flag {
        Some(value) => Ok(value),
        None => Ok(prompts::ask(question)?),
    }
}

// One lookup in flight at a time; a current-thread runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    init_tracing(&config.observability, cli.debug)?;
    info!("Starting BioScout v{}", bioscout_common::VERSION);

    let lookup = EntrezLookup::new(config.lookup.clone())?;

    if cli.first_name.is_none() || cli.last_name.is_none() {
        println!("Type the answer to each question then press return. If you do not know the answer, just hit return.");
    }
    let first = ask_unless(cli.first_name, "What is the first name of the scientist of interest?")?;
    let middle = ask_unless(
        cli.middle_initial,
        "What is the middle initial of the scientist of interest?",
    )?;
    let last = ask_unless(cli.last_name, "What is the last name of the scientist of interest?")?;
    let affiliation = ask_unless(
        cli.affiliation,
        "What is the affiliation of the scientist of interest? No abbreviations, please.",
    )?;

    let name = assemble_name(&first, &middle, &last);
    let affiliation = (!affiliation.is_empty()).then_some(affiliation);

    info!(name = %name, "Searching for authored papers");
    let search = lookup
        .search_by_author(&name, affiliation.as_deref())
        .await
        .context("author search failed; the lookup service may be unavailable")?;

    if search.ids.is_empty() {
        println!("No papers found for {}. Check the spelling and try again.", name);
        return Ok(());
    }

    let records = lookup
        .fetch_records(&search.ids)
        .await
        .context("failed to fetch the authored-paper records")?;

    println!(
        "Please select up to 3 papers by keying in the corresponding number(s). Separate each number by a comma."
    );
    for (index, record) in records.iter().enumerate() {
        println!("{}", record.citation_line(index + 1));
    }

    let seed_ids = loop {
        let input = prompts::ask("Which papers would you like to select?")?;
        match prompts::parse_selection(&input, records.len()) {
            Ok(indices) => {
                break indices
                    .into_iter()
                    .map(|i| records[i].id.clone())
                    .collect::<Vec<_>>()
            }
            Err(e) => println!(
                "{}. Please select up to 3 papers by keying in the corresponding number(s), separated by commas.",
                e
            ),
        }
    };
    let seed = SeedSet::new(seed_ids)?;

    let fraction = match cli.fraction.and_then(|f| (f > 0.0 && f <= 1.0).then_some(f)) {
        Some(f) => f,
        None => loop {
            let input = prompts::ask(
                "What fraction of the most similar biologists should form the cohort? (0-1, blank for default)",
            )?;
            if input.is_empty() {
                break config.pipeline.similarity_fraction;
            }
            match prompts::parse_fraction(&input) {
                Some(f) => break f,
                None => println!("Please enter a decimal greater than 0 and at most 1."),
            }
        },
    };

    let list_size = match cli.list_size.filter(|&k| k > 0) {
        Some(k) => k,
        None => loop {
            let input = prompts::ask(
                "How many papers do you want on the recommended reading list? (blank for default)",
            )?;
            if input.is_empty() {
                break config.pipeline.reading_list_size;
            }
            match prompts::parse_list_size(&input) {
                Some(k) => break k,
                None => println!("Please enter a positive whole number."),
            }
        },
    };

    let pipeline = Pipeline::new(&lookup);
    let report = pipeline
        .run(&seed, fraction, list_size)
        .await
        .context("similarity pipeline failed")?;

    info!("Most similar biologists:");
    for entry in report
        .similarity
        .entries()
        .iter()
        .filter(|e| matches!(e.label, bioscout_pipeline::RowLabel::Biologist(_)))
        .take(list_size)
    {
        info!("  {:.4}  {}", entry.score, entry.label);
    }

    info!("Recommended reading list:");
    for (index, item) in report.reading_list.iter().enumerate() {
        match &item.record {
            Some(record) => info!("{}", record.citation_line(index + 1)),
            None => info!("{}. (no record available) ({})", index + 1, item.id),
        }
    }

    Ok(())
}
