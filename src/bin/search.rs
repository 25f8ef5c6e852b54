use std::path::PathBuf;

use anyhow::Context;
use astro_search::position::{DmsFmt, HmsFmt};
use astro_search::query::{angular_separation_deg, execute_cone_query, SourceCatalog};
use astro_search::{
    search_objects, ConeQuery, ConeSearchRequest, SearchError, Settings, SourceRecord, SourceTable,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "astro-search")]
#[command(about = "Browse and search an astronomical sources table")]
#[command(version)]
struct Cli {
    /// JSON export of the Sources table (defaults to ASTRO_WEB_DATABASE_URL)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print table information
    Info,
    /// List rows of the Sources table
    Browse {
        /// Number of rows to show
        #[arg(long, default_value = "10", conflicts_with = "all")]
        limit: usize,
        /// Show every row
        #[arg(long)]
        all: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Search for objects by name
    Name {
        query: String,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Print query timing
        #[arg(long)]
        timing: bool,
    },
    /// Perform a cone search
    Cone {
        /// Combined coordinates, e.g. "13h57m12s +14d28m39s" or "209.30 14.48"
        #[arg(conflicts_with_all = ["ra", "dec"], required_unless_present_all = ["ra", "dec"])]
        coordinates: Option<String>,
        /// Right ascension (degrees, or sexagesimal e.g. 13h57m12s)
        #[arg(long, allow_hyphen_values = true, requires = "dec")]
        ra: Option<String>,
        /// Declination (degrees, or sexagesimal e.g. -5d22m30s)
        #[arg(long, allow_hyphen_values = true, requires = "ra")]
        dec: Option<String>,
        /// Search radius
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        radius: String,
        /// Radius unit: degrees, arcminutes or arcseconds
        #[arg(long, default_value = "degrees")]
        unit: String,
        /// Maximum number of results (never more than 10000)
        #[arg(long)]
        limit: Option<usize>,
        /// Print query timing
        #[arg(long)]
        timing: bool,
        /// Output decimal degrees instead of HMS/DMS
        #[arg(long)]
        raw: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::from_env();
    let catalog = open_catalog(cli.catalog.as_ref(), &settings)?;

    match cli.command {
        Commands::Info => {
            println!("{}", catalog.summary());
            println!("Source URL base: {}", settings.source_url_base);
            println!("Source URL column: {}", settings.source_column);
        }
        Commands::Browse { limit, all, format } => {
            let rows = catalog.sources(if all { None } else { Some(limit) })?;
            print_records(&rows, None, &format, &settings, false);
        }
        Commands::Name {
            query,
            format,
            timing,
        } => {
            let outcome = search_objects(&catalog, &query).map_err(user_error)?;
            if timing {
                eprintln!(
                    "Query completed in {:.2} ms",
                    outcome.elapsed.as_secs_f64() * 1000.0
                );
            }
            print_records(&outcome.records, None, &format, &settings, false);
        }
        Commands::Cone {
            coordinates,
            ra,
            dec,
            radius,
            unit,
            limit,
            timing,
            raw,
            format,
        } => {
            let request = match (coordinates, ra, dec) {
                (Some(text), _, _) => ConeSearchRequest::combined(text, radius, unit),
                (None, Some(ra), Some(dec)) => ConeSearchRequest::split(ra, dec, radius, unit),
                _ => anyhow::bail!("Give either combined coordinates or both --ra and --dec"),
            };

            let query = request.validate().map_err(|e| user_error(e.into()))?;
            let outcome =
                execute_cone_query(&catalog, query, limit.unwrap_or(usize::MAX)).map_err(user_error)?;

            if timing {
                eprintln!(
                    "Query completed in {:.2} ms",
                    outcome.elapsed.as_secs_f64() * 1000.0
                );
            }

            print_records(
                &outcome.results.records,
                Some(&outcome.query),
                &format,
                &settings,
                raw,
            );

            if outcome.results.truncated {
                eprintln!(
                    "Results limited to {} of {} matches.",
                    outcome.results.len(),
                    outcome.results.total
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_catalog(explicit: Option<&PathBuf>, settings: &Settings) -> anyhow::Result<SourceTable> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => settings.database_path().with_context(|| {
            format!(
                "{} is not a local file; pass --catalog",
                settings.database_url
            )
        })?,
    };

    SourceTable::open(&path).with_context(|| format!("Cannot load sources from {:?}", path))
}

/// Input errors are shown as-is; engine errors keep their chain.
fn user_error(err: SearchError) -> anyhow::Error {
    match err {
        SearchError::InvalidInput(e) => anyhow::anyhow!("Invalid input: {}", e),
        other => anyhow::Error::new(other),
    }
}

fn print_records(
    records: &[SourceRecord],
    query: Option<&ConeQuery>,
    format: &OutputFormat,
    settings: &Settings,
    raw: bool,
) {
    match format {
        OutputFormat::Table => print_table(records, query, settings, raw),
        OutputFormat::Json => print_json(records, query, settings),
        OutputFormat::Csv => print_csv(records, query),
    }
}

fn distance_from(query: Option<&ConeQuery>, record: &SourceRecord) -> Option<f64> {
    let q = query?;
    Some(angular_separation_deg(
        q.center.ra_degrees(),
        q.center.dec_degrees(),
        record.ra?,
        record.dec?,
    ))
}

fn print_table(records: &[SourceRecord], query: Option<&ConeQuery>, settings: &Settings, raw: bool) {
    let hms = HmsFmt { frac_digits: 2 };
    let dms = DmsFmt { frac_digits: 1 };

    for (i, record) in records.iter().enumerate() {
        let position = match (record.ra, record.dec) {
            (Some(ra), Some(dec)) if raw => format!("RA={:.6}° Dec={:+.6}°", ra, dec),
            (Some(ra), Some(dec)) => format!("RA={} Dec={}", hms.fmt(ra), dms.fmt(dec)),
            _ => "RA=-- Dec=--".to_string(),
        };
        let distance = distance_from(query, record)
            .map(|d| format!(" Dist={:.2}\"", d * 3600.0))
            .unwrap_or_default();

        println!(
            "{:4}: {:<32} {}{} {}",
            i + 1,
            record.source,
            position,
            distance,
            settings.record_url(record).unwrap_or_default()
        );
    }

    if records.is_empty() {
        println!("No sources found matching the search criteria.");
    } else {
        println!("\nTotal results: {}", records.len());
    }
}

#[derive(serde::Serialize)]
struct JsonSource<'a> {
    #[serde(flatten)]
    record: &'a SourceRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_deg: Option<f64>,
}

fn print_json(records: &[SourceRecord], query: Option<&ConeQuery>, settings: &Settings) {
    let rows: Vec<JsonSource<'_>> = records
        .iter()
        .map(|record| JsonSource {
            record,
            url: settings.record_url(record),
            distance_deg: distance_from(query, record),
        })
        .collect();

    match serde_json::to_string_pretty(&rows) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode results as JSON: {}", e),
    }
}

fn print_csv(records: &[SourceRecord], query: Option<&ConeQuery>) {
    println!("source,ra_deg,dec_deg,distance_deg");
    for record in records {
        let field = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        println!(
            "\"{}\",{},{},{}",
            record.source.replace('"', "\"\""),
            field(record.ra),
            field(record.dec),
            field(distance_from(query, record))
        );
    }
}
