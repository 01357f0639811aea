//! Football match-report scraper CLI
//!
//! Fetches match reports (or reads saved HTML) and prints the normalized records.

use clap::{Parser, Subcommand};
use football::{Config, Result};

#[derive(Parser)]
#[command(name = "football")]
#[command(about = "Football match-report scraping and normalization", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// List match-report links for a date
    Links {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Fetch and scrape match reports
    Scrape {
        /// Match-report URLs
        urls: Vec<String>,
        /// Also scrape every match report listed for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Only output this entity type
        #[arg(long)]
        entity: Option<String>,
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Scrape saved match-report HTML files
    Parse {
        /// HTML files
        files: Vec<String>,
        /// Only output this entity type
        #[arg(long)]
        entity: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Print the normalization rules as TOML
    Rules {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Links { date, format } => commands::links(&config, &date, format),
        Commands::Scrape {
            urls,
            date,
            entity,
            cache,
            offline,
            format,
        } => commands::scrape(&config, urls, date, entity, cache, offline, format),
        Commands::Parse {
            files,
            entity,
            format,
        } => commands::parse(&config, &files, entity, format),
        Commands::Rules { output } => commands::rules(&config, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use football::data::{FileFetcher, HttpFetcher};
    use football::normalize::NormalizationRegistry;
    use football::pipeline::{self, MatchReport};
    use football::{CanonicalRecord, EntityType, ScrapeError};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'football links 2023-08-11' to list match reports");
        println!("  3. Run 'football scrape --date 2023-08-11' to scrape them");
        println!("  4. Run 'football rules' to see the normalization rules");

        Ok(())
    }

    /// Standard rules plus the configured overlay, if any
    fn registry(config: &Config) -> Result<NormalizationRegistry> {
        let registry = NormalizationRegistry::standard();
        match &config.scrape.rules_file {
            Some(path) => {
                log::info!("Loading rule overrides from {}", path);
                registry.load_overrides(path)
            }
            None => Ok(registry),
        }
    }

    fn entity_filter(entity: Option<String>) -> Result<Option<EntityType>> {
        entity
            .map(|name| {
                EntityType::from_name(&name).ok_or_else(|| {
                    let known: Vec<_> = EntityType::ALL.iter().map(|e| e.name()).collect();
                    ScrapeError::Config(format!(
                        "Unknown entity: {}. Use one of {}.",
                        name,
                        known.join(", ")
                    ))
                })
            })
            .transpose()
    }

    pub fn links(config: &Config, date: &str, format: OutputFormat) -> Result<()> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let links = pipeline::report_links(&fetcher, &config.fetch, date)?;

        match format {
            OutputFormat::Table => {
                for (competition, urls) in &links {
                    println!("{} ({} matches)", competition, urls.len());
                    for url in urls {
                        println!("  {}", url);
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
            OutputFormat::Csv => {
                println!("competition,url");
                for (competition, urls) in &links {
                    for url in urls {
                        println!("{},{}", csv_field(competition), csv_field(url));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn scrape(
        config: &Config,
        mut urls: Vec<String>,
        date: Option<String>,
        entity: Option<String>,
        cache: Option<String>,
        offline: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let entity = entity_filter(entity)?;
        let registry = registry(config)?;

        let mut fetcher = HttpFetcher::new(&config.fetch)?;
        if let Some(cache_dir) = cache {
            log::info!("Using cache directory: {}", cache_dir);
            fetcher = fetcher.with_cache(&cache_dir);
        }
        if offline {
            log::info!("Offline mode: using cached files only");
            fetcher = fetcher.offline(true);
        }

        if let Some(date) = date {
            let links = pipeline::report_links(&fetcher, &config.fetch, &date)?;
            urls.extend(links.into_values().flatten());
        }
        if urls.is_empty() {
            return Err(ScrapeError::Config(
                "No match reports to scrape. Pass URLs or --date.".to_string(),
            ));
        }

        let (pages, failures) = pipeline::fetch_pages(&fetcher, &urls);
        let reports = pipeline::scrape_batch(&pages, &registry, config.scrape.workers);
        print_reports(&reports, entity, &format)?;

        if !failures.is_empty() {
            eprintln!("{} of {} pages could not be fetched:", failures.len(), urls.len());
            for (url, e) in &failures {
                eprintln!("  {}: {}", url, e);
            }
        }

        Ok(())
    }

    pub fn parse(
        config: &Config,
        files: &[String],
        entity: Option<String>,
        format: OutputFormat,
    ) -> Result<()> {
        let entity = entity_filter(entity)?;
        let registry = registry(config)?;

        let (pages, failures) = pipeline::fetch_pages(&FileFetcher, files);
        let reports = pipeline::scrape_batch(&pages, &registry, config.scrape.workers);
        print_reports(&reports, entity, &format)?;

        for (file, e) in &failures {
            eprintln!("Skipped {}: {}", file, e);
        }

        Ok(())
    }

    pub fn rules(config: &Config, output: Option<String>) -> Result<()> {
        let text = registry(config)?.to_toml()?;
        match output {
            Some(path) => {
                std::fs::write(&path, text)?;
                println!("Rules written to {}", path);
            }
            None => print!("{}", text),
        }
        Ok(())
    }

    fn print_reports(
        reports: &[MatchReport],
        entity: Option<EntityType>,
        format: &OutputFormat,
    ) -> Result<()> {
        let entities: Vec<EntityType> = match entity {
            Some(e) => vec![e],
            None => EntityType::ALL.to_vec(),
        };

        match format {
            OutputFormat::Table => {
                for report in reports {
                    print!("{}", format_report(report, &entities, entity.is_some()));
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reports)?),
            OutputFormat::Csv => {
                for (i, entity) in entities.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    let schema = entity.schema();
                    println!("match_id,variant,complete,missing,reason,{}", schema.join(","));
                    for record in reports
                        .iter()
                        .filter_map(|r| r.composite.as_ref())
                        .flat_map(|c| c.records_of(*entity))
                    {
                        println!("{}", csv_row(record));
                    }
                }
            }
        }

        Ok(())
    }

    fn format_report(report: &MatchReport, entities: &[EntityType], detailed: bool) -> String {
        let mut out = String::new();
        let Some(composite) = &report.composite else {
            out.push_str(&format!("{}: no match id, nothing extracted\n\n", report.url));
            return out;
        };

        out.push_str(&format!("Match {}  {}\n", composite.match_id.0, report.url));
        out.push_str("───────────────────────────────────────────────\n");
        for entity in entities {
            let records = composite.records_of(*entity);
            let incomplete = records.iter().filter(|r| !r.complete()).count();
            let variant = report
                .variants
                .get(entity)
                .map(|v| v.name())
                .unwrap_or("-");
            out.push_str(&format!(
                "  {:<14} {:<15} {:>4} records  {:>3} incomplete\n",
                entity.name(),
                variant,
                records.len(),
                incomplete
            ));

            if detailed {
                for record in records {
                    out.push_str(&format!("    {}\n", format_record(record)));
                }
            }
        }
        for diagnostic in &report.diagnostics {
            out.push_str(&format!("  ! {}\n", diagnostic));
        }
        for warning in &composite.warnings {
            out.push_str(&format!("  ? {}\n", warning));
        }
        out.push('\n');
        out
    }

    fn format_record(record: &CanonicalRecord) -> String {
        let mut parts: Vec<String> = record
            .fields()
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        if let Some(reason) = record.reason() {
            parts.push(format!("[{}]", reason));
        } else if !record.complete() {
            parts.push(format!("[missing: {}]", record.missing().join(" ")));
        }
        parts.join("  ")
    }

    fn csv_row(record: &CanonicalRecord) -> String {
        let mut cells = vec![
            record.match_id().0.clone(),
            record.variant().name().to_string(),
            record.complete().to_string(),
            record.missing().join(" "),
            record.reason().map(|r| r.to_string()).unwrap_or_default(),
        ];
        cells.extend(
            record
                .fields()
                .iter()
                .map(|(_, value)| value.as_ref().map(|v| v.to_string()).unwrap_or_default()),
        );
        cells
            .iter()
            .map(|c| csv_field(c))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn csv_field(value: &str) -> String {
        if value.contains([',', '"', '\n']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}
