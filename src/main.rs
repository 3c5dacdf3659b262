use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use bizmap::analysis::{parse_price_tier, run_analysis, Analysis, AnalysisRequest};
use bizmap::config::{Config, SearchDefaults};
use bizmap::error::{ProviderError, RequestError};
use bizmap::intent::{advance, ConversationContext, Reply};
use bizmap::provider::{cache, LookupCache, Provider};
use bizmap::scoring::{calculate_score, count_from_f64, LocationMetrics, ScoringConfig};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_PROVIDER: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ScoreFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Business type, e.g. "coffee shop"
    #[arg(short, long)]
    business: String,

    /// Area to search, e.g. "Providence, RI"
    #[arg(short, long)]
    location: String,

    /// Search radius: 0.5 mile, 1 mile or 3 miles
    #[arg(long)]
    radius: Option<String>,

    /// Price positioning: budget, mid or premium
    #[arg(long)]
    price_tier: Option<String>,

    /// Operating hours: day, evening or both
    #[arg(long)]
    daypart: Option<String>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Read a metrics record as JSON from FILE, or stdin with "-"
    #[arg(long, value_name = "FILE", conflicts_with_all = [
        "population", "median_income", "competitors", "foot_traffic",
        "vacancy", "nearest_miles", "category_fit", "price_tier", "measured_traffic",
    ])]
    input: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    population: Option<f64>,

    #[arg(long)]
    median_income: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    competitors: Option<f64>,

    /// Foot traffic index, nominally 0-100
    #[arg(long)]
    foot_traffic: Option<f64>,

    /// Vacancy index, nominally 0-100
    #[arg(long)]
    vacancy: Option<f64>,

    /// Miles to the nearest competitor
    #[arg(long)]
    nearest_miles: Option<f64>,

    /// Category fit, nominally 0-1
    #[arg(long)]
    category_fit: Option<f64>,

    #[arg(long)]
    price_tier: Option<String>,

    /// Treat the foot traffic figure as measured rather than a placeholder
    #[arg(long)]
    measured_traffic: bool,

    #[arg(long, value_enum, default_value_t)]
    format: ScoreFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidate locations for a business around an area
    Analyze {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Score a single metrics record
    Score(ScoreArgs),
    /// Describe your business in conversation, then analyze
    Chat,
    /// Open a ranked candidate in the map view
    Open {
        /// Rank of the candidate to open (1-based, as shown by analyze)
        rank: usize,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "bizmap")]
#[command(about = "Business location opportunity scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bizmap/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Bypass the lookup cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Delete cached lookups before running
    #[arg(long, global = true)]
    clear_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Exit code for an error: typed causes anywhere in the chain win over the
/// command's fallback.
fn exit_code_for(err: &anyhow::Error, fallback: i32) -> i32 {
    for cause in err.chain() {
        if cause.is::<RequestError>() {
            return EXIT_INPUT;
        }
        if cause.is::<ProviderError>() || cause.is::<reqwest::Error>() {
            return EXIT_PROVIDER;
        }
    }
    fallback
}

fn build_request(
    search: &SearchArgs,
    defaults: &SearchDefaults,
) -> Result<AnalysisRequest, RequestError> {
    let mut request = AnalysisRequest::new(&search.business, &search.location);
    request.radius = match &search.radius {
        Some(r) => r.parse()?,
        None => defaults.radius,
    };
    request.price_tier = match &search.price_tier {
        Some(t) => parse_price_tier(t)?,
        None => defaults.price_tier,
    };
    request.daypart = match &search.daypart {
        Some(d) => d.parse()?,
        None => defaults.daypart,
    };
    request.validate()?;
    Ok(request)
}

fn build_provider(config: &Config, no_cache: bool) -> Result<Provider> {
    let cache = if no_cache {
        LookupCache::disabled()
    } else {
        LookupCache::new(cache::get_cache_path(), config.provider.parse_cache_ttl()?)
    };
    Ok(Provider::from_config(&config.provider, cache)?)
}

fn print_analysis(analysis: &Analysis, verbose: bool) {
    let use_colors = bizmap::output::should_use_colors();
    println!(
        "{}",
        bizmap::output::format_analysis_header(analysis, use_colors)
    );
    println!();

    if verbose {
        for ranked in &analysis.locations {
            println!(
                "{}",
                bizmap::output::format_location_detail(ranked, use_colors)
            );
            println!();
        }
    } else {
        println!(
            "{}",
            bizmap::output::format_ranked_table(&analysis.locations, use_colors)
        );
    }
}

async fn cmd_analyze(
    provider: &Provider,
    scoring: &ScoringConfig,
    request: &AnalysisRequest,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let analysis = run_analysis(provider, request, scoring).await?;

    if verbose {
        eprintln!(
            "Surveyed {} candidates in {:?}",
            analysis.locations.len(),
            start_time.elapsed()
        );
    }

    match format {
        OutputFormat::Table => print_analysis(&analysis, verbose),
        OutputFormat::Tsv => {
            let tsv = bizmap::output::format_tsv(&analysis.locations);
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&analysis)
                .context("Failed to serialize analysis")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn read_metrics(args: &ScoreArgs) -> Result<LocationMetrics> {
    if let Some(path) = &args.input {
        let content = if path.as_os_str() == "-" {
            std::io::read_to_string(std::io::stdin()).context("Failed to read metrics from stdin")?
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read metrics from {}", path.display()))?
        };
        return serde_json::from_str(&content).context("Invalid metrics JSON");
    }

    let price_tier = match &args.price_tier {
        Some(t) => parse_price_tier(t)?,
        None => Default::default(),
    };
    Ok(LocationMetrics {
        competitor_count: args
            .competitors
            .map(|c| u32::try_from(count_from_f64(c)).unwrap_or(u32::MAX))
            .unwrap_or(0),
        population: args.population.map(count_from_f64).unwrap_or(0),
        median_income: args.median_income.unwrap_or(0.0),
        foot_traffic_index: args.foot_traffic,
        vacancy_index: args.vacancy,
        nearest_competitor_miles: args.nearest_miles,
        category_fit: args.category_fit,
        price_tier,
        foot_traffic_is_default: !args.measured_traffic,
    })
}

fn cmd_score(args: &ScoreArgs, scoring: &ScoringConfig) -> Result<()> {
    let metrics = read_metrics(args)?;
    let result = calculate_score(&metrics, scoring);

    match args.format {
        ScoreFormat::Table => println!("{}", bizmap::output::format_score_result(&result)),
        ScoreFormat::Json => {
            let json =
                serde_json::to_string_pretty(&result).context("Failed to serialize score")?;
            println!("{}", json);
        }
    }
    Ok(())
}

async fn cmd_chat(
    provider: &Provider,
    scoring: &ScoringConfig,
    defaults: &SearchDefaults,
    verbose: bool,
) -> Result<()> {
    println!("Tell me about the business you want to open. Type 'quit' to leave.");
    let mut context = ConversationContext::default();
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read input")?
            == 0
        {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        let turn = advance(&context, line);
        context = turn.context;
        match turn.reply {
            Reply::Ask(question) => println!("{}", question),
            Reply::Analyze(mut request) => {
                request.radius = defaults.radius;
                if context.budget.is_none() {
                    request.price_tier = defaults.price_tier;
                }
                if context.hours.is_none() {
                    request.daypart = defaults.daypart;
                }
                println!();
                let analysis = run_analysis(provider, &request, scoring).await?;
                print_analysis(&analysis, verbose);
                break;
            }
        }
    }
    Ok(())
}

async fn cmd_open(
    provider: &Provider,
    scoring: &ScoringConfig,
    request: &AnalysisRequest,
    rank: usize,
) -> Result<()> {
    let analysis = run_analysis(provider, request, scoring).await?;
    let ranked = analysis.at_rank(rank)?;
    let url = bizmap::browser::maps_url(&ranked.item.coordinates);
    bizmap::browser::open_url(&url)?;
    println!(
        "Opening #{} {} ({}%) in browser: {}",
        ranked.rank, ranked.item.name, ranked.score, url
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_PROVIDER);
    }

    let cli = Cli::parse();
    bizmap::logging::init_tracing(cli.verbose);

    if let Commands::Init = cli.command {
        if let Err(e) = bizmap::config::run_init_wizard(cli.config) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match bizmap::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = bizmap::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.clear_cache {
        let cache_path = cache::get_cache_path();
        match cache::clear_cache(&cache_path) {
            Ok(()) => tracing::info!(path = %cache_path.display(), "lookup cache cleared"),
            Err(e) => eprintln!("Warning: {:#}", e),
        }
    }

    // Score needs no provider
    if let Commands::Score(args) = &cli.command {
        let code = match cmd_score(args, &scoring) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                exit_code_for(&e, EXIT_INPUT)
            }
        };
        std::process::exit(code);
    }

    let provider = match build_provider(&config, cli.no_cache) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Provider error: {:#}", e);
            std::process::exit(exit_code_for(&e, EXIT_CONFIG));
        }
    };

    if cli.verbose {
        eprintln!(
            "Provider: {:?}, cache: {}",
            provider.kind(),
            if cli.no_cache {
                "disabled (--no-cache)"
            } else {
                "enabled"
            }
        );
    }

    let result = match &cli.command {
        Commands::Analyze { search, format } => match build_request(search, &config.defaults) {
            Ok(request) => cmd_analyze(&provider, &scoring, &request, *format, cli.verbose).await,
            Err(e) => Err(e.into()),
        },
        Commands::Open { rank, search } => match build_request(search, &config.defaults) {
            Ok(request) => cmd_open(&provider, &scoring, &request, *rank).await,
            Err(e) => Err(e.into()),
        },
        Commands::Chat => cmd_chat(&provider, &scoring, &config.defaults, cli.verbose).await,
        Commands::Score(_) | Commands::Init => Ok(()),
    };

    let code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e, EXIT_PROVIDER)
        }
    };
    std::process::exit(code);
}
