mod cli;

use chrono::Duration;
use clap::Parser;
use cli::{Args, CacheCommand, Command};
use owo_colors::OwoColorize;
use scope_graph::adapters::outbound::cache::{TtlCache, DEFAULT_TTL_HOURS};
use scope_graph::adapters::outbound::clock::SystemClock;
use scope_graph::adapters::outbound::console::StderrProgressReporter;
use scope_graph::adapters::outbound::network::{
    CachingPackageRegistry, NpmRegistryClient, DEFAULT_DOWNLOADS_URL, DEFAULT_REGISTRY_URL,
};
use scope_graph::adapters::outbound::storage::{FileKeyValueStore, MemoryKeyValueStore};
use scope_graph::application::dto::{GraphRequest, OutputFormat, TrendsRequest, DEFAULT_DAYS};
use scope_graph::application::factories::{FormatterFactory, PresenterFactory};
use scope_graph::application::use_cases::{
    BuildDependencyGraphUseCase, BuildDownloadTrendsUseCase,
};
use scope_graph::config::{self, ConfigFile};
use scope_graph::dependency_graph::domain::Scope;
use scope_graph::ports::outbound::KeyValueStore;
use scope_graph::shared::error::{ExitCode, ScopeGraphError};
use scope_graph::shared::Result;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Scope inspected when neither the CLI nor the config names one
const DEFAULT_SCOPE: &str = "@wxn0brp";

/// Concurrent registry requests when none is configured
const DEFAULT_MAX_CONCURRENCY: usize = 10;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
        eprintln!("{}", e);

        for cause in e.chain().skip(1) {
            eprintln!("\n{} {}", "Caused by:".yellow(), cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

/// 0 = warn, 1 = info, 2+ = debug; RUST_LOG wins when set
fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "scope_graph=warn",
        1 => "scope_graph=info",
        _ => "scope_graph=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Effective settings after merging CLI flags, config file and defaults
#[derive(Debug)]
struct Settings {
    scope: Scope,
    max_concurrency: usize,
    cache_ttl: Duration,
    cache_dir: Option<PathBuf>,
    registry_url: String,
    downloads_url: String,
    config: ConfigFile,
}

impl Settings {
    fn resolve(args: &Args, config: ConfigFile) -> Result<Self> {
        let scope_name = args
            .scope
            .clone()
            .or_else(|| config.scope.clone())
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        let scope = Scope::new(&scope_name).map_err(|e| ScopeGraphError::InvalidConfig {
            message: format!("scope '{}': {}", scope_name, e),
            hint: "Use an npm scope such as \"@wxn0brp\".".to_string(),
        })?;

        let max_concurrency = args
            .max_concurrency
            .map(|n| n as usize)
            .or(config.max_concurrency)
            .unwrap_or(DEFAULT_MAX_CONCURRENCY);

        Ok(Self {
            scope,
            max_concurrency,
            cache_ttl: Duration::hours(config.cache_ttl_hours.unwrap_or(DEFAULT_TTL_HOURS)),
            cache_dir: config.cache_dir.clone(),
            registry_url: config
                .registry_url
                .clone()
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            downloads_url: config
                .downloads_url
                .clone()
                .unwrap_or_else(|| DEFAULT_DOWNLOADS_URL.to_string()),
            config,
        })
    }

    /// CLI format, then config format, then JSON
    fn format(&self, cli_format: Option<OutputFormat>) -> Result<OutputFormat> {
        if let Some(format) = cli_format {
            return Ok(format);
        }
        match self.config.format.as_deref() {
            Some(format) => OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e)),
            None => Ok(OutputFormat::Json),
        }
    }

    fn cache_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.join("scope-graph").join("cache.json"));
        }
        FileKeyValueStore::default_path().ok_or_else(|| {
            ScopeGraphError::InvalidConfig {
                message: "no user cache directory is available on this platform".to_string(),
                hint: "Set cache_dir in scope-graph.config.yml or pass --no-cache".to_string(),
            }
            .into()
        })
    }
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => config::load_config_from_path(path),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(config::discover_config(&cwd)?.unwrap_or_default())
        }
    }
}

fn open_store(settings: &Settings, no_cache: bool) -> Result<Arc<dyn KeyValueStore>> {
    if no_cache {
        debug!("cache bypassed, using an in-memory store");
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }
    let path = settings.cache_path()?;
    debug!(path = %path.display(), "opening cache");
    Ok(Arc::new(FileKeyValueStore::open(path)?))
}

fn build_registry(
    settings: &Settings,
    no_cache: bool,
) -> Result<CachingPackageRegistry<NpmRegistryClient>> {
    let client = NpmRegistryClient::with_urls(&settings.registry_url, &settings.downloads_url)?;
    let cache = TtlCache::new(open_store(settings, no_cache)?, Arc::new(SystemClock::new()))
        .with_ttl(settings.cache_ttl);
    if let Err(e) = cache.purge_expired() {
        warn!(error = %e, "failed to purge expired cache entries");
    }
    Ok(CachingPackageRegistry::new(client, cache))
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let settings = Settings::resolve(&args, config)?;
    let presenter = PresenterFactory::create(PresenterFactory::for_output(args.output.clone()));

    match &args.command {
        Command::Graph { format } => {
            let format = settings.format(*format)?;
            let formatter = FormatterFactory::create_graph_formatter(format);

            let use_case = BuildDependencyGraphUseCase::new(
                build_registry(&settings, args.no_cache)?,
                StderrProgressReporter::new(),
            );
            let request = GraphRequest::new(settings.scope.clone(), settings.max_concurrency);
            let response = use_case.execute(request).await?;

            eprintln!("{}", FormatterFactory::progress_message(format));
            presenter.present(&formatter.format_graph(&response.graph)?)?;
        }
        Command::Downloads {
            format,
            days,
            select,
        } => {
            let format = settings.format(*format)?;
            // Fail on an unsupported format before any request is made
            let formatter = FormatterFactory::create_trends_formatter(format)?;

            let selected = if select.is_empty() {
                settings.config.selected_packages.clone().unwrap_or_default()
            } else {
                select.clone()
            };
            let days = days.or(settings.config.days).unwrap_or(DEFAULT_DAYS);

            let use_case = BuildDownloadTrendsUseCase::new(
                build_registry(&settings, args.no_cache)?,
                StderrProgressReporter::new(),
                SystemClock::new(),
            );
            let request = TrendsRequest::new(
                settings.scope.clone(),
                days,
                settings.max_concurrency,
                selected,
            );
            let response = use_case.execute(request).await?;

            eprintln!("{}", FormatterFactory::progress_message(format));
            presenter.present(&formatter.format_trends(&response.trends)?)?;
        }
        Command::Cache {
            action: CacheCommand::Clear,
        } => {
            let path = settings.cache_path()?;
            let store = FileKeyValueStore::open(path.clone())?;
            let cache = TtlCache::new(Arc::new(store), Arc::new(SystemClock::new()));
            let removed = cache.clear_all()?;
            eprintln!(
                "🧹 Removed {} cached entr{} from {}",
                removed,
                if removed == 1 { "y" } else { "ies" },
                path.display()
            );
        }
    }

    Ok(())
}
