use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Once;

use clap::{Args, Parser, Subcommand};
use contracts::{
    CacheStatus, ComparisonRequest, CpuThrottle, DeviceType, NetworkCondition, ScenarioConfig,
};
use perf_api::{config::parse_bind_addr, serve, PerformanceApi, ServiceConfig};
use perf_core::{simulate_raw, SolutionCatalog};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("PERF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    });
}

#[derive(Debug, Parser)]
#[command(name = "perf-cli", about = "Web performance optimization comparison tool")]
struct Cli {
    /// TOML solution catalog; the builtin table is used when omitted.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate the metrics of one solution under one scenario.
    Simulate {
        solution_id: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Compare a solution against the baseline.
    Compare {
        solution_id: String,
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Serve precomputed rows from this metrics store when present.
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },
    /// List the optimization solutions.
    Solutions,
    /// Recompute every metrics row and reseed the store.
    Init {
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },
    /// Run the HTTP API.
    Serve {
        #[arg(long)]
        addr: Option<String>,
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    #[arg(long, default_value_t = NetworkCondition::FourG.as_str().to_string())]
    network: String,
    #[arg(long = "cpu", default_value_t = CpuThrottle::None.as_str().to_string())]
    cpu_throttle: String,
    #[arg(long = "device", default_value_t = DeviceType::MidRange.as_str().to_string())]
    device_type: String,
    #[arg(long = "cache", default_value_t = CacheStatus::FirstLoad.as_str().to_string())]
    cache_status: String,
}

impl ScenarioArgs {
    fn parse(&self) -> Result<ScenarioConfig, String> {
        ScenarioConfig::parse(
            &self.network,
            &self.cpu_throttle,
            &self.device_type,
            &self.cache_status,
        )
        .map_err(|err| err.to_string())
    }
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to render json: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn load_config(catalog: Option<PathBuf>) -> Result<ServiceConfig, String> {
    let mut config = ServiceConfig::from_env().map_err(|err| err.to_string())?;
    if catalog.is_some() {
        config.catalog_path = catalog;
    }
    Ok(config)
}

fn load_catalog(config: &ServiceConfig) -> Result<SolutionCatalog, String> {
    config
        .load_catalog()
        .map_err(|err| format!("failed to load catalog: {err}"))
}

fn run_simulate(
    catalog: &SolutionCatalog,
    solution_id: &str,
    scenario: &ScenarioArgs,
) -> Result<(), String> {
    if !catalog.contains(solution_id) {
        warn!(solution_id, "unknown solution, simulating with neutral factors");
    }
    let metrics = simulate_raw(
        catalog,
        solution_id,
        &scenario.network,
        &scenario.cpu_throttle,
        &scenario.device_type,
        &scenario.cache_status,
    )
    .map_err(|err| err.to_string())?;
    print_json(&metrics)
}

fn run_compare(
    catalog: SolutionCatalog,
    solution_id: String,
    scenario: &ScenarioArgs,
    sqlite: Option<PathBuf>,
) -> Result<(), String> {
    let scenario = scenario.parse()?;
    let mut api = PerformanceApi::new(catalog);
    if let Some(path) = sqlite {
        api.attach_sqlite_store(&path)
            .map_err(|err| format!("failed to attach sqlite store: {err}"))?;
    }

    let outcome = api
        .compare(&ComparisonRequest::new(solution_id, scenario))
        .map_err(|err| err.to_string())?;
    info!(source = outcome.source.as_str(), %scenario, "comparison ready");
    print_json(&outcome.comparison)?;
    api.detach_store().map_err(|err| err.to_string())
}

fn run_init(catalog: SolutionCatalog, sqlite_path: PathBuf) -> Result<(), String> {
    let mut api = PerformanceApi::new(catalog);
    api.attach_sqlite_store(&sqlite_path)
        .map_err(|err| format!("failed to attach sqlite store: {err}"))?;
    let summary = api
        .initialize_storage()
        .map_err(|err| format!("failed to initialize storage: {err}"))?;
    print_json(&summary)?;
    api.detach_store().map_err(|err| err.to_string())
}

async fn run_serve(
    catalog: SolutionCatalog,
    addr: SocketAddr,
    sqlite_path: PathBuf,
) -> Result<(), String> {
    let mut api = PerformanceApi::new(catalog);
    if let Err(err) = api.attach_sqlite_store(&sqlite_path) {
        warn!(path = %sqlite_path.display(), error = %err, "serving without metrics store");
    }
    println!("serving api on http://{addr}");
    serve(addr, api)
        .await
        .map_err(|err| format!("server error: {err}"))
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(cli.catalog)?;
    let catalog = load_catalog(&config)?;

    match cli.command {
        Command::Simulate {
            solution_id,
            scenario,
        } => run_simulate(&catalog, &solution_id, &scenario),
        Command::Compare {
            solution_id,
            scenario,
            sqlite,
        } => run_compare(catalog, solution_id, &scenario, sqlite),
        Command::Solutions => print_json(&catalog.optimizations().collect::<Vec<_>>()),
        Command::Init { sqlite } => run_init(catalog, sqlite.unwrap_or(config.sqlite_path)),
        Command::Serve { addr, sqlite } => {
            let addr = match addr {
                Some(raw) => parse_bind_addr(&raw).map_err(|err| err.to_string())?,
                None => config.bind_addr,
            };
            run_serve(catalog, addr, sqlite.unwrap_or(config.sqlite_path)).await
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(2);
    }
}
