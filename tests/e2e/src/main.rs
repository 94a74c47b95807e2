//! End-to-end runner for the mapper crate

use anyhow::Result;
use clap::Parser;
use mapper::{MapperConfig, MapperFactory, MapperRegistry, ServiceScope};
use mapper_e2e_tests::{run_all, run_scenario, TaxRate};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run (catalog, orders, customers, all)
    #[arg(short, long, default_value = "all")]
    scenario: String,

    /// Mapper configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tax rate made available to scope-dependent mappers
    #[arg(long, default_value_t = 19)]
    tax_percent: i64,

    /// Leave the tax service out of the scope
    #[arg(long)]
    no_tax: bool,

    /// Output results to file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("mapper={}", log_level).parse()?)
                .add_directive(format!("mapper_e2e_tests={}", log_level).parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => MapperConfig::from_file(path)?,
        None => MapperConfig::from_env()?,
    };

    let scope = ServiceScope::new("e2e");
    if !args.no_tax {
        scope.insert(TaxRate {
            percent: args.tax_percent,
        });
    }

    let factory = MapperFactory::with_config(MapperRegistry::global(), scope, &config);
    info!(factory = factory.name(), scenario = %args.scenario, "Starting mapper E2E run");

    let reports = if args.scenario == "all" {
        run_all(&factory).await?
    } else {
        vec![run_scenario(&factory, &args.scenario).await?]
    };

    let summary = serde_json::json!({
        "factory": factory.name(),
        "registry": {
            "pairs": factory.registry().pair_count(),
            "descriptors": factory.registry().descriptor_count(),
        },
        "stats": {
            "resolutions": factory.stats().resolutions,
            "composites": factory.stats().composites,
            "fallbacks": factory.stats().fallbacks,
            "materialization_failures": factory.stats().materialization_failures,
        },
        "scenarios": reports,
    });
    let rendered = serde_json::to_string_pretty(&summary)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(path = %path.display(), "Wrote results");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
