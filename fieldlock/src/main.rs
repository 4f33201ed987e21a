use anyhow::Context;
use fieldlock::config::Config;
use fieldlock::experiment::{DriverConfig, ExperimentDriver, ScenarioWorkloads};
use fieldlock::record::SharedRecord;
use fieldlock::workload::{Scenario, WorkloadGenerator};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scenario list from the configured JSON file, or the built-in scenarios
fn load_scenarios(config: &Config) -> anyhow::Result<Vec<Scenario>> {
    let scenarios = match config.workload.scenarios_path {
        Some(ref path) => {
            info!("Loading scenarios from {:?}", path);
            Scenario::load_list(path)
                .with_context(|| format!("failed to load scenarios from {:?}", path))?
        }
        None => Scenario::builtin(),
    };

    if scenarios.is_empty() {
        anyhow::bail!("no scenarios to run");
    }
    for scenario in &scenarios {
        scenario
            .validate(config.record.fields)
            .with_context(|| format!("scenario {:?} is not usable", scenario.name))?;
    }
    Ok(scenarios)
}

/// Install the Prometheus recorder when metrics output is requested
fn setup_prometheus_metrics(config: &Config) -> Option<PrometheusHandle> {
    if !config.report.prometheus {
        return None;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldlock=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Loaded configuration: fields={}, ops={}, max_threads={}, iterations={}",
        config.record.fields,
        config.workload.ops_per_source,
        config.experiment.max_threads,
        config.experiment.iterations
    );

    let prometheus = setup_prometheus_metrics(&config);
    let scenarios = load_scenarios(&config)?;

    if let Some(ref dir) = config.workload.dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create workload directory {:?}", dir))?;
    }

    let seed = config.workload.seed.unwrap_or_else(rand::random);
    info!("Workload seed: {} (set FIELDLOCK_SEED to reproduce)", seed);
    let generator = WorkloadGenerator::new(config.record.fields, config.workload.write_value, seed);

    info!("Generating workloads...");
    let generation_start = Instant::now();
    let sources = config.experiment.max_threads;
    let prepared = ScenarioWorkloads::generate_all(
        &generator,
        &scenarios,
        sources,
        config.workload.ops_per_source,
        config.workload.dir.as_deref(),
    )
    .context("failed to prepare workloads")?;
    info!("Generation finished in {:?}", generation_start.elapsed());

    let driver = ExperimentDriver::new(
        SharedRecord::new(config.record.fields),
        DriverConfig {
            levels: config.experiment.levels(),
            iterations: config.experiment.iterations,
        },
    );
    let report = driver.run(&prepared).context("experiment failed")?;

    report.print_summary();
    if config.report.json {
        println!("{}", report.to_json()?);
    }
    if let Some(handle) = prometheus {
        println!("{}", handle.render());
    }

    Ok(())
}
